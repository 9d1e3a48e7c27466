//! CityBuilder - declarative construction of the ancient city
//!
//! Provides a fluent API for assembling the agora, its scenery, and the
//! temple of Apollo out of colliders, floor surfaces, and interactive
//! targets.

use std::collections::HashMap;
use std::rc::Rc;

use polis_interact::{InteractiveTarget, ProximityDetector};
use polis_math::Vec3;
use polis_physics::{
    Collider, ColliderFlags, ColliderRegistry, ColliderShape, ColliderSpec, FloorSurface,
    Platform, Terrain,
};

use crate::state::SharedState;

/// The assembled city: colliders, floor surfaces, interactive targets
pub struct CityScene {
    pub registry: ColliderRegistry,
    pub detector: ProximityDetector,
    platforms: Vec<Platform>,
    terrain: Terrain,
}

impl CityScene {
    /// Floor surfaces for the ground probe
    ///
    /// Platforms first, terrain last: the terrain answers everywhere, so
    /// the probe's highest-hit rule lets platforms win above it.
    pub fn floors(&self) -> Vec<&dyn FloorSurface> {
        let mut floors: Vec<&dyn FloorSurface> = Vec::with_capacity(self.platforms.len() + 1);
        for platform in &self.platforms {
            floors.push(platform);
        }
        floors.push(&self.terrain);
        floors
    }

    /// The procedural terrain height field
    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }
}

/// Builder for the city
///
/// # Example
/// ```ignore
/// let scene = CityBuilder::new(0.0, state)
///     .add_agora()
///     .add_fountain()
///     .add_statue_ring(8, 12.0)
///     .add_colonnade(12, 14.5)
///     .add_stoa(Vec3::new(22.0, 0.0, 0.0), "east_stoa")
///     .add_temple(-40.0, 40.0)
///     .build();
/// ```
pub struct CityBuilder {
    registry: ColliderRegistry,
    detector: ProximityDetector,
    platforms: Vec<Platform>,
    terrain: Terrain,
    /// Positions of named scenery, for reconciling anchored collider specs
    anchors: HashMap<String, Vec3>,
    state: SharedState,
    ground_level: f32,
}

impl CityBuilder {
    /// Create a builder over flat ground at `ground_level`
    pub fn new(ground_level: f32, state: SharedState) -> Self {
        let mut registry = ColliderRegistry::new();
        registry.set_ground_level(ground_level);

        Self {
            registry,
            detector: ProximityDetector::new(),
            platforms: Vec::new(),
            terrain: Terrain::new(ground_level),
            anchors: HashMap::new(),
            state,
            ground_level,
        }
    }

    /// Add the central agora: a broad stone platform at the city center
    pub fn add_agora(mut self) -> Self {
        let top = self.ground_level + 0.5;
        self.registry.add(
            Collider::cuboid(Vec3::new(0.0, self.ground_level + 0.25, 0.0), 30.0, 0.5, 30.0)
                .with_name("agora_platform")
                .with_flags(ColliderFlags::FLOOR),
        );
        self.platforms.push(Platform::new(0.0, 0.0, 30.0, 30.0, top));
        self
    }

    /// Add the central fountain on the agora
    pub fn add_fountain(mut self) -> Self {
        self.registry.add(
            Collider::sphere(Vec3::new(0.0, self.ground_level + 1.5, 0.0), 2.0)
                .with_name("fountain"),
        );
        self
    }

    /// Add a ring of statues around the agora center
    ///
    /// Statue colliders are anchored by name; `build` reconciles them once
    /// every statue position is recorded.
    pub fn add_statue_ring(mut self, count: usize, ring_radius: f32) -> Self {
        let base = self.ground_level + 0.5;
        for i in 0..count {
            let angle = i as f32 * std::f32::consts::TAU / count as f32;
            let name = format!("statue_{i}");
            let position = Vec3::new(
                angle.cos() * ring_radius,
                base + 0.9,
                angle.sin() * ring_radius,
            );
            self.anchors.insert(name.clone(), position);
            self.registry
                .add_spec(ColliderSpec::anchored(&name, ColliderShape::sphere(0.6)).with_name(name));
        }
        self
    }

    /// Add a ring of columns around the agora edge
    ///
    /// Column colliders sit at torso height: resolution is a radial
    /// center-to-center test, so the center must be where the agent walks.
    pub fn add_colonnade(mut self, count: usize, ring_radius: f32) -> Self {
        let base = self.ground_level + 0.5;
        for i in 0..count {
            let angle = i as f32 * std::f32::consts::TAU / count as f32;
            self.registry.add(
                Collider::cylinder(
                    Vec3::new(angle.cos() * ring_radius, base + 0.85, angle.sin() * ring_radius),
                    0.4,
                    6.0,
                )
                .with_name(format!("colonnade_{i}")),
            );
        }
        self
    }

    /// Add a stoa: a long covered building on the flat ground
    pub fn add_stoa(mut self, position: Vec3, name: &str) -> Self {
        self.registry.add(
            Collider::cuboid(
                Vec3::new(position.x, self.ground_level + 2.5, position.z),
                8.0,
                5.0,
                4.0,
            )
            .with_name(name),
        );
        self
    }

    /// Add the temple of Apollo at an XZ position on the terrain
    ///
    /// Builds the stepped platform, interior floor, front columns, the
    /// portal behind the cella, and the temple's interactive targets.
    pub fn add_temple(mut self, x: f32, z: f32) -> Self {
        let ground = self.terrain.height_at(x, z);

        // Main platform and the walkable interior above it
        self.registry.add(
            Collider::cuboid(Vec3::new(x, ground + 0.5, z), 16.0, 1.0, 10.0)
                .with_name("temple_platform")
                .with_flags(ColliderFlags::FLOOR),
        );
        self.platforms.push(Platform::new(x, z, 16.0, 10.0, ground + 1.0));

        self.registry.add(
            Collider::cuboid(Vec3::new(x, ground + 1.2, z), 12.0, 0.4, 7.0)
                .with_name("temple_interior")
                .with_flags(ColliderFlags::FLOOR),
        );
        self.platforms.push(Platform::new(x, z, 12.0, 7.0, ground + 1.4));

        // Four steps descending from the platform's south edge
        for i in 0..4 {
            let step = i as f32;
            let top = ground + 0.8 - step * 0.2;
            let center_z = z + 5.5 + step;
            self.registry.add(
                Collider::cuboid(Vec3::new(x, top - 0.1, center_z), 16.0, 0.2, 1.0)
                    .with_name(format!("temple_step_{i}"))
                    .with_flags(ColliderFlags::FLOOR),
            );
            self.platforms.push(Platform::new(x, center_z, 16.0, 1.0, top));
        }

        // Front columns, colliders at torso height above the platform
        for i in 0..6 {
            let cx = x - 6.0 + i as f32 * 2.4;
            self.registry.add(
                Collider::cylinder(Vec3::new(cx, ground + 1.85, z + 4.0), 0.5, 5.0)
                    .with_name(format!("temple_column_{i}")),
            );
        }

        // Portal platform behind the cella
        self.registry.add(
            Collider::cuboid(Vec3::new(x, ground + 0.25, z - 7.0), 4.0, 0.5, 4.0)
                .with_name("portal_platform")
                .with_flags(ColliderFlags::FLOOR),
        );
        self.platforms.push(Platform::new(x, z - 7.0, 4.0, 4.0, ground + 0.5));

        // Reaching the temple grounds completes the "find the temple" step
        let approach_state = Rc::clone(&self.state);
        self.detector.add_target(InteractiveTarget::on_enter(
            "temple approach",
            Vec3::new(x, ground + 1.0, z),
            15.0,
            6.0,
            move || approach_state.borrow_mut().mark_temple_found(),
        ));

        // The keeper stands by the front columns
        let keeper_state = Rc::clone(&self.state);
        self.detector.add_target(InteractiveTarget::interact(
            "temple keeper",
            Vec3::new(x + 3.0, ground + 2.0, z + 2.0),
            3.0,
            move || {
                let mut state = keeper_state.borrow_mut();
                state.mark_talked_to_keeper();
                state.open_dialog(
                    "Welcome to the temple of Apollo. The portal behind the cella \
                     leads beyond the city.",
                );
            },
        ));

        // The portal swallows whoever steps onto its platform
        let portal_state = Rc::clone(&self.state);
        self.detector.add_target(InteractiveTarget::on_enter(
            "portal",
            Vec3::new(x, ground + 1.5, z - 7.0),
            2.0,
            2.0,
            move || portal_state.borrow_mut().mark_portal_entered(),
        ));

        self
    }

    /// Finish construction
    ///
    /// Reconciles anchored collider specs against the recorded scenery
    /// positions, then prunes anything that ended up below ground
    /// (defensive pass after bulk construction).
    pub fn build(mut self) -> CityScene {
        let anchors = self.anchors;
        let fixed = self.registry.reconcile(|name| anchors.get(name).copied());
        let pruned = self.registry.prune_below_ground_default();

        log::info!(
            "city built: {} colliders ({} reconciled, {} pruned), {} floors, {} targets",
            self.registry.len(),
            fixed,
            pruned,
            self.platforms.len() + 1,
            self.detector.len(),
        );

        CityScene {
            registry: self.registry,
            detector: self.detector,
            platforms: self.platforms,
            terrain: self.terrain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::GameState;

    fn full_city(state: SharedState) -> CityScene {
        CityBuilder::new(0.0, state)
            .add_agora()
            .add_fountain()
            .add_statue_ring(8, 12.0)
            .add_colonnade(12, 14.5)
            .add_stoa(Vec3::new(22.0, 0.0, 0.0), "east_stoa")
            .add_stoa(Vec3::new(-22.0, 0.0, 0.0), "west_stoa")
            .add_temple(-40.0, 40.0)
            .build()
    }

    #[test]
    fn test_city_builds_with_expected_parts() {
        let scene = full_city(GameState::shared());

        // agora 1 + fountain 1 + statues 8 + colonnade 12 + stoas 2
        // + temple (platform, interior, 4 steps, 6 columns, portal platform)
        assert_eq!(scene.registry.len(), 37);
        assert_eq!(scene.registry.pending_len(), 0);
        assert_eq!(scene.detector.len(), 3);

        // agora + temple platform + interior + 4 steps + portal platform,
        // then terrain as the last floor
        assert_eq!(scene.floors().len(), 9);
    }

    #[test]
    fn test_statue_anchors_are_reconciled() {
        let scene = CityBuilder::new(0.0, GameState::shared())
            .add_statue_ring(8, 12.0)
            .build();

        assert_eq!(scene.registry.pending_len(), 0);
        assert_eq!(scene.registry.len(), 8);
        // Reconciled statues landed on the ring, above ground
        for collider in scene.registry.colliders() {
            assert!(collider.position.y > 0.0);
        }
    }

    #[test]
    fn test_temple_sits_on_flat_terrain() {
        let state = GameState::shared();
        let scene = full_city(state);

        // (-40, 40) is inside the flat city center
        assert_eq!(scene.terrain().height_at(-40.0, 40.0), 0.0);
        let platform = scene
            .registry
            .colliders()
            .iter()
            .find(|c| c.name.as_deref() == Some("temple_platform"))
            .expect("temple platform exists");
        assert!(platform.is_floor());
        assert_eq!(platform.position.y, 0.5);
    }

    #[test]
    fn test_keeper_interaction_opens_dialog() {
        let state = GameState::shared();
        let mut scene = full_city(Rc::clone(&state));

        // Stand two units south of the keeper at (-37, 2, 42), facing them
        let agent = Vec3::new(-37.0, 0.85, 44.0);
        scene.detector.update(agent, Vec3::new(0.0, 0.0, -1.0));

        assert_eq!(
            scene.detector.highlighted().map(|(_, n)| n),
            Some("temple keeper")
        );
        assert!(scene.detector.interact());

        let state = state.borrow();
        assert!(state.talked_to_keeper);
        assert!(state.dialog_open);
        // Walking into the temple grounds also fired the approach trigger
        assert!(state.temple_found);
    }

    #[test]
    fn test_portal_fires_on_entry() {
        let state = GameState::shared();
        let mut scene = full_city(Rc::clone(&state));

        // Step onto the portal platform behind the temple
        let on_portal = Vec3::new(-40.0, 1.35, 33.0);
        scene.detector.update(on_portal, Vec3::new(0.0, 0.0, -1.0));

        assert!(state.borrow().portal_entered);

        // One-shot: leaving and re-entering stays quiet
        state.borrow_mut().portal_entered = false;
        scene.detector.update(on_portal, Vec3::new(0.0, 0.0, -1.0));
        assert!(!state.borrow().portal_entered);
    }
}
