//! Downward ground probing
//!
//! Procedural terrain has smoothly varying height that box colliders cannot
//! cheaply represent everywhere, so floor surfaces answer a straight-down
//! height query exactly. Where no surface answers, a flat fallback level
//! guarantees the agent never falls through empty space (startup ordering,
//! gaps in generated geometry).

use polis_math::Vec3;

/// A surface that can answer a straight-down height query
pub trait FloorSurface {
    /// Y of this surface directly below `position`, if the XZ point is over it
    ///
    /// "Below" is not enforced here; the caller filters hits above the query
    /// point or too far beneath it.
    fn height_below(&self, position: Vec3) -> Option<f32>;
}

/// A rectangular walkable slab: platforms, interior floors, steps
#[derive(Clone, Copy, Debug)]
pub struct Platform {
    /// Center of the slab in the XZ plane
    pub center_x: f32,
    pub center_z: f32,
    /// Full extents in the XZ plane
    pub width: f32,
    pub depth: f32,
    /// Y of the walkable top face
    pub top: f32,
}

impl Platform {
    pub fn new(center_x: f32, center_z: f32, width: f32, depth: f32, top: f32) -> Self {
        Self {
            center_x,
            center_z,
            width,
            depth,
            top,
        }
    }
}

impl FloorSurface for Platform {
    fn height_below(&self, position: Vec3) -> Option<f32> {
        let over = (position.x - self.center_x).abs() <= self.width / 2.0
            && (position.z - self.center_z).abs() <= self.depth / 2.0;
        over.then_some(self.top)
    }
}

/// The city's procedural height field
///
/// Flat inside [`Terrain::FLAT_RADIUS`] of the origin; beyond it, gentle
/// sine-product hills plus a ramp rising toward the world edge. Answers
/// everywhere, so it belongs last in the floor list.
#[derive(Clone, Copy, Debug, Default)]
pub struct Terrain {
    /// Base height added to the whole field
    pub base: f32,
}

impl Terrain {
    /// Radius of the flat city center
    pub const FLAT_RADIUS: f32 = 80.0;

    pub fn new(base: f32) -> Self {
        Self { base }
    }

    /// Terrain height at an XZ point
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let dist_from_center = (x * x + z * z).sqrt();
        if dist_from_center <= Self::FLAT_RADIUS {
            return self.base;
        }

        let mut height = (x * 0.05).sin() * (z * 0.05).cos() * 0.5;
        height += (x * 0.01 + z * 0.01).sin() * 0.75;
        let edge_factor = (dist_from_center - Self::FLAT_RADIUS) / 400.0;
        height += edge_factor * 4.0;
        self.base + height
    }
}

impl FloorSurface for Terrain {
    fn height_below(&self, position: Vec3) -> Option<f32> {
        Some(self.height_at(position.x, position.z))
    }
}

/// Probe straight down for the floor under `position`
///
/// Considers every surface hit that is at or below the query point and no
/// more than `max_distance` beneath it, and returns the highest such Y.
/// Falls back to `fallback` when nothing qualifies.
pub fn probe_ground(
    position: Vec3,
    max_distance: f32,
    floors: &[&dyn FloorSurface],
    fallback: f32,
) -> f32 {
    let mut best: Option<f32> = None;

    for floor in floors {
        if let Some(y) = floor.height_below(position) {
            if y <= position.y && position.y - y <= max_distance {
                best = Some(match best {
                    Some(current) if current >= y => current,
                    _ => y,
                });
            }
        }
    }

    best.unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_hit_and_miss() {
        let platform = Platform::new(0.0, 0.0, 10.0, 10.0, 2.0);

        assert_eq!(platform.height_below(Vec3::new(3.0, 5.0, -4.0)), Some(2.0));
        assert_eq!(platform.height_below(Vec3::new(5.0, 5.0, 0.0)), Some(2.0)); // edge
        assert_eq!(platform.height_below(Vec3::new(6.0, 5.0, 0.0)), None);
    }

    #[test]
    fn test_terrain_flat_in_city_center() {
        let terrain = Terrain::new(0.0);
        assert_eq!(terrain.height_at(0.0, 0.0), 0.0);
        assert_eq!(terrain.height_at(50.0, -30.0), 0.0);
        assert_eq!(terrain.height_at(79.9, 0.0), 0.0);
    }

    #[test]
    fn test_terrain_rises_toward_edge() {
        let terrain = Terrain::new(0.0);
        // The ramp term dominates far out: (dist - 80) / 400 * 4
        let far = terrain.height_at(400.0, 0.0);
        assert!(far > 1.0, "expected ramp at world edge, got {far}");
    }

    #[test]
    fn test_probe_picks_highest_qualifying_floor() {
        let low = Platform::new(0.0, 0.0, 20.0, 20.0, 0.5);
        let high = Platform::new(0.0, 0.0, 10.0, 10.0, 2.0);
        let floors: [&dyn FloorSurface; 2] = [&low, &high];

        let y = probe_ground(Vec3::new(0.0, 3.0, 0.0), 5.0, &floors, 0.0);
        assert_eq!(y, 2.0);
    }

    #[test]
    fn test_probe_ignores_floors_above_agent() {
        let overhead = Platform::new(0.0, 0.0, 10.0, 10.0, 8.0);
        let floors: [&dyn FloorSurface; 1] = [&overhead];

        let y = probe_ground(Vec3::new(0.0, 3.0, 0.0), 5.0, &floors, -1.0);
        assert_eq!(y, -1.0);
    }

    #[test]
    fn test_probe_ignores_floors_beyond_max_distance() {
        let deep = Platform::new(0.0, 0.0, 10.0, 10.0, -20.0);
        let floors: [&dyn FloorSurface; 1] = [&deep];

        let y = probe_ground(Vec3::new(0.0, 3.0, 0.0), 5.0, &floors, 0.0);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn test_probe_falls_back_with_no_floors() {
        let y = probe_ground(Vec3::new(12.0, 1.0, -7.0), 5.0, &[], -0.5);
        assert_eq!(y, -0.5);
    }
}
