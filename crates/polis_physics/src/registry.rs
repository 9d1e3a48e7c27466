//! Collider registry
//!
//! Owns every active collision volume in the world. World builders insert
//! colliders as they place scenery; the resolver reads the whole list once
//! per frame. Mutation only happens between frames (world construction or
//! gameplay events), never during a resolution pass.

use polis_math::Vec3;

use crate::collider::{Collider, ColliderSpec};

/// Distance under which a collider position matches a removal request
pub const REMOVAL_EPSILON: f32 = 0.1;

/// Default tolerance for below-ground pruning
const PRUNE_TOLERANCE: f32 = 0.1;

/// Registry of active collision volumes
///
/// Colliders are keyed by spatial identity: the surrounding world-building
/// code constructs them inline without retaining handles, so removal matches
/// by position within [`REMOVAL_EPSILON`].
#[derive(Default)]
pub struct ColliderRegistry {
    colliders: Vec<Collider>,
    /// Specs inserted before their anchor geometry had a position
    pending: Vec<ColliderSpec>,
    ground_level: f32,
}

impl ColliderRegistry {
    /// Create an empty registry with ground level 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the process-wide ground level
    ///
    /// Existing colliders are not recomputed; floor-providing colliders and
    /// the flat fallback must agree with this value or the agent will sink
    /// or float visually.
    pub fn set_ground_level(&mut self, y: f32) {
        self.ground_level = y;
    }

    /// Current ground level
    pub fn ground_level(&self) -> f32 {
        self.ground_level
    }

    /// Insert a collider
    pub fn add(&mut self, collider: Collider) {
        self.colliders.push(collider);
    }

    /// Insert a collider spec
    ///
    /// Specs without a position are not rejected; they go to a pending list
    /// that [`reconcile`](Self::reconcile) retries later, because scenery
    /// builders sometimes describe a collider before the object it is
    /// attached to has a finalized position.
    pub fn add_spec(&mut self, spec: ColliderSpec) {
        match spec.into_collider() {
            Ok(collider) => self.colliders.push(collider),
            Err(spec) => {
                log::warn!(
                    "collider spec without position (anchor: {:?}); deferring",
                    spec.anchor
                );
                self.pending.push(spec);
            }
        }
    }

    /// Retry pending specs against an anchor-position lookup
    ///
    /// Each pending spec whose anchor the lookup can place moves to the
    /// active list. Returns the number of colliders recovered.
    pub fn reconcile<F>(&mut self, lookup: F) -> usize
    where
        F: Fn(&str) -> Option<Vec3>,
    {
        if self.pending.is_empty() {
            return 0;
        }

        let before = self.pending.len();
        let mut still_pending = Vec::new();
        for mut spec in self.pending.drain(..) {
            let position = spec.anchor.as_deref().and_then(&lookup);
            match position {
                Some(position) => {
                    spec.position = Some(position);
                    // position is now set, so this cannot fail
                    if let Ok(collider) = spec.into_collider() {
                        self.colliders.push(collider);
                    }
                }
                None => still_pending.push(spec),
            }
        }
        self.pending = still_pending;

        let fixed = before - self.pending.len();
        if fixed > 0 {
            log::info!(
                "reconciled {} deferred colliders ({} remaining)",
                fixed,
                self.pending.len()
            );
        }
        fixed
    }

    /// Remove the first collider within [`REMOVAL_EPSILON`] of a point
    ///
    /// Returns whether a removal occurred.
    pub fn remove(&mut self, position: Vec3) -> bool {
        let index = self
            .colliders
            .iter()
            .position(|c| c.position.distance_to(position) < REMOVAL_EPSILON);

        match index {
            Some(index) => {
                self.colliders.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every collider whose Y is below `ground_level - tolerance`
    ///
    /// Used defensively after bulk world construction to catch generation
    /// bugs such as height-field mismatches. Returns the count removed.
    pub fn prune_below_ground(&mut self, tolerance: f32) -> usize {
        let cutoff = self.ground_level - tolerance;
        let before = self.colliders.len();

        self.colliders.retain(|c| {
            let keep = c.position.y >= cutoff;
            if !keep {
                log::info!(
                    "pruning below-ground collider {:?} at ({:.2}, {:.2}, {:.2})",
                    c.name,
                    c.position.x,
                    c.position.y,
                    c.position.z
                );
            }
            keep
        });

        let removed = before - self.colliders.len();
        if removed > 0 {
            log::info!("pruned {} colliders below ground level", removed);
        }
        removed
    }

    /// Prune with the default tolerance
    pub fn prune_below_ground_default(&mut self) -> usize {
        self.prune_below_ground(PRUNE_TOLERANCE)
    }

    /// Active colliders, in insertion order
    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    /// Number of active colliders
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Whether the registry holds no active colliders
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Number of specs still waiting for a position
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// First collider within `max_distance` of a point, if any
    pub fn collider_near(&self, position: Vec3, max_distance: f32) -> Option<&Collider> {
        self.colliders
            .iter()
            .find(|c| c.position.distance_to(position) < max_distance)
    }
}
