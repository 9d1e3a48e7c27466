//! Target storage and the per-frame proximity pass

use polis_math::Vec3;
use slotmap::{new_key_type, SlotMap};

/// Minimum dot product between view direction and target offset for a
/// target to count as "looked at" (roughly a 45 degree half-angle cone)
pub const VIEW_CONE_THRESHOLD: f32 = 0.7;

new_key_type! {
    /// Key to an interactive target in the detector
    ///
    /// Uses generational indexing so a stale handle to a removed target
    /// returns None instead of pointing at whatever reused its slot.
    pub struct TargetKey;
}

/// How a target fires
pub enum Trigger {
    /// Fires on explicit interact input while highlighted
    Interact(Box<dyn FnMut()>),
    /// Fires automatically when the agent enters the trigger zone
    ///
    /// Entry means horizontal distance under the target radius and vertical
    /// offset under `height_tolerance`. One-shot: disarms after firing and
    /// stays silent until [`ProximityDetector::rearm`].
    OnEnter {
        height_tolerance: f32,
        action: Box<dyn FnMut()>,
        armed: bool,
    },
}

/// A world-anchored point of interest
pub struct InteractiveTarget {
    /// World position
    pub position: Vec3,
    /// Trigger radius in world units
    pub radius: f32,
    /// Display name for the interaction indicator
    pub name: String,
    /// Firing behavior
    pub trigger: Trigger,
}

impl InteractiveTarget {
    /// Target fired by explicit interact input
    pub fn interact(
        name: impl Into<String>,
        position: Vec3,
        radius: f32,
        on_interact: impl FnMut() + 'static,
    ) -> Self {
        Self {
            position,
            radius,
            name: name.into(),
            trigger: Trigger::Interact(Box::new(on_interact)),
        }
    }

    /// Target fired automatically on zone entry
    pub fn on_enter(
        name: impl Into<String>,
        position: Vec3,
        radius: f32,
        height_tolerance: f32,
        action: impl FnMut() + 'static,
    ) -> Self {
        Self {
            position,
            radius,
            name: name.into(),
            trigger: Trigger::OnEnter {
                height_tolerance,
                action: Box::new(action),
                armed: true,
            },
        }
    }
}

/// Per-frame detector over all interactive targets
///
/// `update` runs two independent passes: closest-in-view selection for
/// explicit targets, and zone-entry checks for on-enter targets. A target
/// behind the agent is never selected, even when it is the only one in
/// range; interaction stays unambiguous when the agent's back is turned.
#[derive(Default)]
pub struct ProximityDetector {
    targets: SlotMap<TargetKey, InteractiveTarget>,
    highlighted: Option<TargetKey>,
}

impl ProximityDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a target, returning its key
    pub fn add_target(&mut self, target: InteractiveTarget) -> TargetKey {
        log::debug!("interactive target '{}' at {:?}", target.name, target.position);
        self.targets.insert(target)
    }

    /// Remove a target. Returns whether it existed.
    pub fn remove_target(&mut self, key: TargetKey) -> bool {
        if self.highlighted == Some(key) {
            self.highlighted = None;
        }
        self.targets.remove(key).is_some()
    }

    /// Re-arm a fired on-enter target. No effect on interact targets.
    pub fn rearm(&mut self, key: TargetKey) {
        if let Some(target) = self.targets.get_mut(key) {
            if let Trigger::OnEnter { armed, .. } = &mut target.trigger {
                *armed = true;
            }
        }
    }

    /// Number of stored targets
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Run the per-frame proximity pass
    ///
    /// `view_direction` must be normalized. Selects the closest interact
    /// target within its radius and the view cone, and fires any armed
    /// on-enter target whose zone the agent is inside.
    pub fn update(&mut self, agent_position: Vec3, view_direction: Vec3) {
        let mut closest: Option<(TargetKey, f32)> = None;

        for (key, target) in &mut self.targets {
            match &mut target.trigger {
                Trigger::Interact(_) => {
                    let offset = target.position - agent_position;
                    let distance = offset.length();
                    if distance >= target.radius {
                        continue;
                    }
                    if offset.normalized().dot(view_direction) <= VIEW_CONE_THRESHOLD {
                        continue;
                    }
                    if closest.map_or(true, |(_, best)| distance < best) {
                        closest = Some((key, distance));
                    }
                }
                Trigger::OnEnter {
                    height_tolerance,
                    action,
                    armed,
                } => {
                    if !*armed {
                        continue;
                    }
                    let horizontal = (target.position - agent_position).horizontal().length();
                    let vertical = (target.position.y - agent_position.y).abs();
                    if horizontal < target.radius && vertical < *height_tolerance {
                        log::info!("entered trigger zone '{}'", target.name);
                        *armed = false;
                        action();
                    }
                }
            }
        }

        self.highlighted = closest.map(|(key, _)| key);
    }

    /// The currently highlighted target, for the interaction indicator
    pub fn highlighted(&self) -> Option<(TargetKey, &str)> {
        self.highlighted
            .and_then(|key| self.targets.get(key).map(|t| (key, t.name.as_str())))
    }

    /// Fire the highlighted target's callback. Returns whether one fired.
    pub fn interact(&mut self) -> bool {
        let Some(key) = self.highlighted else {
            return false;
        };
        let Some(target) = self.targets.get_mut(key) else {
            return false;
        };
        match &mut target.trigger {
            Trigger::Interact(callback) => {
                log::info!("interacting with '{}'", target.name);
                callback();
                true
            }
            Trigger::OnEnter { .. } => false,
        }
    }
}
