//! Interactive targets and proximity detection
//!
//! World builders place NPCs, portals and other points of interest as
//! targets with a position, a trigger radius and a callback. Each frame the
//! detector selects the closest in-range target inside the player's view
//! cone for explicit interaction, and fires on-enter triggers by proximity
//! alone.

mod targets;

pub use targets::{
    InteractiveTarget, ProximityDetector, TargetKey, Trigger, VIEW_CONE_THRESHOLD,
};
