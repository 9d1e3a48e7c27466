//! Collision and player movement for the Polis walking simulation
//!
//! This crate provides:
//! - Collision volumes (spheres, boxes, cylinders) and a registry that owns them
//! - A sliding-resolution collision resolver (penetration push-out + velocity projection)
//! - A downward ground probe over floor surfaces with a flat fallback
//! - Player agent physics for FPS-style movement with gravity and jumping

pub mod collider;
pub mod ground;
pub mod player;
pub mod registry;
pub mod resolve;
pub mod shapes;

// Re-export commonly used types
pub use collider::{Collider, ColliderFlags, ColliderSpec};
pub use ground::{probe_ground, FloorSurface, Platform, Terrain};
pub use player::{MoveIntent, PlayerAgent};
pub use registry::{ColliderRegistry, REMOVAL_EPSILON};
pub use resolve::{resolve, Resolution, GROUND_EPSILON, PUSH_OVERSHOOT};
pub use shapes::{Aabb, ColliderShape};
