//! Math primitives for the Polis simulation
//!
//! Provides [`Vec3`], the 3D vector type used across the collision,
//! interaction, and input crates.

mod vec3;

pub use vec3::Vec3;
