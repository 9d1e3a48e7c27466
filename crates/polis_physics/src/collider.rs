//! Collider volumes and the specs world builders hand to the registry

use bitflags::bitflags;
use polis_math::Vec3;

use crate::shapes::{Aabb, ColliderShape};

bitflags! {
    /// Identification flags carried by colliders
    ///
    /// The resolver never interprets these; they exist so world builders and
    /// cleanup passes can recognize what a collider belongs to.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ColliderFlags: u32 {
        /// Walkable floor geometry (platforms, steps, terrain slabs)
        const FLOOR = 1 << 0;
    }
}

/// A passive collision volume owned by the registry
///
/// The position is cloned on insert, so world builders may keep mutating the
/// vector they constructed the collider from.
#[derive(Clone, Debug)]
pub struct Collider {
    /// Center position in world space
    pub position: Vec3,
    /// Collision shape
    pub shape: ColliderShape,
    /// Optional name for identification by world builders
    pub name: Option<String>,
    /// Identification flags (not interpreted by the resolver)
    pub flags: ColliderFlags,
}

impl Collider {
    /// Create a collider at a position with the given shape
    pub fn new(position: Vec3, shape: ColliderShape) -> Self {
        Self {
            position,
            shape,
            name: None,
            flags: ColliderFlags::empty(),
        }
    }

    /// Convenience: sphere collider
    pub fn sphere(position: Vec3, radius: f32) -> Self {
        Self::new(position, ColliderShape::sphere(radius))
    }

    /// Convenience: box collider (axis-aligned, centered on `position`)
    pub fn cuboid(position: Vec3, width: f32, height: f32, depth: f32) -> Self {
        Self::new(position, ColliderShape::cuboid(width, height, depth))
    }

    /// Convenience: vertical cylinder collider
    pub fn cylinder(position: Vec3, radius: f32, height: f32) -> Self {
        Self::new(position, ColliderShape::cylinder(radius, height))
    }

    /// Set the name of this collider
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set identification flags
    pub fn with_flags(mut self, flags: ColliderFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Whether this collider is flagged as walkable floor
    pub fn is_floor(&self) -> bool {
        self.flags.contains(ColliderFlags::FLOOR)
    }

    /// World-space AABB for box shapes
    pub fn as_aabb(&self) -> Option<Aabb> {
        match self.shape {
            ColliderShape::Box { width, height, depth } => Some(Aabb::from_center_half_extents(
                self.position,
                Vec3::new(width / 2.0, height / 2.0, depth / 2.0),
            )),
            _ => None,
        }
    }
}

/// A collider description as produced by world-building code
///
/// Scenery builders sometimes describe a collider before the geometry it is
/// attached to has a finalized position. Such specs carry an `anchor` name
/// instead of a position and sit in the registry's pending list until a
/// reconciliation pass supplies the position (see
/// [`crate::ColliderRegistry::reconcile`]).
#[derive(Clone, Debug)]
pub struct ColliderSpec {
    /// World position, if known at construction time
    pub position: Option<Vec3>,
    /// Name of the scene object this collider is anchored to
    pub anchor: Option<String>,
    /// Collision shape
    pub shape: ColliderShape,
    /// Optional collider name
    pub name: Option<String>,
    /// Identification flags
    pub flags: ColliderFlags,
}

impl ColliderSpec {
    /// Spec with a known position
    pub fn at(position: Vec3, shape: ColliderShape) -> Self {
        Self {
            position: Some(position),
            anchor: None,
            shape,
            name: None,
            flags: ColliderFlags::empty(),
        }
    }

    /// Spec anchored to a named scene object whose position is not yet final
    pub fn anchored(anchor: impl Into<String>, shape: ColliderShape) -> Self {
        Self {
            position: None,
            anchor: Some(anchor.into()),
            shape,
            name: None,
            flags: ColliderFlags::empty(),
        }
    }

    /// Set the collider name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set identification flags
    pub fn with_flags(mut self, flags: ColliderFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Build the collider if the position is known
    pub fn into_collider(self) -> Result<Collider, ColliderSpec> {
        match self.position {
            Some(position) => Ok(Collider {
                position,
                shape: self.shape,
                name: self.name,
                flags: self.flags,
            }),
            None => Err(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collider_builders() {
        let c = Collider::cuboid(Vec3::new(0.0, 0.25, 5.0), 10.0, 0.5, 10.0)
            .with_name("agora_platform")
            .with_flags(ColliderFlags::FLOOR);

        assert!(c.is_floor());
        assert_eq!(c.name.as_deref(), Some("agora_platform"));

        let aabb = c.as_aabb().expect("box collider has an AABB");
        assert_eq!(aabb.min, Vec3::new(-5.0, 0.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(5.0, 0.5, 10.0));
    }

    #[test]
    fn test_non_box_has_no_aabb() {
        assert!(Collider::sphere(Vec3::ZERO, 1.0).as_aabb().is_none());
        assert!(Collider::cylinder(Vec3::ZERO, 0.4, 6.0).as_aabb().is_none());
    }

    #[test]
    fn test_spec_with_position_builds() {
        let spec = ColliderSpec::at(Vec3::new(1.0, 2.0, 3.0), ColliderShape::sphere(0.5));
        let collider = spec.into_collider().expect("position known");
        assert_eq!(collider.position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_spec_without_position_is_rejected() {
        let spec = ColliderSpec::anchored("statue_07", ColliderShape::sphere(0.5));
        let back = spec.into_collider().expect_err("no position yet");
        assert_eq!(back.anchor.as_deref(), Some("statue_07"));
    }
}
