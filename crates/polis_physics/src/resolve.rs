//! Sliding collision resolution
//!
//! Given a moving agent and the collider list, computes an adjusted
//! position and velocity that respect ground level and every collider.
//! Overlaps are resolved by penetration-depth push-out; the velocity
//! component driving further penetration is removed so tangential motion
//! survives (sliding rather than a hard stop).

use polis_math::Vec3;

use crate::collider::Collider;
use crate::shapes::{Aabb, ColliderShape};

/// Pushes overshoot by 1% so the next frame does not re-trigger the same
/// contact on a floating-point boundary.
pub const PUSH_OVERSHOOT: f32 = 1.01;

/// Buffer above ground level that still counts as ground contact
pub const GROUND_EPSILON: f32 = 0.01;

/// Below this center-to-center distance the contact normal is undefined
const CENTER_EPSILON: f32 = 0.001;

/// Result of a resolution pass
#[derive(Clone, Copy, Debug)]
pub struct Resolution {
    /// Adjusted position
    pub position: Vec3,
    /// Adjusted velocity
    pub velocity: Vec3,
    /// Whether any collider produced an adjustment
    pub collided: bool,
}

/// Resolve an agent against ground level and the full collider list
///
/// The agent is a vertical capsule approximated as a sphere of `radius` for
/// round colliders and as a `(2*radius, height, 2*radius)` box for box
/// colliders, centered at `position`.
///
/// Each collider is visited in registry order and operates on the result of
/// the previous step. A pathological configuration (agent inside several
/// overlapping volumes) accumulates sequential corrections; with the low
/// overlap counts of this world that converges in practice. Never panics.
pub fn resolve(
    position: Vec3,
    velocity: Vec3,
    radius: f32,
    height: f32,
    colliders: &[Collider],
    ground_level: f32,
) -> Resolution {
    let mut position = position;
    let mut velocity = velocity;
    let mut collided = false;

    // Ground clamp first: feet never go below the flat ground level.
    if position.y - height / 2.0 < ground_level + GROUND_EPSILON {
        position.y = ground_level + height / 2.0;
        velocity.y = 0.0;
    }

    // Full scan, no spatial partitioning: collider counts stay in the low
    // hundreds for this world.
    for collider in colliders {
        match collider.shape {
            // Cylinders are vertical columns; radial distance alone decides
            // contact, so they share the sphere path.
            ColliderShape::Sphere { radius: r } | ColliderShape::Cylinder { radius: r, .. } => {
                if resolve_sphere(&mut position, &mut velocity, radius, collider.position, r) {
                    collided = true;
                }
            }
            ColliderShape::Box { .. } => {
                let aabb = collider
                    .as_aabb()
                    .unwrap_or_else(|| Aabb::new(collider.position, collider.position));
                if resolve_box(&mut position, &mut velocity, radius, height, &aabb) {
                    collided = true;
                }
            }
        }
    }

    Resolution {
        position,
        velocity,
        collided,
    }
}

/// Push the agent out of a round collider and project velocity onto the
/// tangent plane. Returns whether an adjustment happened.
fn resolve_sphere(
    position: &mut Vec3,
    velocity: &mut Vec3,
    agent_radius: f32,
    center: Vec3,
    collider_radius: f32,
) -> bool {
    let distance = position.distance_to(center);
    let combined = agent_radius + collider_radius;

    if distance >= combined {
        return false;
    }

    let penetration = combined - distance;

    if distance > CENTER_EPSILON {
        let normal = (*position - center).normalized();
        *position += normal * (penetration * PUSH_OVERSHOOT);

        let along_normal = velocity.dot(normal);
        if along_normal < 0.0 {
            *velocity -= normal * along_normal;
        }
    } else {
        // Agent center coincides with the collider center: the normal is
        // undefined, so nudge straight up instead.
        position.y += penetration * PUSH_OVERSHOOT;
    }

    true
}

/// Separate the agent box from a collider box along the least-penetration
/// axis. Returns whether an adjustment happened.
fn resolve_box(
    position: &mut Vec3,
    velocity: &mut Vec3,
    agent_radius: f32,
    agent_height: f32,
    aabb: &Aabb,
) -> bool {
    let agent = Aabb::from_center_half_extents(
        *position,
        Vec3::new(agent_radius, agent_height / 2.0, agent_radius),
    );

    // Overlap per axis; the minimum is the cheapest escape. Usually, though
    // not always, the physically correct separation direction.
    let overlap_x = agent.max.x.min(aabb.max.x) - agent.min.x.max(aabb.min.x);
    let overlap_y = agent.max.y.min(aabb.max.y) - agent.min.y.max(aabb.min.y);
    let overlap_z = agent.max.z.min(aabb.max.z) - agent.min.z.max(aabb.min.z);

    // Exact face contact (zero overlap, the steady state when standing on a
    // box top after a ground snap) is not a collision.
    if overlap_x <= 0.0 || overlap_y <= 0.0 || overlap_z <= 0.0 {
        return false;
    }

    let box_center = aabb.center();

    let mut penetration = overlap_x;
    let mut normal = if position.x >= box_center.x { Vec3::X } else { -Vec3::X };

    if overlap_y < penetration {
        penetration = overlap_y;
        normal = if position.y >= box_center.y { Vec3::Y } else { -Vec3::Y };
    }
    if overlap_z < penetration {
        penetration = overlap_z;
        normal = if position.z >= box_center.z { Vec3::Z } else { -Vec3::Z };
    }

    *position += normal * (penetration * PUSH_OVERSHOOT);

    let along_normal = velocity.dot(normal);
    if along_normal < 0.0 {
        *velocity -= normal * along_normal;
    }

    true
}
