//! Player agent for FPS-style walking movement
//!
//! Combines gravity integration, yaw-resolved key movement, the ground
//! probe, and the collision resolver into a single per-frame update.

use polis_math::Vec3;

use crate::ground::{probe_ground, FloorSurface};
use crate::registry::ColliderRegistry;
use crate::resolve::resolve;

/// Default collision radius
pub const DEFAULT_RADIUS: f32 = 0.3;

/// Default capsule height (eye level sits just below the top)
pub const DEFAULT_HEIGHT: f32 = 1.7;

/// Default walking speed in units per second
pub const DEFAULT_MOVE_SPEED: f32 = 3.0;

/// Default sprint multiplier applied to walking speed
pub const DEFAULT_SPRINT_MULTIPLIER: f32 = 1.5;

/// Default upward velocity applied when jumping
pub const DEFAULT_JUMP_STRENGTH: f32 = 5.5;

/// Default gravity acceleration (positive, applied downward)
pub const DEFAULT_GRAVITY: f32 = 15.0;

/// Movement request for one frame, built by the input layer
///
/// `forward` and `strafe` are in [-1, 1]; `yaw` is the camera heading the
/// key directions are resolved against.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveIntent {
    /// Forward (+) / backward (-) input
    pub forward: f32,
    /// Right (+) / left (-) input
    pub strafe: f32,
    /// Whether the sprint modifier is held
    pub sprinting: bool,
    /// Whether a jump was requested this frame
    pub jump: bool,
    /// Camera yaw in radians (0 faces -Z)
    pub yaw: f32,
}

/// Player movement state
///
/// Position and velocity are owned exclusively by the agent and mutated
/// once per frame. Movement keys produce immediate constant-speed
/// translation, no acceleration smoothing; sprint is a flat multiplier.
#[derive(Clone, Debug)]
pub struct PlayerAgent {
    /// Center of the collision capsule
    pub position: Vec3,
    /// Current velocity
    pub velocity: Vec3,
    /// Collision radius
    pub radius: f32,
    /// Capsule height
    pub height: f32,
    /// Whether the agent stood on a floor at the end of the last update
    pub can_jump: bool,
    /// Walking speed in units per second
    pub move_speed: f32,
    /// Flat multiplier applied while sprinting
    pub sprint_multiplier: f32,
    /// Upward velocity applied when jumping
    pub jump_strength: f32,
    /// Gravity acceleration (positive, applied downward)
    pub gravity: f32,
}

impl PlayerAgent {
    /// Create an agent at the given position with default tuning
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            radius: DEFAULT_RADIUS,
            height: DEFAULT_HEIGHT,
            can_jump: false,
            move_speed: DEFAULT_MOVE_SPEED,
            sprint_multiplier: DEFAULT_SPRINT_MULTIPLIER,
            jump_strength: DEFAULT_JUMP_STRENGTH,
            gravity: DEFAULT_GRAVITY,
        }
    }

    /// Eye position for camera sync, just below the capsule top
    pub fn eye_position(&self) -> Vec3 {
        Vec3::new(
            self.position.x,
            self.position.y + self.height / 2.0 - 0.1,
            self.position.z,
        )
    }

    /// Y of the capsule's lowest point
    pub fn feet_y(&self) -> f32 {
        self.position.y - self.height / 2.0
    }

    /// Advance the agent by one frame
    ///
    /// Integration happens on a tentative position which the ground probe
    /// and the resolver then constrain; their output is adopted wholesale.
    pub fn update(
        &mut self,
        dt: f32,
        intent: &MoveIntent,
        registry: &ColliderRegistry,
        floors: &[&dyn FloorSurface],
    ) {
        if intent.jump && self.can_jump {
            self.velocity.y = self.jump_strength;
            self.can_jump = false;
        }

        self.velocity.y -= self.gravity * dt;

        // Resolve key input against the camera heading. Yaw 0 faces -Z.
        let forward = Vec3::new(-intent.yaw.sin(), 0.0, -intent.yaw.cos());
        let right = Vec3::new(intent.yaw.cos(), 0.0, -intent.yaw.sin());
        let direction = (forward * intent.forward + right * intent.strafe).normalized();

        let mut speed = self.move_speed;
        if intent.sprinting {
            speed *= self.sprint_multiplier;
        }
        self.velocity.x = direction.x * speed;
        self.velocity.z = direction.z * speed;

        self.position += self.velocity * dt;

        // Floor first: snap up onto whatever surface is underfoot.
        let floor_y = probe_ground(
            self.position,
            self.height,
            floors,
            registry.ground_level(),
        );
        if self.feet_y() <= floor_y {
            self.position.y = floor_y + self.height / 2.0;
            if self.velocity.y < 0.0 {
                self.velocity.y = 0.0;
            }
            self.can_jump = true;
        } else {
            self.can_jump = false;
        }

        let resolution = resolve(
            self.position,
            self.velocity,
            self.radius,
            self.height,
            registry.colliders(),
            registry.ground_level(),
        );
        self.position = resolution.position;
        self.velocity = resolution.velocity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::Collider;
    use crate::ground::Platform;

    const DT: f32 = 0.016;
    const EPSILON: f32 = 0.001;

    fn still() -> MoveIntent {
        MoveIntent::default()
    }

    #[test]
    fn test_new_agent_defaults() {
        let agent = PlayerAgent::new(Vec3::new(5.0, 2.5, 15.0));

        assert_eq!(agent.position, Vec3::new(5.0, 2.5, 15.0));
        assert_eq!(agent.velocity, Vec3::ZERO);
        assert!(!agent.can_jump);
        assert_eq!(agent.radius, DEFAULT_RADIUS);
        assert_eq!(agent.height, DEFAULT_HEIGHT);
    }

    #[test]
    fn test_eye_position_near_capsule_top() {
        let agent = PlayerAgent::new(Vec3::new(0.0, 0.85, 0.0));
        let eye = agent.eye_position();

        assert!((eye.y - 1.6).abs() < EPSILON);
        assert_eq!(eye.x, 0.0);
        assert_eq!(eye.z, 0.0);
    }

    #[test]
    fn test_gravity_pulls_airborne_agent_down() {
        let registry = ColliderRegistry::new();
        let mut agent = PlayerAgent::new(Vec3::new(0.0, 10.0, 0.0));

        agent.update(DT, &still(), &registry, &[]);

        assert!(agent.velocity.y < 0.0);
        assert!(agent.position.y < 10.0);
        assert!(!agent.can_jump);
    }

    #[test]
    fn test_landing_on_flat_ground_enables_jump() {
        let registry = ColliderRegistry::new();
        let mut agent = PlayerAgent::new(Vec3::new(0.0, 2.0, 0.0));

        for _ in 0..200 {
            agent.update(DT, &still(), &registry, &[]);
            if agent.can_jump {
                break;
            }
        }

        assert!(agent.can_jump);
        assert!((agent.feet_y() - 0.0).abs() < 0.05);
        assert_eq!(agent.velocity.y, 0.0);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let registry = ColliderRegistry::new();
        let mut agent = PlayerAgent::new(Vec3::new(0.0, 10.0, 0.0));
        assert!(!agent.can_jump);

        let jump = MoveIntent {
            jump: true,
            ..MoveIntent::default()
        };
        agent.update(DT, &jump, &registry, &[]);

        // Airborne: the jump request is ignored, gravity still wins
        assert!(agent.velocity.y < 0.0);
    }

    #[test]
    fn test_jump_and_land() {
        let registry = ColliderRegistry::new();
        let mut agent = PlayerAgent::new(Vec3::new(0.0, DEFAULT_HEIGHT / 2.0, 0.0));
        agent.can_jump = true;

        let jump = MoveIntent {
            jump: true,
            ..MoveIntent::default()
        };
        agent.update(DT, &jump, &registry, &[]);

        assert!(!agent.can_jump);
        assert!(agent.velocity.y > 0.0);
        let apex_check = agent.position.y;
        assert!(apex_check > DEFAULT_HEIGHT / 2.0);

        for _ in 0..300 {
            agent.update(DT, &still(), &registry, &[]);
            if agent.can_jump {
                break;
            }
        }
        assert!(agent.can_jump);
        assert!((agent.feet_y() - 0.0).abs() < 0.05);
    }

    #[test]
    fn test_forward_movement_follows_yaw() {
        let registry = ColliderRegistry::new();
        let mut agent = PlayerAgent::new(Vec3::new(0.0, DEFAULT_HEIGHT / 2.0, 0.0));
        agent.can_jump = true;

        // Yaw 0 faces -Z
        let intent = MoveIntent {
            forward: 1.0,
            ..MoveIntent::default()
        };
        agent.update(1.0, &intent, &registry, &[]);

        assert!((agent.position.z - (-DEFAULT_MOVE_SPEED)).abs() < EPSILON);
        assert!(agent.position.x.abs() < EPSILON);

        // Yaw of +pi/2: forward becomes -X
        let mut agent = PlayerAgent::new(Vec3::new(0.0, DEFAULT_HEIGHT / 2.0, 0.0));
        let intent = MoveIntent {
            forward: 1.0,
            yaw: std::f32::consts::FRAC_PI_2,
            ..MoveIntent::default()
        };
        agent.update(1.0, &intent, &registry, &[]);

        assert!((agent.position.x - (-DEFAULT_MOVE_SPEED)).abs() < EPSILON);
        assert!(agent.position.z.abs() < EPSILON);
    }

    #[test]
    fn test_diagonal_movement_is_normalized() {
        let registry = ColliderRegistry::new();
        let mut agent = PlayerAgent::new(Vec3::new(0.0, DEFAULT_HEIGHT / 2.0, 0.0));

        let intent = MoveIntent {
            forward: 1.0,
            strafe: 1.0,
            ..MoveIntent::default()
        };
        agent.update(1.0, &intent, &registry, &[]);

        let travelled = agent.position.horizontal().length();
        assert!((travelled - DEFAULT_MOVE_SPEED).abs() < EPSILON);
    }

    #[test]
    fn test_sprint_is_a_flat_multiplier() {
        let registry = ColliderRegistry::new();
        let mut walker = PlayerAgent::new(Vec3::new(0.0, DEFAULT_HEIGHT / 2.0, 0.0));
        let mut sprinter = PlayerAgent::new(Vec3::new(0.0, DEFAULT_HEIGHT / 2.0, 0.0));

        let walk = MoveIntent {
            forward: 1.0,
            ..MoveIntent::default()
        };
        let sprint = MoveIntent {
            forward: 1.0,
            sprinting: true,
            ..MoveIntent::default()
        };
        walker.update(1.0, &walk, &registry, &[]);
        sprinter.update(1.0, &sprint, &registry, &[]);

        let ratio = sprinter.position.z / walker.position.z;
        assert!((ratio - DEFAULT_SPRINT_MULTIPLIER).abs() < EPSILON);
    }

    #[test]
    fn test_ground_probe_snaps_onto_platform() {
        let registry = ColliderRegistry::new();
        let platform = Platform::new(0.0, 0.0, 10.0, 10.0, 1.0);
        let floors: [&dyn FloorSurface; 1] = [&platform];

        let mut agent = PlayerAgent::new(Vec3::new(0.0, 2.2, 0.0));
        for _ in 0..100 {
            agent.update(DT, &still(), &registry, &floors);
            if agent.can_jump {
                break;
            }
        }

        assert!(agent.can_jump);
        assert!((agent.feet_y() - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_wall_stops_forward_motion() {
        let mut registry = ColliderRegistry::new();
        // Wall straight ahead along -Z
        registry.add(Collider::cuboid(Vec3::new(0.0, 1.0, -3.0), 10.0, 4.0, 1.0));

        let mut agent = PlayerAgent::new(Vec3::new(0.0, DEFAULT_HEIGHT / 2.0, 0.0));
        let intent = MoveIntent {
            forward: 1.0,
            ..MoveIntent::default()
        };
        for _ in 0..200 {
            agent.update(DT, &intent, &registry, &[]);
        }

        // Held at the wall face: feet side of the wall, not inside or past it
        assert!(agent.position.z >= -2.5 + agent.radius - 0.05);
    }
}
