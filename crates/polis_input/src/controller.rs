//! Keyboard/mouse state and move-intent construction

use polis_math::Vec3;
use polis_physics::MoveIntent;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Pitch is clamped just short of straight up/down to keep the view
/// direction well-defined
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// First-person controller state
///
/// Accumulates key and mouse state between frames and turns it into a
/// [`MoveIntent`] once per frame. Jump and interact are edge-triggered:
/// one press produces one request, consumed by the frame that reads it.
pub struct PlayerController {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    sprinting: bool,

    jump_pressed: bool,
    interact_pressed: bool,

    /// Camera yaw in radians (0 faces -Z)
    pub yaw: f32,
    /// Camera pitch in radians, clamped to [`PITCH_LIMIT`]
    pub pitch: f32,

    pub mouse_sensitivity: f32,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerController {
    pub fn new() -> Self {
        Self {
            forward: false,
            backward: false,
            left: false,
            right: false,
            sprinting: false,

            jump_pressed: false,
            interact_pressed: false,

            yaw: 0.0,
            pitch: 0.0,

            mouse_sensitivity: 0.002,
        }
    }

    /// Builder: set mouse sensitivity
    pub fn with_mouse_sensitivity(mut self, sensitivity: f32) -> Self {
        self.mouse_sensitivity = sensitivity;
        self
    }

    /// Process keyboard input. Returns whether the key was handled.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> bool {
        let pressed = state == ElementState::Pressed;

        match key {
            KeyCode::KeyW | KeyCode::ArrowUp => { self.forward = pressed; true }
            KeyCode::KeyS | KeyCode::ArrowDown => { self.backward = pressed; true }
            KeyCode::KeyA | KeyCode::ArrowLeft => { self.left = pressed; true }
            KeyCode::KeyD | KeyCode::ArrowRight => { self.right = pressed; true }
            KeyCode::ShiftLeft | KeyCode::ShiftRight => { self.sprinting = pressed; true }
            KeyCode::Space => {
                if pressed {
                    self.jump_pressed = true;
                }
                true
            }
            KeyCode::KeyE => {
                if pressed {
                    self.interact_pressed = true;
                }
                true
            }
            _ => false,
        }
    }

    /// Process raw mouse movement
    ///
    /// Mouse right turns right (yaw increases), mouse down looks down.
    pub fn process_mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        self.yaw += delta_x as f32 * self.mouse_sensitivity;
        self.pitch -= delta_y as f32 * self.mouse_sensitivity;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Build this frame's movement request, consuming the jump edge
    pub fn move_intent(&mut self) -> MoveIntent {
        let forward = (self.forward as i32 - self.backward as i32) as f32;
        let strafe = (self.right as i32 - self.left as i32) as f32;
        let jump = self.jump_pressed;
        self.jump_pressed = false;

        MoveIntent {
            forward,
            strafe,
            sprinting: self.sprinting,
            jump,
            yaw: self.yaw,
        }
    }

    /// Consume the interact edge
    ///
    /// Returns true if E was pressed since the last call, then clears it.
    pub fn consume_interact(&mut self) -> bool {
        let was_pressed = self.interact_pressed;
        self.interact_pressed = false;
        was_pressed
    }

    /// Release all held movement keys and pending edges
    ///
    /// Called when cursor capture changes, so keys held across the focus
    /// change do not keep driving the agent and a jump or interact pressed
    /// while uncaptured does not fire on the next simulated frame.
    pub fn clear_held(&mut self) {
        self.forward = false;
        self.backward = false;
        self.left = false;
        self.right = false;
        self.sprinting = false;
        self.jump_pressed = false;
        self.interact_pressed = false;
    }

    /// Whether any movement key is currently held
    pub fn is_moving(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Normalized view direction from yaw and pitch (0/0 faces -Z)
    pub fn view_direction(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(-sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
    }
}
