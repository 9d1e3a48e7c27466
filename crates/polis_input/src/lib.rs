//! First-person input handling
//!
//! Controls:
//! - W/S or Up/Down: forward/backward
//! - A/D or Left/Right: strafe
//! - Shift: sprint
//! - Space: jump
//! - E: interact
//! - Mouse: look (while the cursor is captured)

mod controller;

pub use controller::PlayerController;
