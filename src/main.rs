//! Polis - first-person walk through an ancient Greek city
//!
//! Frame-driven and single-threaded: input, movement, collision, and
//! interaction all run inside the per-frame redraw callback. A failed
//! frame is logged and skipped; the loop keeps scheduling frames.

use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Fullscreen, Window, WindowId},
};

use polis::config::AppConfig;
use polis::scene::{CityBuilder, CityScene};
use polis::state::{GameState, SharedState};
use polis_input::PlayerController;
use polis_math::Vec3;
use polis_physics::PlayerAgent;

/// Error from a single simulation frame
///
/// A bad frame never halts the loop; the driver logs it and schedules the
/// next frame.
#[derive(Debug)]
struct FrameError {
    message: String,
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "frame error: {}", self.message)
    }
}

impl std::error::Error for FrameError {}

impl From<std::cell::BorrowError> for FrameError {
    fn from(e: std::cell::BorrowError) -> Self {
        FrameError {
            message: e.to_string(),
        }
    }
}

/// Main application state
struct App {
    config: AppConfig,
    window: Option<Arc<Window>>,
    scene: CityScene,
    agent: PlayerAgent,
    controller: PlayerController,
    state: SharedState,
    last_frame: std::time::Instant,
    cursor_captured: bool,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let state = GameState::shared();

        // Build the city around the agora, with the temple off to the
        // north-west on the terrain
        let scene = CityBuilder::new(config.world.ground_level, state.clone())
            .add_agora()
            .add_fountain()
            .add_statue_ring(8, 12.0)
            .add_colonnade(12, 14.5)
            .add_stoa(Vec3::new(22.0, 0.0, 0.0), "east_stoa")
            .add_stoa(Vec3::new(-22.0, 0.0, 0.0), "west_stoa")
            .add_temple(-40.0, 40.0)
            .build();

        let spawn = config.world.spawn;
        let mut agent = PlayerAgent::new(Vec3::new(spawn[0], spawn[1], spawn[2]));
        agent.height = config.player.height;
        agent.radius = config.player.radius;
        agent.move_speed = config.player.move_speed;
        agent.sprint_multiplier = config.player.sprint_multiplier;
        agent.jump_strength = config.player.jump_strength;
        agent.gravity = config.player.gravity;

        let controller =
            PlayerController::new().with_mouse_sensitivity(config.input.mouse_sensitivity);

        log::info!(
            "spawning at ({:.1}, {:.1}, {:.1}) over {} colliders",
            spawn[0],
            spawn[1],
            spawn[2],
            scene.registry.len()
        );

        Self {
            config,
            window: None,
            scene,
            agent,
            controller,
            state,
            last_frame: std::time::Instant::now(),
            cursor_captured: false,
        }
    }

    /// Run one simulation frame
    ///
    /// The whole step waits on cursor capture: with the cursor free the
    /// game is paused, so neither movement nor the interaction pass runs
    /// and no target can fire.
    fn frame(&mut self, dt: f32) -> Result<(), FrameError> {
        let dialog_open = self.state.try_borrow()?.dialog_open;

        if dialog_open {
            // Frozen during conversation. Consume input edges so a jump or
            // interact pressed mid-dialog does not fire on close.
            self.controller.move_intent();
            self.controller.consume_interact();
            return Ok(());
        }

        if self.cursor_captured {
            let intent = self.controller.move_intent();
            let floors = self.scene.floors();
            self.agent.update(dt, &intent, &self.scene.registry, &floors);

            self.scene
                .detector
                .update(self.agent.position, self.controller.view_direction());

            if self.controller.consume_interact() {
                self.scene.detector.interact();
            }
        }

        Ok(())
    }

    /// Capture cursor for FPS-style controls
    fn capture_cursor(&mut self) {
        if let Some(window) = &self.window {
            // Try Locked mode first (best for FPS), fall back to Confined
            let grab_result = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));

            if grab_result.is_ok() {
                window.set_cursor_visible(false);
                self.cursor_captured = true;
                // Drop input accumulated while the cursor was free so a
                // stale jump or interact does not fire on the first frame
                self.controller.clear_held();
                log::info!("Cursor captured - Escape to release");
            } else {
                log::warn!("Failed to capture cursor");
            }
        }
    }

    /// Release cursor
    fn release_cursor(&mut self) {
        if let Some(window) = &self.window {
            let _ = window.set_cursor_grab(CursorGrabMode::None);
            window.set_cursor_visible(true);
            self.cursor_captured = false;
            // Keys held across the focus change must not keep walking
            self.controller.clear_held();
            log::info!("Cursor released - click to capture");
        }
    }

    /// Window title doubles as the debug readout
    fn update_title(&self) {
        let Some(window) = &self.window else {
            return;
        };
        let pos = self.agent.position;
        let base = &self.config.window.title;
        let grounded = if self.agent.can_jump { "grounded" } else { "airborne" };

        let title = if self.state.borrow().dialog_open {
            format!("{base} - [any key to close dialog]")
        } else if !self.cursor_captured {
            format!("{base} - [Click to capture]")
        } else if let Some((_, name)) = self.scene.detector.highlighted() {
            format!(
                "{base} - ({:.1}, {:.1}, {:.1}) {grounded} [E: {name}]",
                pos.x, pos.y, pos.z
            )
        } else {
            format!(
                "{base} - ({:.1}, {:.1}, {:.1}) {grounded} [Esc to release]",
                pos.x, pos.y, pos.z
            )
        };
        window.set_title(&title);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window_attributes = Window::default_attributes()
                .with_title(&self.config.window.title)
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.window.width,
                    self.config.window.height,
                ));

            let window = Arc::new(
                event_loop
                    .create_window(window_attributes)
                    .expect("Failed to create window"),
            );
            window.request_redraw();
            self.window = Some(window);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if event.state == ElementState::Pressed {
                        // Any key closes an open dialog
                        if self.state.borrow().dialog_open {
                            self.state.borrow_mut().close_dialog();
                            return;
                        }

                        match key {
                            KeyCode::Escape => {
                                // Escape releases cursor first, then exits if pressed again
                                if self.cursor_captured {
                                    self.release_cursor();
                                } else {
                                    event_loop.exit();
                                }
                                return;
                            }
                            KeyCode::KeyF => {
                                if let Some(window) = &self.window {
                                    let new_fullscreen = if window.fullscreen().is_some() {
                                        None
                                    } else {
                                        Some(Fullscreen::Borderless(None))
                                    };
                                    window.set_fullscreen(new_fullscreen);
                                }
                            }
                            _ => {}
                        }
                    }
                    // Pass to controller for movement keys
                    self.controller.process_keyboard(key, event.state);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                // Click to capture cursor (FPS style)
                if state == ElementState::Pressed
                    && button == MouseButton::Left
                    && !self.cursor_captured
                {
                    self.capture_cursor();
                }
            }

            WindowEvent::RedrawRequested => {
                let now = std::time::Instant::now();
                let raw_dt = (now - self.last_frame).as_secs_f32();
                // Cap dt to prevent huge physics steps on first frame or after window focus
                let dt = raw_dt.min(1.0 / 30.0);
                self.last_frame = now;

                // Fail-soft: a bad frame is logged and skipped, the loop
                // keeps running
                if let Err(e) = self.frame(dt) {
                    log::error!("{e}");
                }

                self.update_title();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.cursor_captured {
                self.controller.process_mouse_motion(delta.0, delta.1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// With the cursor free the game is paused: no target may highlight or
    /// fire, even if E was pressed. The same pending press is discarded on
    /// recapture, not replayed.
    #[test]
    fn test_paused_frame_runs_no_interactions() {
        let mut app = App::new(AppConfig::default());

        // Stand on the temple grounds, in front of the keeper, facing -Z
        app.agent.position = Vec3::new(-37.0, 0.85, 44.0);
        app.controller
            .process_keyboard(KeyCode::KeyE, ElementState::Pressed);

        app.cursor_captured = false;
        app.frame(0.016).unwrap();
        assert!(!app.state.borrow().dialog_open);
        assert!(!app.state.borrow().talked_to_keeper);
        assert!(!app.state.borrow().temple_found);
        assert!(app.scene.detector.highlighted().is_none());

        // Recapture drops the stale press; the first live frame highlights
        // the keeper but does not interact
        app.cursor_captured = true;
        app.controller.clear_held();
        app.frame(0.016).unwrap();
        assert!(!app.state.borrow().dialog_open);
        assert!(app.state.borrow().temple_found); // proximity check resumed
        assert!(app.scene.detector.highlighted().is_some());

        // A press made while captured fires normally
        app.controller
            .process_keyboard(KeyCode::KeyE, ElementState::Pressed);
        app.frame(0.016).unwrap();
        assert!(app.state.borrow().dialog_open);
        assert!(app.state.borrow().talked_to_keeper);
    }
}

fn main() {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}. Using defaults.");
        AppConfig::default()
    });

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.debug.log_level),
    )
    .init();
    log::info!("Starting Polis");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app).expect("Event loop error");
}
