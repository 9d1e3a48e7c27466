//! Polis - first-person walk through an ancient Greek city
//!
//! The binary wires the workspace crates together: `polis_physics` for
//! collision and movement, `polis_interact` for NPCs and portals,
//! `polis_input` for the controller, plus configuration, shared game
//! state, and the procedural city itself.

pub mod config;
pub mod scene;
pub mod state;
