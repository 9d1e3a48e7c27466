//! Procedural city construction
//!
//! This module provides a declarative API for assembling the city's
//! colliders, floor surfaces, and interactive targets.

mod city_builder;

pub use city_builder::{CityBuilder, CityScene};
