//! Test fixtures for dispatch-planner.
//!
//! Real New York City locations (from OpenStreetMap) for realistic
//! dispatch scenarios.

pub mod new_york_locations;

pub use new_york_locations::*;
