//! dispatch-planner core
//!
//! Route-optimization and technician-assignment engine for field-service
//! dispatch: feasibility checking (skills, time windows, distance budgets),
//! criterion-ranked assignment, and per-technician route sequencing.

pub mod engine;
pub mod feasibility;
pub mod geo;
pub mod model;
pub mod osrm;
pub mod osrm_data;
pub mod score;
pub mod sequence;
pub mod traits;
pub mod travel;
