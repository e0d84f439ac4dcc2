//! errand-planner core
//!
//! Plans a multi-stop driving route for a list of errands: bounded candidate
//! generation, routing through a live or simulated backend, preference
//! scoring and ranking.

pub mod traits;
pub mod model;
pub mod error;
pub mod candidates;
pub mod scoring;
pub mod evaluator;
pub mod ranking;
pub mod planner;
pub mod locations;
pub mod osrm;
pub mod simulated;
pub mod haversine;
pub mod polyline;
