//! Test fixtures for errand-planner.
//!
//! Provides:
//! - Real South Bay locations
//! - A fixed location provider and a scripted routing provider

#![allow(dead_code)]

pub mod bay_area_locations;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use errand_planner::error::{PlannerError, RoutingError};
use errand_planner::model::{Location, RouteMetrics, Task};
use errand_planner::planner::{OptimizeFor, PlanRequest};
use errand_planner::traits::{LocationProvider, RouteRequest, RoutingProvider};

pub use bay_area_locations::*;

/// Location provider with a fixed origin and fixed per-task options.
#[derive(Debug, Clone)]
pub struct FixedLocations {
    pub origin: Location,
    pub options: HashMap<String, Vec<Location>>,
}

impl FixedLocations {
    pub fn new(origin: Location) -> Self {
        Self {
            origin,
            options: HashMap::new(),
        }
    }

    pub fn with_options(mut self, task_id: &str, locations: Vec<Location>) -> Self {
        self.options.insert(task_id.to_string(), locations);
        self
    }
}

impl LocationProvider for FixedLocations {
    fn find_starting_location(&self, _text: &str) -> Result<Location, PlannerError> {
        Ok(self.origin.clone())
    }

    fn find_locations_for_task(&self, task: &Task, _origin: &Location) -> Result<Vec<Location>, PlannerError> {
        Ok(self.options.get(&task.id).cloned().unwrap_or_default())
    }

    fn validate_mandatory_preferences(&self, _tasks: &[Task], _origin: &Location) -> Result<(), PlannerError> {
        Ok(())
    }
}

/// Deterministic routing: distance grows with stop count, fails on chosen
/// sequence numbers.
#[derive(Debug, Default)]
pub struct ScriptedRouting {
    pub fail_sequences: Vec<usize>,
    pub healthy: bool,
    pub calls: AtomicUsize,
}

impl ScriptedRouting {
    pub fn healthy() -> Self {
        Self {
            healthy: true,
            ..Self::default()
        }
    }

    pub fn failing_on(sequences: &[usize]) -> Self {
        Self {
            fail_sequences: sequences.to_vec(),
            healthy: true,
            ..Self::default()
        }
    }

    pub fn unreachable() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RoutingProvider for ScriptedRouting {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn compute_route(&self, request: &RouteRequest<'_>) -> Result<RouteMetrics, RoutingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_sequences.contains(&request.sequence) {
            return Err(RoutingError::Status {
                code: "NoRoute".to_string(),
                message: format!("scripted failure for candidate {}", request.sequence),
            });
        }

        let stops = request.stops.len() as f64;
        Ok(RouteMetrics {
            distance: 4000.0 * stops + 500.0 * request.sequence as f64,
            duration: 600.0 * stops + 60.0 * request.sequence as f64,
            ..RouteMetrics::default()
        })
    }

    fn health_check(&self) -> Result<(), RoutingError> {
        if self.healthy {
            Ok(())
        } else {
            Err(RoutingError::Unavailable("connection refused".to_string()))
        }
    }
}

/// Healthy routing that raises a shared cancel flag during its first call.
#[derive(Debug, Clone, Default)]
pub struct CancellingRouting {
    pub cancel: Arc<AtomicBool>,
    pub calls: Arc<AtomicUsize>,
}

impl RoutingProvider for CancellingRouting {
    fn name(&self) -> &'static str {
        "cancelling"
    }

    fn compute_route(&self, request: &RouteRequest<'_>) -> Result<RouteMetrics, RoutingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.cancel.store(true, Ordering::SeqCst);
        Ok(RouteMetrics {
            distance: 4000.0 * request.stops.len() as f64,
            duration: 600.0 * request.stops.len() as f64,
            ..RouteMetrics::default()
        })
    }
}

pub fn request(starting_location: &str, tasks: Vec<Task>) -> PlanRequest {
    PlanRequest {
        starting_location: starting_location.to_string(),
        tasks,
        optimize_for: OptimizeFor::Time,
    }
}
