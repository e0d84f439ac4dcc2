//! Provider capability traits consumed by the planner.
//!
//! Geocoding/place search and directions are external collaborators. The
//! planner only sees these interfaces; concrete backends live in their own
//! modules.

use crate::error::{PlannerError, RoutingError};
use crate::model::{Location, RouteMetrics, Task};

/// One routing call: the origin followed by the stops in visiting order.
#[derive(Debug, Clone, Copy)]
pub struct RouteRequest<'a> {
    pub origin: &'a Location,
    pub stops: &'a [&'a Location],
    /// Position of the candidate within the evaluated batch (0-based).
    pub sequence: usize,
}

impl RouteRequest<'_> {
    /// Origin plus stops as (lat, lng).
    pub fn coordinates(&self) -> Vec<(f64, f64)> {
        std::iter::once(self.origin.coordinates())
            .chain(self.stops.iter().map(|stop| stop.coordinates()))
            .collect()
    }
}

/// Computes travel metrics for an ordered stop list.
pub trait RoutingProvider: Send + Sync {
    /// Short backend name for logs and responses.
    fn name(&self) -> &'static str;

    fn compute_route(&self, request: &RouteRequest<'_>) -> Result<RouteMetrics, RoutingError>;

    /// Cheap reachability probe run once per request.
    fn health_check(&self) -> Result<(), RoutingError> {
        Ok(())
    }
}

/// Resolves text and tasks to geocoded locations.
pub trait LocationProvider: Send + Sync {
    /// Fails with `LocationNotFound` if nothing matches.
    fn find_starting_location(&self, text: &str) -> Result<Location, PlannerError>;

    /// Candidate locations in relevance order. May be empty.
    fn find_locations_for_task(&self, task: &Task, origin: &Location) -> Result<Vec<Location>, PlannerError>;

    /// Every mandatory `location` preference must resolve to a real place.
    fn validate_mandatory_preferences(&self, tasks: &[Task], origin: &Location) -> Result<(), PlannerError>;
}
