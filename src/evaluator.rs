//! Candidate evaluation: one routing call per candidate, then scoring.
//!
//! Candidates are evaluated sequentially in generation order. A failed
//! routing call only drops that candidate.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use crate::error::RoutingError;
use crate::model::{Candidate, Location, Route, RouteMetrics, TrafficFactor, Waypoint};
use crate::scoring::{PreferenceScorer, clamp_score};
use crate::traits::{RouteRequest, RoutingProvider};

pub const METERS_TO_MILES: f64 = 0.000621371;

/// Below this average speed (km/h) traffic is heavy.
pub const HIGH_TRAFFIC_BELOW_KMH: f64 = 20.0;

/// Below this average speed (km/h) traffic is moderate.
pub const MEDIUM_TRAFFIC_BELOW_KMH: f64 = 40.0;

#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    /// Fuel cost estimate in dollars per mile.
    pub cost_per_mile: f64,
    /// Minutes reported per waypoint.
    pub stop_minutes: u32,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            cost_per_mile: 0.15,
            stop_minutes: 30,
        }
    }
}

/// Classifies traffic from the average speed over the whole route.
pub fn classify_traffic(distance_m: f64, duration_s: f64) -> TrafficFactor {
    let speed_kmh = (distance_m / duration_s) * 3.6;
    if speed_kmh < HIGH_TRAFFIC_BELOW_KMH {
        TrafficFactor::High
    } else if speed_kmh < MEDIUM_TRAFFIC_BELOW_KMH {
        TrafficFactor::Medium
    } else {
        TrafficFactor::Low
    }
}

/// Fuel cost in dollars, rounded to cents.
pub fn estimate_gas_cost(distance_m: f64, cost_per_mile: f64) -> f64 {
    let miles = distance_m * METERS_TO_MILES;
    (miles * cost_per_mile * 100.0).round() / 100.0
}

pub struct RouteEvaluator<'p> {
    provider: &'p dyn RoutingProvider,
    scorer: PreferenceScorer,
    config: EvaluationConfig,
}

impl<'p> RouteEvaluator<'p> {
    pub fn new(provider: &'p dyn RoutingProvider, config: EvaluationConfig) -> Self {
        Self {
            provider,
            scorer: PreferenceScorer,
            config,
        }
    }

    /// Routes for every candidate whose routing call succeeded, in input order.
    pub fn evaluate(&self, origin: &Location, candidates: &[Candidate<'_>]) -> Vec<Route> {
        let never = AtomicBool::new(false);
        self.evaluate_cancellable(origin, candidates, &never)
            .unwrap_or_default()
    }

    /// Like [`RouteEvaluator::evaluate`], but checks `cancel` before each
    /// routing call. Returns `None` once cancelled; partial routes are dropped.
    pub fn evaluate_cancellable(
        &self,
        origin: &Location,
        candidates: &[Candidate<'_>],
        cancel: &AtomicBool,
    ) -> Option<Vec<Route>> {
        let mut routes = Vec::with_capacity(candidates.len());

        for (sequence, candidate) in candidates.iter().enumerate() {
            if cancel.load(Ordering::Relaxed) {
                debug!(evaluated = routes.len(), "evaluation cancelled");
                return None;
            }

            let stops = candidate.stops();
            let request = RouteRequest {
                origin,
                stops: &stops,
                sequence,
            };

            match self.provider.compute_route(&request).and_then(validate) {
                Ok(metrics) => routes.push(self.build_route(sequence, candidate, metrics)),
                Err(err) => {
                    warn!(
                        backend = self.provider.name(),
                        sequence,
                        error = %err,
                        "skipping candidate after routing failure"
                    );
                }
            }
        }

        Some(routes)
    }

    fn build_route(&self, sequence: usize, candidate: &Candidate<'_>, metrics: RouteMetrics) -> Route {
        let waypoints = candidate
            .assignments
            .iter()
            .enumerate()
            .map(|(index, item)| Waypoint {
                location: item.location.clone(),
                task_id: item.task.id.clone(),
                estimated_duration: self.config.stop_minutes,
                order: index + 1,
            })
            .collect();

        let base_score = self.scorer.score(candidate) as i32;
        let traffic_factor = metrics.traffic.unwrap_or_else(|| match metrics.legs {
            Some(_) => classify_traffic(metrics.distance, metrics.duration),
            None => TrafficFactor::Medium,
        });

        Route {
            id: format!("route-{}", sequence + 1),
            waypoints,
            total_distance: metrics.distance,
            total_duration: metrics.duration,
            preference_score: clamp_score(base_score + metrics.score_adjustment),
            traffic_factor,
            estimated_gas_cost: Some(estimate_gas_cost(metrics.distance, self.config.cost_per_mile)),
            legs: metrics.legs,
            geometry: metrics.geometry,
        }
    }
}

/// Rejects metrics that would break ranking (`1 / duration`) or cost math.
fn validate(metrics: RouteMetrics) -> Result<RouteMetrics, RoutingError> {
    if !metrics.duration.is_finite() || metrics.duration <= 0.0 {
        return Err(RoutingError::InvalidMetrics(format!(
            "duration must be positive, got {}",
            metrics.duration
        )));
    }
    if !metrics.distance.is_finite() || metrics.distance < 0.0 {
        return Err(RoutingError::InvalidMetrics(format!(
            "distance must be non-negative, got {}",
            metrics.distance
        )));
    }
    Ok(metrics)
}
