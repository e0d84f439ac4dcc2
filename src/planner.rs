//! Route planning facade.
//!
//! Runs one request end to end: starting-location resolution, mandatory
//! preference validation, per-task lookups, candidate generation,
//! sequential evaluation and ranking. The routing backend is chosen once at
//! construction; a failed health probe can fall back to simulation.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::candidates::{CandidateGenerator, SearchLimits};
use crate::error::PlannerError;
use crate::evaluator::{EvaluationConfig, RouteEvaluator};
use crate::model::{Location, LocationOptions, RouteOption, Task};
use crate::osrm::{OsrmClient, OsrmConfig};
use crate::ranking::{Ranker, RankingConfig};
use crate::simulated::{SimulatedRoutingProvider, SimulationConfig};
use crate::traits::{LocationProvider, RoutingProvider};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizeFor {
    #[default]
    Time,
    Distance,
    Preferences,
    Cost,
}

/// Structured request produced by the intent layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub starting_location: String,
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub optimize_for: OptimizeFor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub starting_location: Location,
    pub tasks: Vec<Task>,
    pub optimize_for: OptimizeFor,
    /// Ranked 1..K; empty when no candidate could be routed.
    pub routes: Vec<RouteOption>,
    /// Name of the routing backend that produced the routes.
    pub backend: String,
}

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub limits: SearchLimits,
    pub evaluation: EvaluationConfig,
    pub ranking: RankingConfig,
    /// Live directions settings; `None` selects the simulated backend.
    pub routing: Option<OsrmConfig>,
    pub simulation: SimulationConfig,
    /// Use the simulated backend when the live one fails its health probe.
    pub fallback_to_simulated: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            limits: SearchLimits::default(),
            evaluation: EvaluationConfig::default(),
            ranking: RankingConfig::default(),
            routing: None,
            simulation: SimulationConfig::default(),
            fallback_to_simulated: true,
        }
    }
}

impl PlannerConfig {
    /// Defaults with live routing settings read from the environment.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            routing: OsrmConfig::from_vars(lookup),
            ..Self::default()
        }
    }
}

/// Picks the live backend when credentials are available, else simulation.
pub fn select_backend(config: &PlannerConfig) -> Result<Box<dyn RoutingProvider>, PlannerError> {
    match &config.routing {
        Some(routing) if routing.has_credentials() => {
            let client = OsrmClient::new(routing.clone())
                .map_err(|err| PlannerError::ProviderUnavailable(err.to_string()))?;
            info!(base_url = %routing.base_url, profile = %routing.profile, "using live directions backend");
            Ok(Box::new(client))
        }
        _ => {
            info!("no routing credentials configured, using simulated backend");
            Ok(Box::new(SimulatedRoutingProvider::new(config.simulation.clone())))
        }
    }
}

pub struct RoutePlanner<L> {
    locations: L,
    routing: Box<dyn RoutingProvider>,
    fallback: Option<SimulatedRoutingProvider>,
    generator: CandidateGenerator,
    evaluation: EvaluationConfig,
    ranker: Ranker,
}

impl<L: LocationProvider> RoutePlanner<L> {
    pub fn new(locations: L, config: PlannerConfig) -> Result<Self, PlannerError> {
        let routing = select_backend(&config)?;
        Ok(Self::with_routing(locations, routing, config))
    }

    /// Uses `routing` regardless of `config.routing`.
    pub fn with_routing(locations: L, routing: Box<dyn RoutingProvider>, config: PlannerConfig) -> Self {
        let fallback = config
            .fallback_to_simulated
            .then(|| SimulatedRoutingProvider::new(config.simulation.clone()));

        Self {
            locations,
            routing,
            fallback,
            generator: CandidateGenerator::new(config.limits),
            evaluation: config.evaluation,
            ranker: Ranker::new(config.ranking),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.routing.name()
    }

    pub fn plan(&self, request: &PlanRequest) -> Result<PlanResponse, PlannerError> {
        self.plan_with_cancel(request, &AtomicBool::new(false))
    }

    /// Plans a request, aborting with `Cancelled` once `cancel` is set.
    pub fn plan_with_cancel(&self, request: &PlanRequest, cancel: &AtomicBool) -> Result<PlanResponse, PlannerError> {
        validate_request(request)?;
        info!(tasks = request.tasks.len(), "planning route");

        checkpoint(cancel)?;
        let origin = self.locations.find_starting_location(&request.starting_location)?;
        debug!(name = %origin.name, "starting location resolved");

        self.locations.validate_mandatory_preferences(&request.tasks, &origin)?;

        checkpoint(cancel)?;
        let options = self.lookup_options(&request.tasks, &origin)?;

        checkpoint(cancel)?;
        let candidates = self.generator.candidates(&request.tasks, &options);

        let (routes, backend) = if candidates.is_empty() {
            info!("no candidate routes could be generated");
            (Vec::new(), self.routing.name())
        } else {
            let provider = self.active_provider()?;
            let evaluator = RouteEvaluator::new(provider, self.evaluation.clone());
            let routes = evaluator
                .evaluate_cancellable(&origin, &candidates, cancel)
                .ok_or(PlannerError::Cancelled)?;
            (routes, provider.name())
        };

        let routes = self.ranker.rank(routes);
        info!(routes = routes.len(), backend, "route planning finished");

        Ok(PlanResponse {
            starting_location: origin,
            tasks: request.tasks.clone(),
            optimize_for: request.optimize_for,
            routes,
            backend: backend.to_string(),
        })
    }

    /// Per-task lookups run in parallel; results keep task order.
    fn lookup_options(&self, tasks: &[Task], origin: &Location) -> Result<LocationOptions, PlannerError> {
        let found = tasks
            .par_iter()
            .map(|task| {
                self.locations
                    .find_locations_for_task(task, origin)
                    .map(|locations| (task.id.clone(), locations))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (task_id, locations) in &found {
            debug!(task = %task_id, found = locations.len(), "task locations");
        }
        Ok(found.into_iter().collect())
    }

    fn active_provider(&self) -> Result<&dyn RoutingProvider, PlannerError> {
        match self.routing.health_check() {
            Ok(()) => Ok(self.routing.as_ref()),
            Err(err) => match &self.fallback {
                Some(fallback) => {
                    warn!(backend = self.routing.name(), error = %err, "routing backend unavailable, falling back to simulation");
                    Ok(fallback as &dyn RoutingProvider)
                }
                None => Err(PlannerError::ProviderUnavailable(err.to_string())),
            },
        }
    }
}

fn checkpoint(cancel: &AtomicBool) -> Result<(), PlannerError> {
    if cancel.load(Ordering::Relaxed) {
        Err(PlannerError::Cancelled)
    } else {
        Ok(())
    }
}

fn validate_request(request: &PlanRequest) -> Result<(), PlannerError> {
    if request.starting_location.trim().is_empty() {
        return Err(PlannerError::InvalidInput("starting location is required".to_string()));
    }
    if request.tasks.is_empty() {
        return Err(PlannerError::InvalidInput("at least one task is required".to_string()));
    }

    let mut seen = HashSet::new();
    for task in &request.tasks {
        if task.id.trim().is_empty() {
            return Err(PlannerError::InvalidInput("task id must not be empty".to_string()));
        }
        if !seen.insert(task.id.as_str()) {
            return Err(PlannerError::InvalidInput(format!("duplicate task id: {}", task.id)));
        }
        if task.preferences.iter().any(|pref| pref.value.trim().is_empty()) {
            return Err(PlannerError::InvalidInput(format!(
                "task {} has a preference without a value",
                task.id
            )));
        }
    }
    Ok(())
}
