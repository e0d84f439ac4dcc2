//! Directions HTTP adapter for multi-stop routes.
//!
//! Speaks the OSRM `route` protocol, which Mapbox Directions also follows,
//! so the same client serves a self-hosted OSRM or the hosted service.

use serde::Deserialize;
use tracing::debug;

use crate::error::RoutingError;
use crate::model::{Leg, RouteMetrics, Step};
use crate::polyline::Polyline;
use crate::traits::{RouteRequest, RoutingProvider};

const MAPBOX_BASE_URL: &str = "https://api.mapbox.com";

/// Fixed (lat, lng) pair routed by the health check.
const HEALTH_PROBE: [(f64, f64); 2] = [(37.3541, -121.9552), (37.3382, -121.8863)];

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    /// Path between the base URL and the profile, e.g. `route/v1`.
    pub service: String,
    pub profile: String,
    pub access_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            service: "route/v1".to_string(),
            profile: "driving".to_string(),
            access_token: None,
            timeout_secs: 10,
        }
    }
}

impl OsrmConfig {
    /// Hosted Mapbox Directions with traffic-aware durations.
    pub fn mapbox(access_token: impl Into<String>) -> Self {
        Self {
            base_url: MAPBOX_BASE_URL.to_string(),
            service: "directions/v5/mapbox".to_string(),
            profile: "driving-traffic".to_string(),
            access_token: Some(access_token.into()),
            ..Self::default()
        }
    }

    /// Reads the live backend settings from the process environment.
    ///
    /// Returns `None` when neither a base URL nor a usable token is set.
    pub fn from_env() -> Option<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`OsrmConfig::from_env`] over an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("ROUTING_ACCESS_TOKEN")
            .or_else(|| lookup("MAPBOX_ACCESS_TOKEN"))
            .filter(|token| usable_token(token));

        let mut config = match (lookup("ROUTING_BASE_URL").filter(|url| !url.trim().is_empty()), token) {
            (Some(base_url), token) => Self {
                base_url: base_url.trim_end_matches('/').to_string(),
                access_token: token,
                ..Self::default()
            },
            (None, Some(token)) => Self::mapbox(token),
            (None, None) => return None,
        };

        if let Some(service) = lookup("ROUTING_SERVICE") {
            config.service = service.trim_matches('/').to_string();
        }
        if let Some(profile) = lookup("ROUTING_PROFILE") {
            config.profile = profile;
        }
        if let Some(timeout) = lookup("ROUTING_TIMEOUT_SECS").and_then(|value| value.parse().ok()) {
            config.timeout_secs = timeout;
        }
        Some(config)
    }

    /// Hosted endpoints need a real token; self-hosted ones need none.
    pub fn has_credentials(&self) -> bool {
        match &self.access_token {
            Some(token) => usable_token(token),
            None => !self.base_url.contains("api.mapbox.com"),
        }
    }
}

/// Rejects blank tokens and `your_..._here` template placeholders.
fn usable_token(token: &str) -> bool {
    let token = token.trim();
    !token.is_empty() && !(token.starts_with("your_") && token.ends_with("_here"))
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, coordinates: &[(f64, f64)]) -> String {
        let coords = coordinates
            .iter()
            .map(|(lat, lng)| format!("{:.6},{:.6}", lng, lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/{}/{}/{}",
            self.config.base_url, self.config.service, self.config.profile, coords
        )
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("overview", "full".to_string()),
            ("geometries", "geojson".to_string()),
            ("steps", "true".to_string()),
            ("annotations", "duration,distance".to_string()),
        ];
        if let Some(token) = &self.config.access_token {
            query.push(("access_token", token.clone()));
        }
        query
    }

    fn fetch(&self, coordinates: &[(f64, f64)]) -> Result<RouteMetrics, RoutingError> {
        let response = self
            .client
            .get(self.route_url(coordinates))
            .query(&self.query())
            .send()?;
        let status = response.status();
        let body = response.json::<OsrmRouteResponse>()?;

        match body.code.as_deref() {
            Some("Ok") => {}
            Some(code) => {
                return Err(RoutingError::Status {
                    code: code.to_string(),
                    message: body.message.unwrap_or_default(),
                });
            }
            None => {
                return Err(RoutingError::Status {
                    code: status.as_u16().to_string(),
                    message: body.message.unwrap_or_default(),
                });
            }
        }

        let route = body.routes.into_iter().next().ok_or(RoutingError::NoRoute)?;
        Ok(route.into_metrics())
    }
}

impl RoutingProvider for OsrmClient {
    fn name(&self) -> &'static str {
        "live"
    }

    fn compute_route(&self, request: &RouteRequest<'_>) -> Result<RouteMetrics, RoutingError> {
        debug!(stops = request.stops.len(), sequence = request.sequence, "requesting directions");
        self.fetch(&request.coordinates())
    }

    /// Routes a fixed pair with the configured token, so rejected
    /// credentials fail here rather than on every candidate.
    fn health_check(&self) -> Result<(), RoutingError> {
        self.fetch(&HEALTH_PROBE)
            .map(|_| ())
            .map_err(|err| RoutingError::Unavailable(err.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: Option<String>,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: Option<OsrmGeometry>,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

impl OsrmRoute {
    fn into_metrics(self) -> RouteMetrics {
        let legs = if self.legs.is_empty() {
            None
        } else {
            Some(self.legs.into_iter().map(OsrmLeg::into_leg).collect())
        };

        RouteMetrics {
            distance: self.distance,
            duration: self.duration,
            legs,
            geometry: self.geometry.map(|geometry| Polyline::from_geojson(&geometry.coordinates)),
            traffic: None,
            score_adjustment: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    #[serde(default)]
    coordinates: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    distance: f64,
    duration: f64,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

impl OsrmLeg {
    fn into_leg(self) -> Leg {
        Leg {
            distance: self.distance,
            duration: self.duration,
            summary: self.summary,
            steps: self.steps.into_iter().map(OsrmStep::into_step).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    distance: f64,
    duration: f64,
    #[serde(default)]
    name: String,
    maneuver: OsrmManeuver,
}

impl OsrmStep {
    fn into_step(self) -> Step {
        let road_name = Some(self.name).filter(|name| !name.is_empty());
        let instruction = match self.maneuver.instruction {
            Some(text) if !text.is_empty() => text,
            _ => describe_maneuver(&self.maneuver.kind, self.maneuver.modifier.as_deref(), road_name.as_deref()),
        };

        Step {
            instruction,
            road_name,
            distance: self.distance,
            duration: self.duration,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OsrmManeuver {
    #[serde(rename = "type")]
    kind: String,
    modifier: Option<String>,
    instruction: Option<String>,
}

/// Plain-text instruction for servers that omit `maneuver.instruction`.
fn describe_maneuver(kind: &str, modifier: Option<&str>, road: Option<&str>) -> String {
    let action = match (kind, modifier) {
        ("depart", _) => "Depart".to_string(),
        ("arrive", _) => "Arrive at destination".to_string(),
        ("turn", Some(modifier)) | ("end of road", Some(modifier)) => format!("Turn {}", modifier),
        ("fork", Some(modifier)) => format!("Keep {} at the fork", modifier),
        ("roundabout", _) | ("rotary", _) => "Enter the roundabout".to_string(),
        (_, Some(modifier)) => format!("Continue {}", modifier),
        _ => "Continue".to_string(),
    };

    match (kind, road) {
        ("arrive", _) | (_, None) => action,
        (_, Some(road)) => format!("{} onto {}", action, road),
    }
}
