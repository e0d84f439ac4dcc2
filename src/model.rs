//! Domain types shared by the planning pipeline.
//!
//! Tasks and preferences arrive from the intent layer and are treated as
//! immutable inputs. Candidates borrow from them; routes and route options
//! are owned values returned to the caller.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::polyline::Polyline;

/// A geocoded point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub name: String,
}

impl Location {
    pub fn new(name: impl Into<String>, address: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            address: address.into(),
            name: name.into(),
        }
    }

    /// Coordinates as (lat, lng).
    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// Finite coordinates and a non-empty name and address.
    pub fn is_usable(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && !self.name.trim().is_empty()
            && !self.address.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferenceKind {
    Location,
    Chain,
    Category,
    Hours,
    Rating,
}

/// A constraint on which location satisfies a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preference {
    #[serde(rename = "type")]
    pub kind: PreferenceKind,
    pub value: String,
    pub is_mandatory: bool,
    #[serde(default)]
    pub description: String,
}

impl Preference {
    pub fn mandatory(kind: PreferenceKind, value: impl Into<String>) -> Self {
        Self::new(kind, value, true)
    }

    pub fn preferred(kind: PreferenceKind, value: impl Into<String>) -> Self {
        Self::new(kind, value, false)
    }

    fn new(kind: PreferenceKind, value: impl Into<String>, is_mandatory: bool) -> Self {
        Self {
            kind,
            value: value.into(),
            is_mandatory,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// One errand requiring a stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(rename = "type")]
    pub task_type: String,
    pub description: String,
    #[serde(default)]
    pub preferences: Vec<Preference>,
}

impl Task {
    pub fn new(id: impl Into<String>, task_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            task_type: task_type.into(),
            description: description.into(),
            preferences: Vec::new(),
        }
    }

    pub fn with_preference(mut self, preference: Preference) -> Self {
        self.preferences.push(preference);
        self
    }

    /// True if any preference is mandatory.
    pub fn is_mandatory(&self) -> bool {
        self.preferences.iter().any(|pref| pref.is_mandatory)
    }

    pub fn mandatory_preferences(&self) -> impl Iterator<Item = &Preference> {
        self.preferences.iter().filter(|pref| pref.is_mandatory)
    }

    pub fn preferred_preferences(&self) -> impl Iterator<Item = &Preference> {
        self.preferences.iter().filter(|pref| !pref.is_mandatory)
    }
}

/// Candidate locations per task id, in provider relevance order.
pub type LocationOptions = HashMap<String, Vec<Location>>;

/// A task paired with the location chosen for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment<'a> {
    pub task: &'a Task,
    pub location: &'a Location,
}

/// One trial ordering of all tasks with one location per task.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<'a> {
    pub assignments: Vec<Assignment<'a>>,
}

impl<'a> Candidate<'a> {
    pub fn new(assignments: Vec<Assignment<'a>>) -> Self {
        Self { assignments }
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Stop locations in visiting order.
    pub fn stops(&self) -> Vec<&'a Location> {
        self.assignments.iter().map(|item| item.location).collect()
    }

    pub fn task_ids(&self) -> Vec<&'a str> {
        self.assignments.iter().map(|item| item.task.id.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficFactor {
    Low,
    Medium,
    High,
}

impl TrafficFactor {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficFactor::Low => "low",
            TrafficFactor::Medium => "medium",
            TrafficFactor::High => "high",
        }
    }
}

/// One manoeuvre within a leg. Only consumed by presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub instruction: String,
    pub road_name: Option<String>,
    pub distance: f64,
    pub duration: f64,
}

/// Segment between two consecutive stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    pub distance: f64,
    pub duration: f64,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// What a routing backend reports for one ordered stop list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteMetrics {
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
    pub legs: Option<Vec<Leg>>,
    pub geometry: Option<Polyline>,
    /// Backend-supplied traffic classification; derived from speed when absent.
    pub traffic: Option<TrafficFactor>,
    /// Added to the preference score before clamping.
    pub score_adjustment: i32,
}

/// One stop on a finalized route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    pub location: Location,
    pub task_id: String,
    /// Minutes spent at the stop.
    pub estimated_duration: u32,
    /// 1-based position in the route.
    pub order: usize,
}

/// A fully evaluated candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: String,
    pub waypoints: Vec<Waypoint>,
    /// Meters.
    pub total_distance: f64,
    /// Seconds.
    pub total_duration: f64,
    pub preference_score: u8,
    pub traffic_factor: TrafficFactor,
    pub estimated_gas_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legs: Option<Vec<Leg>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Polyline>,
}

/// A ranked route with its explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteOption {
    pub route: Route,
    pub ranking: usize,
    pub reasoning: String,
    pub alternative_label: String,
}
