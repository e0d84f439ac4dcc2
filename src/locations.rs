//! In-memory location provider backed by a fixed place catalog.
//!
//! Stands in for geocoding and place search in demos and tests. Task
//! locations are placed at deterministic offsets around the origin so
//! repeated lookups return identical coordinates.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::PlannerError;
use crate::model::{Location, Preference, PreferenceKind, Task};
use crate::traits::LocationProvider;

/// Radius (degrees) of the ring task locations are placed on.
const PLACEMENT_RADIUS_DEG: f64 = 0.008;

#[derive(Debug, Clone)]
struct CatalogPlace {
    name: String,
    address: String,
}

#[derive(Debug, Clone, Default)]
pub struct CatalogLocationProvider {
    /// Lowercase area key to its location.
    areas: Vec<(String, Location)>,
    /// Task type to places in relevance order.
    places: BTreeMap<String, Vec<CatalogPlace>>,
}

impl CatalogLocationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_area(mut self, key: &str, location: Location) -> Self {
        self.areas.push((key.to_lowercase(), location));
        self
    }

    pub fn with_place(mut self, task_type: &str, name: &str, address: &str) -> Self {
        self.places
            .entry(task_type.to_lowercase())
            .or_default()
            .push(CatalogPlace {
                name: name.to_string(),
                address: address.to_string(),
            });
        self
    }

    /// South Bay areas and a handful of places per errand type.
    pub fn bay_area() -> Self {
        Self::new()
            .with_area("santa clara", Location::new("Santa Clara", "Santa Clara, CA, USA", 37.3541, -121.9552))
            .with_area("san jose", Location::new("San Jose", "San Jose, CA, USA", 37.3382, -121.8863))
            .with_area("palo alto", Location::new("Palo Alto", "Palo Alto, CA, USA", 37.4419, -122.1430))
            .with_place("gym", "24 Hour Fitness", "123 Main St, San Jose, CA")
            .with_place("gym", "LA Fitness", "456 Oak Ave, Santa Clara, CA")
            .with_place("gym", "Planet Fitness", "789 Pine St, San Jose, CA")
            .with_place("groceries", "Costco Fremont", "1000 Costco Dr, Fremont, CA")
            .with_place("groceries", "Safeway", "200 Safeway Blvd, Santa Clara, CA")
            .with_place("groceries", "Whole Foods", "300 Organic Way, San Jose, CA")
            .with_place("restaurant", "Curry House Indian Restaurant", "111 Spice Ln, San Jose, CA")
            .with_place("restaurant", "Taco Bell Mexican", "222 Taco St, Santa Clara, CA")
            .with_place("restaurant", "Pizza Palace", "333 Pizza Ave, San Jose, CA")
            .with_place("pharmacy", "CVS Pharmacy", "444 Health St, Palo Alto, CA")
            .with_place("pharmacy", "Walgreens", "555 Drug Ave, San Jose, CA")
            .with_place("coffee", "Starbucks", "666 Coffee Ln, San Jose, CA")
            .with_place("coffee", "Peet's Coffee", "777 Bean St, Santa Clara, CA")
            .with_place("bank", "Bank of America", "888 Finance Blvd, Palo Alto, CA")
            .with_place("bank", "Wells Fargo", "999 Money Ave, San Jose, CA")
    }

    fn all_places(&self) -> impl Iterator<Item = &CatalogPlace> {
        self.places.values().flatten()
    }

    fn names_place(&self, value: &str) -> bool {
        let value = value.to_lowercase();
        self.all_places()
            .any(|place| place.name.to_lowercase().contains(&value))
    }

    fn names_area(&self, value: &str) -> bool {
        let value = value.to_lowercase();
        self.areas
            .iter()
            .any(|(key, location)| key.contains(&value) || location.name.to_lowercase().contains(&value))
    }

    /// A location preference that only names an area constrains where to
    /// search, not which place to pick.
    fn filters_places(&self, pref: &Preference) -> bool {
        pref.kind != PreferenceKind::Location || self.names_place(&pref.value) || !self.names_area(&pref.value)
    }
}

fn names_match(place: &CatalogPlace, preferences: &[&Preference]) -> bool {
    let name = place.name.to_lowercase();
    preferences
        .iter()
        .any(|pref| name.contains(&pref.value.to_lowercase()))
}

fn place_near(origin: &Location, index: usize, place: &CatalogPlace) -> Location {
    let angle = (index as f64 + 1.0) * 1.1;
    Location::new(
        place.name.clone(),
        place.address.clone(),
        origin.latitude + PLACEMENT_RADIUS_DEG * angle.sin(),
        origin.longitude + PLACEMENT_RADIUS_DEG * angle.cos(),
    )
}

impl LocationProvider for CatalogLocationProvider {
    fn find_starting_location(&self, text: &str) -> Result<Location, PlannerError> {
        let lower = text.to_lowercase();
        self.areas
            .iter()
            .find(|(key, _)| lower.contains(key.as_str()))
            .map(|(_, location)| location.clone())
            .ok_or_else(|| PlannerError::LocationNotFound(text.to_string()))
    }

    fn find_locations_for_task(&self, task: &Task, origin: &Location) -> Result<Vec<Location>, PlannerError> {
        let named: Vec<&Preference> = task
            .preferences
            .iter()
            .filter(|pref| matches!(pref.kind, PreferenceKind::Location | PreferenceKind::Chain))
            .collect();
        let mandatory: Vec<&Preference> = named
            .iter()
            .copied()
            .filter(|pref| pref.is_mandatory && self.filters_places(pref))
            .collect();

        let selected: Vec<&CatalogPlace> = match self.places.get(&task.task_type.to_lowercase()) {
            Some(places) if mandatory.is_empty() => places.iter().collect(),
            Some(places) => places.iter().filter(|place| names_match(place, &mandatory)).collect(),
            None if named.is_empty() => Vec::new(),
            None => self.all_places().filter(|place| names_match(place, &named)).collect(),
        };

        debug!(task = %task.id, found = selected.len(), "catalog lookup");

        Ok(selected
            .into_iter()
            .enumerate()
            .map(|(index, place)| place_near(origin, index, place))
            .collect())
    }

    fn validate_mandatory_preferences(&self, tasks: &[Task], _origin: &Location) -> Result<(), PlannerError> {
        for task in tasks {
            for pref in task.mandatory_preferences() {
                if pref.kind == PreferenceKind::Location && !self.names_place(&pref.value) && !self.names_area(&pref.value) {
                    return Err(PlannerError::MandatoryPreferenceUnsatisfied(pref.value.clone()));
                }
            }
        }
        Ok(())
    }
}
