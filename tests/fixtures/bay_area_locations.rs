//! Real South Bay locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap.

use errand_planner::model::Location;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Place {
    pub name: &'static str,
    pub address: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Place {
    pub const fn new(name: &'static str, address: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, address, lat, lng }
    }

    pub fn location(&self) -> Location {
        Location::new(self.name, self.address, self.lat, self.lng)
    }
}

// ============================================================================
// Starting points
// ============================================================================

pub const SANTA_CLARA: Place = Place::new("Santa Clara", "Santa Clara, CA, USA", 37.3541, -121.9552);
pub const SAN_JOSE: Place = Place::new("San Jose", "San Jose, CA, USA", 37.3382, -121.8863);

// ============================================================================
// Errand stops
// ============================================================================

pub const GYMS: &[Place] = &[
    Place::new("24 Hour Fitness", "1000 El Camino Real, Santa Clara, CA", 37.3520, -121.9590),
    Place::new("LA Fitness", "2858 Stevens Creek Blvd, San Jose, CA", 37.3235, -121.9480),
    Place::new("Planet Fitness", "1775 Story Rd, San Jose, CA", 37.3480, -121.8470),
];

pub const GROCERIES: &[Place] = &[
    Place::new("Costco Wholesale", "1709 Automation Pkwy, San Jose, CA", 37.4203, -121.9170),
    Place::new("Safeway", "2275 El Camino Real, Santa Clara, CA", 37.3515, -121.9720),
    Place::new("Whole Foods Market", "777 The Alameda, San Jose, CA", 37.3320, -121.9050),
];

pub const RESTAURANTS: &[Place] = &[
    Place::new("Amber India", "377 Santana Row, San Jose, CA", 37.3210, -121.9480),
    Place::new("Taqueria La Bamba", "2370 Homestead Rd, Santa Clara, CA", 37.3390, -121.9730),
];

pub fn locations(places: &[Place]) -> Vec<Location> {
    places.iter().map(Place::location).collect()
}
