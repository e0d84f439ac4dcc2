//! Polyline representation for route geometries.
//!
//! Directions responses carry GeoJSON `[lng, lat]` pairs. They are flipped
//! into (lat, lng) once, at the boundary, and kept decoded from then on.

use serde::{Deserialize, Serialize};

/// A route geometry as decoded (latitude, longitude) points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    /// Builds a polyline from GeoJSON `[lng, lat]` coordinates.
    ///
    /// Entries with fewer than two components are dropped.
    pub fn from_geojson(coordinates: &[Vec<f64>]) -> Self {
        let points = coordinates
            .iter()
            .filter(|pair| pair.len() >= 2)
            .map(|pair| (pair[1], pair[0]))
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
