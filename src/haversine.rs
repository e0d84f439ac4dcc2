//! Great-circle distance helpers for the simulated backend.
//!
//! Ignores the road network, so it underestimates real driving distance.
//! Callers apply a detour factor when they need something road-like.

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two (lat, lng) points in kilometers.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Per-segment distances in kilometers along a point sequence.
pub fn segment_km(points: &[(f64, f64)]) -> Vec<f64> {
    points
        .windows(2)
        .map(|pair| haversine_km(pair[0], pair[1]))
        .collect()
}
