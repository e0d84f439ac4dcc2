//! Simulated routing backend (used when no directions service is configured).
//!
//! Synthesizes plausible metrics without network I/O. Output is a pure
//! function of the seed, the candidate sequence number and the stop
//! coordinates, so repeated requests produce identical routes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::RoutingError;
use crate::haversine::segment_km;
use crate::model::{Leg, RouteMetrics, TrafficFactor};
use crate::traits::{RouteRequest, RoutingProvider};

/// Driving pace assumed by the simulation.
const SECONDS_PER_KM: f64 = 3.0 * 60.0;

/// Time spent at each stop.
const SECONDS_PER_STOP: f64 = 30.0 * 60.0;

/// Score penalty per position in the evaluated batch.
const POSITION_PENALTY: i32 = 2;

/// Upper bound of the uniform score jitter (applied as +/-).
const SCORE_JITTER: i32 = 5;

const TRAFFIC_CYCLE: [TrafficFactor; 3] = [TrafficFactor::Low, TrafficFactor::Medium, TrafficFactor::High];

/// How the simulated total distance is produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistanceModel {
    /// `base_meters` plus uniform noise in `[-spread_meters, spread_meters]`.
    Jittered { base_meters: f64, spread_meters: f64 },
    /// Sum of great-circle legs scaled by `detour_factor`, with per-leg detail.
    GreatCircle { detour_factor: f64 },
}

impl Default for DistanceModel {
    fn default() -> Self {
        DistanceModel::Jittered {
            base_meters: 8000.0,
            spread_meters: 3000.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimulationConfig {
    pub seed: u64,
    pub model: DistanceModel,
}

#[derive(Debug, Clone, Default)]
pub struct SimulatedRoutingProvider {
    config: SimulationConfig,
}

impl SimulatedRoutingProvider {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(SimulationConfig {
            seed,
            ..SimulationConfig::default()
        })
    }

    fn rng_for(&self, request: &RouteRequest<'_>) -> StdRng {
        StdRng::from_seed(request_seed(self.config.seed, request.sequence as u64, &request.coordinates()))
    }
}

/// 32-byte seed from the configured seed, the candidate sequence and the
/// exact coordinate bits. Independent of the std hasher.
fn request_seed(seed: u64, sequence: u64, coordinates: &[(f64, f64)]) -> [u8; 32] {
    let mut lat_acc = 0x9E37_79B9_7F4A_7C15_u64;
    let mut lng_acc = 0xD1B5_4A32_D192_ED03_u64;
    for (lat, lng) in coordinates {
        lat_acc = mix64(lat_acc ^ lat.to_bits());
        lng_acc = mix64(lng_acc ^ lng.to_bits());
    }

    let mut bytes = [0u8; 32];
    bytes[0..8].copy_from_slice(&seed.to_le_bytes());
    bytes[8..16].copy_from_slice(&sequence.to_le_bytes());
    bytes[16..24].copy_from_slice(&lat_acc.to_le_bytes());
    bytes[24..32].copy_from_slice(&lng_acc.to_le_bytes());
    bytes
}

/// SplitMix64 finalizer.
fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

impl RoutingProvider for SimulatedRoutingProvider {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn compute_route(&self, request: &RouteRequest<'_>) -> Result<RouteMetrics, RoutingError> {
        let mut rng = self.rng_for(request);

        let (distance, legs) = match self.config.model {
            DistanceModel::Jittered {
                base_meters,
                spread_meters,
            } => {
                let noise = if spread_meters > 0.0 {
                    rng.random_range(-spread_meters..=spread_meters)
                } else {
                    0.0
                };
                ((base_meters + noise).round().max(1.0), None)
            }
            DistanceModel::GreatCircle { detour_factor } => {
                let legs: Vec<Leg> = segment_km(&request.coordinates())
                    .into_iter()
                    .map(|km| {
                        let km = km * detour_factor;
                        Leg {
                            distance: (km * 1000.0).round(),
                            duration: (km * SECONDS_PER_KM).round(),
                            summary: "simulated".to_string(),
                            steps: Vec::new(),
                        }
                    })
                    .collect();
                let total = legs.iter().map(|leg| leg.distance).sum::<f64>().max(1.0);
                (total, Some(legs))
            }
        };

        let driving = distance / 1000.0 * SECONDS_PER_KM;
        let stopping = request.stops.len() as f64 * SECONDS_PER_STOP;
        let jitter = rng.random_range(-SCORE_JITTER..=SCORE_JITTER);

        Ok(RouteMetrics {
            distance,
            duration: (driving + stopping).round().max(1.0),
            legs,
            geometry: None,
            traffic: Some(TRAFFIC_CYCLE[request.sequence % TRAFFIC_CYCLE.len()]),
            score_adjustment: jitter - POSITION_PENALTY * request.sequence as i32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Location;

    fn origin() -> Location {
        Location::new("Santa Clara", "Santa Clara, CA, USA", 37.3541, -121.9552)
    }

    fn stops() -> Vec<Location> {
        vec![
            Location::new("LA Fitness", "456 Oak Ave, Santa Clara, CA", 37.3591, -121.9502),
            Location::new("Safeway", "200 Safeway Blvd, Santa Clara, CA", 37.3491, -121.9602),
        ]
    }

    fn run(provider: &SimulatedRoutingProvider, sequence: usize) -> RouteMetrics {
        let origin = origin();
        let stops = stops();
        let refs: Vec<&Location> = stops.iter().collect();
        let request = RouteRequest {
            origin: &origin,
            stops: &refs,
            sequence,
        };
        provider.compute_route(&request).expect("simulated route")
    }

    #[test]
    fn test_jittered_distance_in_range() {
        let provider = SimulatedRoutingProvider::with_seed(7);
        for sequence in 0..20 {
            let metrics = run(&provider, sequence);
            assert!(metrics.distance >= 5000.0 && metrics.distance <= 11000.0);
            assert!(metrics.legs.is_none());
        }
    }

    #[test]
    fn test_duration_includes_stop_time() {
        let provider = SimulatedRoutingProvider::with_seed(1);
        let metrics = run(&provider, 0);
        let driving = metrics.distance / 1000.0 * 180.0;
        let expected = (driving + 2.0 * 1800.0).round();
        assert_eq!(metrics.duration, expected);
    }

    #[test]
    fn test_traffic_cycles_by_sequence() {
        let provider = SimulatedRoutingProvider::default();
        assert_eq!(run(&provider, 0).traffic, Some(TrafficFactor::Low));
        assert_eq!(run(&provider, 1).traffic, Some(TrafficFactor::Medium));
        assert_eq!(run(&provider, 2).traffic, Some(TrafficFactor::High));
        assert_eq!(run(&provider, 3).traffic, Some(TrafficFactor::Low));
    }

    #[test]
    fn test_deterministic_for_seed() {
        let a = SimulatedRoutingProvider::with_seed(42);
        let b = SimulatedRoutingProvider::with_seed(42);
        assert_eq!(run(&a, 3), run(&b, 3));
    }

    #[test]
    fn test_request_seed_is_fixed() {
        let coords = [(37.3541, -121.9552), (37.3382, -121.8863)];
        let seed = request_seed(42, 3, &coords);

        assert_eq!(&seed[0..8], &42u64.to_le_bytes());
        assert_eq!(&seed[8..16], &3u64.to_le_bytes());
        assert_eq!(seed, request_seed(42, 3, &coords));
        assert_ne!(seed, request_seed(42, 3, &[(37.3541, -121.9552)]));
        assert_ne!(seed, request_seed(42, 3, &[(37.3382, -121.8863), (37.3541, -121.9552)]));
        assert_eq!(mix64(0), 0xE220_A839_7B1D_CDAF);
    }

    #[test]
    fn test_score_adjustment_bounds() {
        let provider = SimulatedRoutingProvider::with_seed(9);
        for sequence in 0..5 {
            let adjustment = run(&provider, sequence).score_adjustment;
            let penalty = 2 * sequence as i32;
            assert!(adjustment >= -penalty - 5 && adjustment <= -penalty + 5);
        }
    }

    #[test]
    fn test_great_circle_reports_legs() {
        let provider = SimulatedRoutingProvider::new(SimulationConfig {
            seed: 0,
            model: DistanceModel::GreatCircle { detour_factor: 1.3 },
        });
        let metrics = run(&provider, 0);
        let legs = metrics.legs.expect("legs");
        assert_eq!(legs.len(), 2);
        let total: f64 = legs.iter().map(|leg| leg.distance).sum();
        assert!((total - metrics.distance).abs() < 1e-6);
    }
}
