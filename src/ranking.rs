//! Ranking of evaluated routes and the explanation attached to each.
//!
//! The composite adds a `[0, 100]` score to an inverse-seconds term without
//! normalizing either, so in practice the duration term only breaks near
//! ties. The formula is kept as-is for compatibility with existing clients.

use crate::model::{Route, RouteOption, TrafficFactor};

pub const TOP_K: usize = 5;

#[derive(Debug, Clone)]
pub struct RankingConfig {
    pub preference_weight: f64,
    pub duration_weight: f64,
    /// Maximum number of options returned.
    pub top_k: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            preference_weight: 0.6,
            duration_weight: 0.4,
            top_k: TOP_K,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Ranker {
    config: RankingConfig,
}

impl Ranker {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    /// `score * w_pref + (1 / duration) * w_dur`.
    pub fn composite(&self, route: &Route) -> f64 {
        route.preference_score as f64 * self.config.preference_weight
            + (1.0 / route.total_duration) * self.config.duration_weight
    }

    /// Sorts by composite (descending, stable), keeps the top K and
    /// attaches rank, reasoning and label.
    pub fn rank(&self, routes: Vec<Route>) -> Vec<RouteOption> {
        let mut scored: Vec<(f64, Route)> = routes
            .into_iter()
            .map(|route| (self.composite(&route), route))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(self.config.top_k);

        scored
            .into_iter()
            .enumerate()
            .map(|(index, (_, route))| RouteOption {
                reasoning: reasoning(&route),
                alternative_label: alternative_label(index),
                ranking: index + 1,
                route,
            })
            .collect()
    }
}

/// Human-readable summary of a route's time, distance, fit and traffic.
pub fn reasoning(route: &Route) -> String {
    let minutes = (route.total_duration / 60.0).round();
    let kilometers = route.total_distance / 1000.0;

    let mut text = format!(
        "This route takes {} minutes and covers {:.1}km. ",
        minutes, kilometers
    );

    text.push_str(match route.preference_score {
        80.. => "Excellent preference match - all your requirements are satisfied!",
        60..=79 => "Good preference match - most of your requirements are met.",
        _ => "Fair preference match - some trade-offs were made for efficiency.",
    });

    match route.traffic_factor {
        TrafficFactor::High => text.push_str(" Note: High traffic expected on this route."),
        TrafficFactor::Low => text.push_str(" Light traffic conditions expected."),
        TrafficFactor::Medium => {}
    }

    text
}

/// Label for a 0-based position in the ranked list.
pub fn alternative_label(index: usize) -> String {
    match index {
        0 => "Best Overall".to_string(),
        1..=4 => format!("Alternative {}", index),
        _ => format!("Option {}", index + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(id: &str, score: u8, duration: f64, traffic: TrafficFactor) -> Route {
        Route {
            id: id.to_string(),
            waypoints: Vec::new(),
            total_distance: 12_345.0,
            total_duration: duration,
            preference_score: score,
            traffic_factor: traffic,
            estimated_gas_cost: None,
            legs: None,
            geometry: None,
        }
    }

    #[test]
    fn test_rank_orders_by_composite() {
        let routes = vec![
            route("a", 50, 1200.0, TrafficFactor::Medium),
            route("b", 90, 3600.0, TrafficFactor::Medium),
            route("c", 70, 600.0, TrafficFactor::Medium),
        ];
        let ranked = Ranker::default().rank(routes);

        let ids: Vec<&str> = ranked.iter().map(|option| option.route.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert_eq!(ranked.iter().map(|option| option.ranking).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_shorter_duration_breaks_score_tie() {
        let routes = vec![
            route("slow", 60, 3600.0, TrafficFactor::Medium),
            route("fast", 60, 600.0, TrafficFactor::Medium),
        ];
        let ranked = Ranker::default().rank(routes);
        assert_eq!(ranked[0].route.id, "fast");
    }

    #[test]
    fn test_exact_ties_keep_input_order() {
        let routes = vec![
            route("first", 60, 1800.0, TrafficFactor::Medium),
            route("second", 60, 1800.0, TrafficFactor::Medium),
        ];
        let ranked = Ranker::default().rank(routes);
        assert_eq!(ranked[0].route.id, "first");
        assert_eq!(ranked[1].route.id, "second");
    }

    #[test]
    fn test_truncates_to_top_k() {
        let routes = (0..8)
            .map(|i| route(&format!("r{}", i), 50 + i as u8, 1800.0, TrafficFactor::Medium))
            .collect();
        let ranked = Ranker::default().rank(routes);
        assert_eq!(ranked.len(), TOP_K);
        assert_eq!(ranked[0].route.id, "r7");
    }

    #[test]
    fn test_labels() {
        assert_eq!(alternative_label(0), "Best Overall");
        assert_eq!(alternative_label(1), "Alternative 1");
        assert_eq!(alternative_label(4), "Alternative 4");
        assert_eq!(alternative_label(5), "Option 6");
    }

    #[test]
    fn test_reasoning_text() {
        let text = reasoning(&route("a", 85, 2700.0, TrafficFactor::High));
        assert_eq!(
            text,
            "This route takes 45 minutes and covers 12.3km. \
             Excellent preference match - all your requirements are satisfied! \
             Note: High traffic expected on this route."
        );

        let text = reasoning(&route("b", 60, 2700.0, TrafficFactor::Low));
        assert!(text.contains("Good preference match"));
        assert!(text.ends_with("Light traffic conditions expected."));

        let text = reasoning(&route("c", 59, 2700.0, TrafficFactor::Medium));
        assert!(text.ends_with("some trade-offs were made for efficiency."));
    }

    #[test]
    fn test_empty_input() {
        assert!(Ranker::default().rank(Vec::new()).is_empty());
    }
}
