//! Preference satisfaction scoring.
//!
//! Matching is a case-insensitive substring test against the assigned
//! location's name (and address, for some kinds). It does not tell a chain
//! apart from a street named after it.

use crate::model::{Candidate, Location, Preference, PreferenceKind};

pub const BASE_SCORE: i32 = 50;
pub const MANDATORY_BONUS: i32 = 20;
pub const PREFERRED_BONUS: i32 = 10;
pub const MAX_SCORE: u8 = 100;

/// Pure scoring function over a candidate's task/location assignments.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreferenceScorer;

impl PreferenceScorer {
    /// Score in `[0, 100]`.
    pub fn score(&self, candidate: &Candidate<'_>) -> u8 {
        let additions: i32 = candidate
            .assignments
            .iter()
            .map(|item| {
                let mandatory = item
                    .task
                    .mandatory_preferences()
                    .filter(|pref| mandatory_satisfied(pref, item.location))
                    .count() as i32;
                let preferred = item
                    .task
                    .preferred_preferences()
                    .filter(|pref| preferred_satisfied(pref, item.location))
                    .count() as i32;
                mandatory * MANDATORY_BONUS + preferred * PREFERRED_BONUS
            })
            .sum();

        clamp_score(BASE_SCORE + additions)
    }
}

/// Clamp a raw score into `[0, 100]`.
pub fn clamp_score(raw: i32) -> u8 {
    raw.clamp(0, MAX_SCORE as i32) as u8
}

fn mandatory_satisfied(pref: &Preference, location: &Location) -> bool {
    match pref.kind {
        PreferenceKind::Location | PreferenceKind::Chain => {
            contains_ignore_case(&location.name, &pref.value)
                || contains_ignore_case(&location.address, &pref.value)
        }
        // hours/rating are not matched against location text
        PreferenceKind::Category | PreferenceKind::Hours | PreferenceKind::Rating => false,
    }
}

fn preferred_satisfied(pref: &Preference, location: &Location) -> bool {
    match pref.kind {
        PreferenceKind::Chain => contains_ignore_case(&location.name, &pref.value),
        PreferenceKind::Category => {
            contains_ignore_case(&location.name, &pref.value)
                || contains_ignore_case(&location.address, &pref.value)
        }
        PreferenceKind::Location | PreferenceKind::Hours | PreferenceKind::Rating => false,
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
