//! Bounded enumeration of stop orderings and location assignments.
//!
//! The full search space is N! orderings times the product of every task's
//! option count. Hard caps keep the number of routing calls small while
//! still sampling several orderings and location choices.

use tracing::debug;

use crate::model::{Assignment, Candidate, Location, LocationOptions, Task};

pub const MAX_ORDERINGS: usize = 10;
pub const MAX_COMBINATIONS_PER_ORDERING: usize = 3;
pub const MAX_LOCATIONS_PER_TASK: usize = 2;
pub const MAX_CANDIDATES: usize = 5;

/// Caps applied during candidate generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Orderings kept from the permutation generator.
    pub max_orderings: usize,
    /// Location combinations kept per ordering.
    pub max_combinations_per_ordering: usize,
    /// Options considered per task, in relevance order.
    pub max_locations_per_task: usize,
    /// Candidates handed to evaluation.
    pub max_candidates: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_orderings: MAX_ORDERINGS,
            max_combinations_per_ordering: MAX_COMBINATIONS_PER_ORDERING,
            max_locations_per_task: MAX_LOCATIONS_PER_TASK,
            max_candidates: MAX_CANDIDATES,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CandidateGenerator {
    limits: SearchLimits,
}

impl CandidateGenerator {
    pub fn new(limits: SearchLimits) -> Self {
        Self { limits }
    }

    /// Candidates to evaluate: the generated pool truncated to `max_candidates`.
    pub fn candidates<'a>(&self, tasks: &'a [Task], options: &'a LocationOptions) -> Vec<Candidate<'a>> {
        let mut pool = self.generate(tasks, options);
        pool.truncate(self.limits.max_candidates);
        pool
    }

    /// Every retained combination for every retained ordering, in
    /// ordering-major order.
    pub fn generate<'a>(&self, tasks: &'a [Task], options: &'a LocationOptions) -> Vec<Candidate<'a>> {
        if tasks.is_empty() {
            return Vec::new();
        }

        let orderings = self.orderings(tasks);
        let mut pool = Vec::new();
        for ordering in &orderings {
            pool.extend(self.combinations(ordering, options));
        }

        debug!(
            tasks = tasks.len(),
            orderings = orderings.len(),
            candidates = pool.len(),
            "generated route candidates"
        );
        pool
    }

    /// First `max_orderings` permutations of `tasks`.
    ///
    /// Enumeration picks each remaining task in input order as the next
    /// element, so the first ordering is always the input order.
    pub fn orderings<'a>(&self, tasks: &'a [Task]) -> Vec<Vec<&'a Task>> {
        let mut out = Vec::new();
        let remaining: Vec<&Task> = tasks.iter().collect();
        let mut prefix = Vec::with_capacity(tasks.len());
        permute(&mut prefix, remaining, self.limits.max_orderings, &mut out);
        out
    }

    /// Depth-first location assignments for one ordering, first found first.
    pub fn combinations<'a>(&self, ordering: &[&'a Task], options: &'a LocationOptions) -> Vec<Candidate<'a>> {
        let per_task: Vec<Vec<&'a Location>> = ordering
            .iter()
            .map(|task| {
                options
                    .get(&task.id)
                    .map(|locations| {
                        locations
                            .iter()
                            .take(self.limits.max_locations_per_task)
                            .filter(|location| location.is_usable())
                            .collect()
                    })
                    .unwrap_or_default()
            })
            .collect();

        if per_task.iter().any(|locations| locations.is_empty()) {
            return Vec::new();
        }

        let mut out = Vec::new();
        let mut current = Vec::with_capacity(ordering.len());
        assign(ordering, &per_task, &mut current, self.limits.max_combinations_per_ordering, &mut out);
        out
    }
}

fn permute<'a>(prefix: &mut Vec<&'a Task>, remaining: Vec<&'a Task>, limit: usize, out: &mut Vec<Vec<&'a Task>>) {
    if out.len() >= limit {
        return;
    }
    if remaining.is_empty() {
        out.push(prefix.clone());
        return;
    }

    for i in 0..remaining.len() {
        if out.len() >= limit {
            return;
        }
        let mut rest = remaining.clone();
        let next = rest.remove(i);
        prefix.push(next);
        permute(prefix, rest, limit, out);
        prefix.pop();
    }
}

fn assign<'a>(
    ordering: &[&'a Task],
    per_task: &[Vec<&'a Location>],
    current: &mut Vec<Assignment<'a>>,
    limit: usize,
    out: &mut Vec<Candidate<'a>>,
) {
    if out.len() >= limit {
        return;
    }
    let position = current.len();
    if position == ordering.len() {
        out.push(Candidate::new(current.clone()));
        return;
    }

    for &location in &per_task[position] {
        if out.len() >= limit {
            return;
        }
        current.push(Assignment {
            task: ordering[position],
            location,
        });
        assign(ordering, per_task, current, limit, out);
        current.pop();
    }
}
