//! General fitness score.
//!
//! Display-only roll-up of all six domain ratings. The geometric mean
//! penalizes lopsided profiles: one inflated domain cannot carry five
//! neglected ones the way an arithmetic mean would.

use std::collections::HashMap;

use crate::engine::constants::INITIAL_VIBE_LEVEL;
use crate::engine::domain::Domain;

/// Geometric mean of all domain ratings, missing domains at baseline,
/// rounded to two decimals.
pub fn calculate_general_fitness_score(ratings: &HashMap<Domain, f64>) -> f64 {
    let log_sum: f64 = Domain::ALL
        .iter()
        .map(|d| ratings.get(d).copied().unwrap_or(INITIAL_VIBE_LEVEL).ln())
        .sum();

    let mean = (log_sum / Domain::ALL.len() as f64).exp();
    (mean * 100.0).round() / 100.0
}
