//! Performance scoring.
//!
//! Converts session metrics into a normalized 0-100 score for one domain,
//! relative to what the athlete's current rating predicts. 50 means the
//! session matched expectations; higher ratings raise the bar, so the same
//! session scores lower for a stronger athlete.

use crate::engine::aggregator::SessionMetrics;
use crate::engine::constants::INITIAL_VIBE_LEVEL;
use crate::engine::domain::Domain;

fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// Score a session's metrics against a domain and the athlete's current
/// rating in that domain. Always returns a value in [0, 100].
pub fn calculate_performance_score(
    metrics: &SessionMetrics,
    domain: Domain,
    current_rating: f64,
) -> f64 {
    let duration = metrics.session_duration_min;
    let avg_rpe = metrics.average_rpe;

    let score = match domain {
        Domain::Strength => {
            // Expected total load scales with rating above baseline.
            let expected_kg = ((current_rating - INITIAL_VIBE_LEVEL) * 0.5).max(50.0);
            let ratio = metrics.total_weight_kg / expected_kg;
            50.0 + (ratio - 1.0) * 50.0
        }
        Domain::Endurance => {
            let km = metrics.total_distance_m / 1000.0;
            let expected_km = ((current_rating - INITIAL_VIBE_LEVEL) * 0.01).max(2.0);
            let distance_score = clamp_score(50.0 * km / expected_km);
            let time_score = (duration / 90.0 * 100.0).min(100.0);
            if km > 0.0 {
                distance_score * 0.6 + time_score * 0.4
            } else {
                time_score
            }
        }
        Domain::Explosivity => metrics.max_rpe.map_or(50.0, |rpe| rpe * 10.0),
        Domain::Agility => {
            let reps_score = (metrics.total_reps as f64 / 2.0).min(100.0);
            let rpe_score = avg_rpe.map_or(50.0, |rpe| rpe * 10.0);
            (reps_score + rpe_score) / 2.0
        }
        Domain::Regeneration => {
            // Low effort and a moderate (~45 min) duration are ideal.
            let rpe_score = avg_rpe.map_or(50.0, |rpe| clamp_score((6.0 - rpe) * 20.0));
            let duration_score = clamp_score(100.0 - (duration - 45.0).abs() * 2.0);
            (rpe_score + duration_score) / 2.0
        }
        Domain::Intelligence => generic_score(duration, avg_rpe),
    };

    clamp_score(score)
}

/// Duration + RPE fallback used for domains without a dedicated formula.
fn generic_score(duration_min: f64, avg_rpe: Option<f64>) -> f64 {
    duration_min / 60.0 * 50.0 + avg_rpe.unwrap_or(5.0) * 5.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn metrics() -> SessionMetrics {
        SessionMetrics::default()
    }

    #[test]
    fn test_strength_at_expected_load_scores_fifty() {
        let mut m = metrics();
        m.total_weight_kg = 500.0;
        // rating 2000 -> expected 500 kg
        let score = calculate_performance_score(&m, Domain::Strength, 2000.0);
        assert!((score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_strength_same_session_scores_lower_for_higher_rating() {
        let mut m = metrics();
        m.total_weight_kg = 300.0;
        let beginner = calculate_performance_score(&m, Domain::Strength, 1000.0);
        let advanced = calculate_performance_score(&m, Domain::Strength, 2000.0);
        assert!(beginner > advanced);
    }

    #[test]
    fn test_endurance_blends_distance_and_time() {
        let mut m = metrics();
        m.total_distance_m = 4000.0;
        m.session_duration_min = 45.0;
        // distance: 50*4/2 = 100 (clamped), time: 50 -> 0.6*100 + 0.4*50 = 80
        let score = calculate_performance_score(&m, Domain::Endurance, 1000.0);
        assert!((score - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_explosivity_uses_max_rpe_directly() {
        let mut m = metrics();
        m.max_rpe = Some(9.0);
        assert_eq!(calculate_performance_score(&m, Domain::Explosivity, 1200.0), 90.0);

        m.max_rpe = None;
        assert_eq!(calculate_performance_score(&m, Domain::Explosivity, 1200.0), 50.0);
    }

    #[test]
    fn test_regeneration_rewards_easy_moderate_sessions() {
        let mut m = metrics();
        m.average_rpe = Some(2.0);
        m.session_duration_min = 45.0;
        // rpe: (6-2)*20 = 80, duration: 100 -> 90
        let score = calculate_performance_score(&m, Domain::Regeneration, 1000.0);
        assert!((score - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_domains_stay_in_range() {
        let mut extreme = metrics();
        extreme.total_weight_kg = 100_000.0;
        extreme.total_distance_m = 500_000.0;
        extreme.total_reps = 10_000;
        extreme.session_duration_min = 600.0;
        extreme.average_rpe = Some(10.0);
        extreme.max_rpe = Some(10.0);
        extreme.exercise_types = HashSet::from(["skill".to_string()]);

        for m in [metrics(), extreme] {
            for domain in Domain::ALL {
                for rating in [100.0, 1000.0, 2000.0, 3000.0] {
                    let score = calculate_performance_score(&m, domain, rating);
                    assert!((0.0..=100.0).contains(&score), "{domain} {rating} -> {score}");
                }
            }
        }
    }
}
