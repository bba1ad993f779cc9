//! Point awards.
//!
//! Converts a rating delta plus modifiers into a bounded integer point
//! award, and computes the cross-domain balance bonus that nudges athletes
//! toward their weaker domains.

use std::collections::HashMap;

use crate::engine::constants::{INITIAL_VIBE_LEVEL, MAX_POINTS, MAX_RD, MIN_POINTS};
use crate::engine::domain::Domain;

/// Bonus for training a domain that sits below the athlete's average.
///
/// `snapshot` is the athlete's full per-domain rating set read once before
/// any update of the session is applied; missing domains count at baseline.
pub fn domain_balance_bonus(snapshot: &HashMap<Domain, f64>, domain: Domain) -> f64 {
    let avg: f64 = Domain::ALL
        .iter()
        .map(|d| snapshot.get(d).copied().unwrap_or(INITIAL_VIBE_LEVEL))
        .sum::<f64>()
        / Domain::ALL.len() as f64;

    let rating = snapshot.get(&domain).copied().unwrap_or(INITIAL_VIBE_LEVEL);
    if rating < avg {
        ((avg - rating) / 10.0).min(30.0)
    } else {
        0.0
    }
}

/// Convert a rating change into the integer point award, always in [5, 200].
pub fn calculate_points_from_vibe_level(
    vibe_level_change: f64,
    domain_impact: f64,
    performance_score: f64,
    new_rd: f64,
    domain_balance_bonus: f64,
) -> u32 {
    let base_points = vibe_level_change * 2.0;
    let impact_multiplier = 0.5 + domain_impact * 0.5;
    let performance_multiplier = 0.7 + (performance_score / 100.0) * 0.3;
    // High remaining uncertainty slightly discounts the award.
    let rd_modifier = 1.0 - (new_rd / MAX_RD) * 0.1;

    let points = base_points * impact_multiplier * performance_multiplier * rd_modifier
        + domain_balance_bonus;

    points.clamp(MIN_POINTS, MAX_POINTS).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_floor_on_negative_change() {
        let points = calculate_points_from_vibe_level(-50.0, 1.0, 20.0, 100.0, 0.0);
        assert_eq!(points, 5);
    }

    #[test]
    fn test_points_cap_on_huge_change() {
        let points = calculate_points_from_vibe_level(500.0, 1.0, 100.0, 30.0, 30.0);
        assert_eq!(points, 200);
    }

    #[test]
    fn test_points_always_in_range() {
        for change in [-300.0, -1.0, 0.0, 10.0, 150.0, 1000.0] {
            for impact in [0.0, 0.5, 1.0] {
                for score in [0.0, 50.0, 100.0] {
                    for rd in [30.0, 350.0] {
                        for bonus in [0.0, 30.0] {
                            let points =
                                calculate_points_from_vibe_level(change, impact, score, rd, bonus);
                            assert!((5..=200).contains(&points));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_modifier_chain() {
        // change 50 -> base 100; impact 1.0 -> x1.0; score 100 -> x1.0;
        // rd 350 -> x0.9; +10 bonus = 100.
        let points = calculate_points_from_vibe_level(50.0, 1.0, 100.0, 350.0, 10.0);
        assert_eq!(points, 100);
    }

    #[test]
    fn test_balance_bonus_only_below_average() {
        let mut snapshot = HashMap::new();
        snapshot.insert(Domain::Strength, 1600.0);
        // avg = (1600 + 5*1000)/6 = 1100
        assert_eq!(domain_balance_bonus(&snapshot, Domain::Strength), 0.0);
        // agility defaults to 1000, 100 below avg -> 10.0
        assert!((domain_balance_bonus(&snapshot, Domain::Agility) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_balance_bonus_capped() {
        let mut snapshot = HashMap::new();
        snapshot.insert(Domain::Strength, 3000.0);
        snapshot.insert(Domain::Agility, 100.0);
        let bonus = domain_balance_bonus(&snapshot, Domain::Agility);
        assert_eq!(bonus, 30.0);
    }
}
