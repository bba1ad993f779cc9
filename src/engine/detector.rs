//! Heuristic domain detection.
//!
//! Classifies a session's aggregated metrics into weighted domain impacts.
//! Each heuristic is independent and may append zero or more entries; the
//! result is never empty (a fallback entry covers sessions no heuristic
//! recognizes) and is sorted by descending impact.
//!
//! The thresholds and multipliers here are contractual values shared with
//! the live rating history; do not tune them.

use crate::engine::aggregator::SessionMetrics;
use crate::engine::domain::Domain;

/// A weighted classification of one session against one domain.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainImpact {
    pub domain: Domain,
    /// Relevance weight in [0, 1]
    pub impact: f64,
    /// Human-readable trigger description, kept as audit metadata
    pub reason: String,
}

/// Detect which domains a session trained and how strongly.
pub fn detect_session_domains(metrics: &SessionMetrics) -> Vec<DomainImpact> {
    let mut impacts: Vec<DomainImpact> = Vec::new();

    let duration = metrics.session_duration_min;
    let distance_km = metrics.total_distance_m / 1000.0;

    // Strength: any weight moved at all.
    if metrics.total_weight_kg > 0.0 {
        let impact = (metrics.total_weight_kg / 500.0).min(1.0);
        impacts.push(DomainImpact {
            domain: Domain::Strength,
            impact,
            reason: format!("Moved {:.0} kg total", metrics.total_weight_kg),
        });
    }

    // Endurance: covered distance or sustained duration.
    if metrics.total_distance_m > 0.0 || duration > 20.0 {
        let distance_score = (distance_km / 10.0).min(1.0);
        let duration_score = (duration / 60.0).min(1.0);
        // Long low-intensity work reads as recovery-dominant, not endurance.
        let low_intensity = matches!(metrics.average_rpe, Some(rpe) if rpe < 4.0) && duration > 20.0;
        let factor = if low_intensity { 0.3 } else { 0.7 };
        let impact = distance_score.max(duration_score * factor);
        impacts.push(DomainImpact {
            domain: Domain::Endurance,
            impact,
            reason: format!("{:.1} km over {:.0} min", distance_km, duration),
        });
    }

    // Explosivity via peak effort: short sessions hitting very high RPE.
    if let Some(max_rpe) = metrics.max_rpe {
        if max_rpe >= 8.0 && duration < 30.0 {
            let impact = ((max_rpe - 7.0) / 3.0).min(1.0);
            impacts.push(DomainImpact {
                domain: Domain::Explosivity,
                impact,
                reason: format!("Peak RPE {:.1} in a short session", max_rpe),
            });
        }
    }

    // Explosivity via power output: heavy volume compressed into little time.
    let power_output = metrics.total_weight_kg * metrics.total_reps as f64;
    if power_output > 2000.0 && duration < 20.0 {
        let impact = (power_output / 5000.0).min(1.0);
        impacts.push(DomainImpact {
            domain: Domain::Explosivity,
            impact,
            reason: format!("Power output {:.0} in under 20 min", power_output),
        });
    }

    // Agility: bodyweight rep work at moderate intensity.
    if metrics.total_weight_kg == 0.0 && metrics.total_reps > 0 {
        if let Some(avg_rpe) = metrics.average_rpe {
            if (5.0..=8.0).contains(&avg_rpe) {
                let impact = (metrics.total_reps as f64 / 200.0).min(1.0);
                impacts.push(DomainImpact {
                    domain: Domain::Agility,
                    impact,
                    reason: format!("{} unweighted reps at RPE {:.1}", metrics.total_reps, avg_rpe),
                });
            }
        }
    }

    // Regeneration: recovery-focused exercise types.
    if ["yoga", "pilates", "mobility"]
        .iter()
        .any(|code| metrics.exercise_types.contains(*code))
    {
        impacts.push(DomainImpact {
            domain: Domain::Regeneration,
            impact: 0.9,
            reason: "Recovery-focused exercise types".to_string(),
        });
    }

    // Regeneration via easy sustained effort, independent of exercise type.
    if let Some(avg_rpe) = metrics.average_rpe {
        if avg_rpe <= 5.0 && duration > 15.0 {
            let impact = ((6.0 - avg_rpe) / 5.0).min(0.7);
            impacts.push(DomainImpact {
                domain: Domain::Regeneration,
                impact,
                reason: format!("Easy effort (RPE {:.1}) over {:.0} min", avg_rpe, duration),
            });
        }
    }

    // Intelligence: skill-tagged work.
    if metrics.exercise_types.contains("skill") {
        impacts.push(DomainImpact {
            domain: Domain::Intelligence,
            impact: 0.8,
            reason: "Skill-focused exercise types".to_string(),
        });
    }

    // Every session trains something.
    if impacts.is_empty() {
        impacts.push(DomainImpact {
            domain: Domain::Intelligence,
            impact: 0.5,
            reason: "Default domain (no specific metrics detected)".to_string(),
        });
    }

    impacts.sort_by(|a, b| b.impact.partial_cmp(&a.impact).unwrap_or(std::cmp::Ordering::Equal));
    impacts
}
