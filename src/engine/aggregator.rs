//! Session metrics aggregation.
//!
//! Flattens a session's exercises and sets into scalar totals that the
//! domain detector and performance scorer consume. Pure function of the
//! session snapshot; also the validation boundary for malformed numerics
//! (negative or non-finite values are dropped here so the rating updater
//! only ever sees well-formed floats).

use std::collections::HashSet;

use crate::session::types::{ExerciseCatalog, WorkoutSession};

/// Scalar totals for one completed session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionMetrics {
    /// Total weight moved, kg (load × reps across actuals and sets)
    pub total_weight_kg: f64,
    /// Total distance covered, meters
    pub total_distance_m: f64,
    /// Total reps across all sets
    pub total_reps: u32,
    /// Session duration in minutes, 0 if timestamps are missing
    pub session_duration_min: f64,
    /// Mean RPE over all recorded values, if any
    pub average_rpe: Option<f64>,
    /// Maximum RPE over all recorded values, if any
    pub max_rpe: Option<f64>,
    /// Lowercase type codes of the session's cataloged exercises
    pub exercise_types: HashSet<String>,
}

/// Accept a recorded value only if it is a finite, non-negative number.
fn sanitize(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}

/// Flatten a session into [`SessionMetrics`].
pub fn aggregate_session(session: &WorkoutSession, catalog: &ExerciseCatalog) -> SessionMetrics {
    let mut metrics = SessionMetrics::default();
    let mut rpe_values: Vec<f64> = Vec::new();

    for exercise in &session.exercises {
        if let Some(code) = catalog.type_code(exercise.exercise_id) {
            metrics.exercise_types.insert(code.to_string());
        }

        if let Some(actual) = &exercise.actual {
            let reps = actual.reps.unwrap_or(1) as f64;
            if let Some(load) = sanitize(actual.load_kg) {
                metrics.total_weight_kg += load * reps;
            }
            // Exercise-level distance is recorded in km; normalize to meters.
            if let Some(distance_km) = sanitize(actual.distance_km) {
                metrics.total_distance_m += distance_km * 1000.0;
            }
            if let Some(rpe) = sanitize(actual.rpe) {
                rpe_values.push(rpe);
            }
        }

        for set in &exercise.sets {
            let reps = set.reps.unwrap_or(1);
            if let Some(weight) = sanitize(set.weight_kg) {
                metrics.total_weight_kg += weight * reps as f64;
            }
            if let Some(distance_m) = sanitize(set.distance_m) {
                metrics.total_distance_m += distance_m;
            }
            if let Some(rpe) = sanitize(set.rpe) {
                rpe_values.push(rpe);
            }
            metrics.total_reps += set.reps.unwrap_or(0);
        }
    }

    if let (Some(started), Some(completed)) = (session.started_at, session.completed_at) {
        let minutes = (completed - started).num_seconds() as f64 / 60.0;
        metrics.session_duration_min = minutes.max(0.0);
    }

    if !rpe_values.is_empty() {
        let sum: f64 = rpe_values.iter().sum();
        metrics.average_rpe = Some(sum / rpe_values.len() as f64);
        metrics.max_rpe = rpe_values.iter().cloned().fold(None, |max, v| {
            Some(match max {
                Some(m) if m >= v => m,
                _ => v,
            })
        });
    }

    metrics
}
