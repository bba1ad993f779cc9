//! Inbound session snapshot types.
//!
//! A completed session arrives fully materialized from the session
//! collaborator: exercises with optional actual-effort fields and nested
//! sets. Exercise type codes come from a separate catalog lookup supplied
//! by the exercise catalog collaborator.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A completed workout session as handed to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSession {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// When the session started
    pub started_at: Option<DateTime<Utc>>,
    /// When the session was completed
    pub completed_at: Option<DateTime<Utc>>,
    /// Exercises performed, in order
    pub exercises: Vec<SessionExercise>,
}

/// One exercise within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExercise {
    /// Catalog identifier for type-code resolution
    pub exercise_id: Uuid,
    /// Exercise-level actual effort, when recorded
    pub actual: Option<ActualEffort>,
    /// Individual sets
    pub sets: Vec<ExerciseSet>,
}

/// Exercise-level actuals. Distance is recorded in kilometers here,
/// unlike set-level distance which is in meters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ActualEffort {
    pub rpe: Option<f64>,
    pub distance_km: Option<f64>,
    pub load_kg: Option<f64>,
    pub reps: Option<u32>,
}

/// One recorded set.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ExerciseSet {
    pub reps: Option<u32>,
    pub weight_kg: Option<f64>,
    pub distance_m: Option<f64>,
    pub rpe: Option<f64>,
}

/// Lookup of exercise ids to lowercase type codes (e.g. "yoga", "skill").
///
/// Exercises missing from the catalog are treated as having an unknown
/// type and contribute nothing to the session's type set.
#[derive(Debug, Clone, Default)]
pub struct ExerciseCatalog {
    types: HashMap<Uuid, String>,
}

impl ExerciseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type code for an exercise. Codes are lowercased.
    pub fn insert(&mut self, exercise_id: Uuid, type_code: &str) {
        self.types.insert(exercise_id, type_code.to_lowercase());
    }

    /// Resolve an exercise's type code, if cataloged.
    pub fn type_code(&self, exercise_id: Uuid) -> Option<&str> {
        self.types.get(&exercise_id).map(String::as_str)
    }
}
