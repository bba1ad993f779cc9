//! Session-completion processing.
//!
//! Runs the full pipeline for one completed session: aggregate metrics,
//! detect domain impacts, score, update ratings and award points. All
//! rating writes and audit rows for a session land in one transaction;
//! the balance bonus requires either fully-old or fully-new values for all
//! domains, never a mix.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::engine::aggregator::aggregate_session;
use crate::engine::detector::{detect_session_domains, DomainImpact};
use crate::engine::domain::Domain;
use crate::engine::fitness::calculate_general_fitness_score;
use crate::engine::glicko::update_glicko2_rating;
use crate::engine::points::{calculate_points_from_vibe_level, domain_balance_bonus};
use crate::engine::scorer::calculate_performance_score;
use crate::session::types::{ExerciseCatalog, WorkoutSession};
use crate::storage::database::{Database, DatabaseError};
use crate::storage::vibe_store::{ChangeReason, VibeLevelChange, VibeStore, VibeStoreError};

/// Observability seam for the "points awarded" counter. Operational
/// visibility only; processing does not depend on it.
pub trait PointsRecorder {
    fn record_points(&self, rule: &str, points: u32);
}

/// Emits the counter through the tracing pipeline.
pub struct TracingPointsRecorder;

impl PointsRecorder for TracingPointsRecorder {
    fn record_points(&self, rule: &str, points: u32) {
        tracing::info!(rule, points, "points awarded");
    }
}

/// Discards counter increments.
pub struct NoopPointsRecorder;

impl PointsRecorder for NoopPointsRecorder {
    fn record_points(&self, _rule: &str, _points: u32) {}
}

/// Result of updating one domain for one session.
#[derive(Debug, Clone)]
pub struct DomainUpdate {
    pub domain: Domain,
    pub impact: f64,
    pub performance_score: f64,
    pub old_rating: f64,
    pub new_rating: f64,
    pub old_rd: f64,
    pub new_rd: f64,
    pub points_awarded: u32,
}

/// Everything the caller needs after a session is processed.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub updates: Vec<DomainUpdate>,
    pub total_points: u32,
    /// General fitness score after this session's updates
    pub general_fitness_score: f64,
}

/// Session processing errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Store(#[from] VibeStoreError),

    #[error("Commit failed: {0}")]
    CommitFailed(String),
}

/// Process one completed session atomically.
///
/// Either every impacted domain's rating and audit row is written, or none
/// are. Retry policy belongs to the caller.
pub fn process_session(
    db: &mut Database,
    session: &WorkoutSession,
    catalog: &ExerciseCatalog,
    recorder: &dyn PointsRecorder,
    now: DateTime<Utc>,
) -> Result<SessionOutcome, ProcessError> {
    let metrics = aggregate_session(session, catalog);
    let impacts = fold_impacts(detect_session_domains(&metrics));

    tracing::debug!(
        session_id = %session.id,
        domains = impacts.len(),
        "processing completed session"
    );

    let tx = db.transaction()?;
    let mut updates = Vec::with_capacity(impacts.len());
    let mut post_ratings: HashMap<Domain, f64>;
    {
        let store = VibeStore::new(&tx);

        // One snapshot before any write: scores and balance bonuses for every
        // domain of this session are computed against pre-update values.
        let snapshot = store.get_all_levels(session.user_id, now)?;
        let rating_snapshot: HashMap<Domain, f64> = snapshot
            .iter()
            .map(|(domain, level)| (*domain, level.rating))
            .collect();
        post_ratings = rating_snapshot.clone();

        for impact in &impacts {
            let level = &snapshot[&impact.domain];

            let score = calculate_performance_score(&metrics, impact.domain, level.rating);
            let new_state = update_glicko2_rating(&level.state(), score / 100.0, impact.impact);
            let bonus = domain_balance_bonus(&rating_snapshot, impact.domain);
            let change_amount = new_state.rating - level.rating;
            let points = calculate_points_from_vibe_level(
                change_amount,
                impact.impact,
                score,
                new_state.rating_deviation,
                bonus,
            );

            let mut updated = level.clone();
            updated.rating = new_state.rating;
            updated.rating_deviation = new_state.rating_deviation;
            updated.volatility = new_state.volatility;
            updated.last_updated_at = Some(now);
            store.upsert_level(&updated)?;

            store.append_change(&VibeLevelChange {
                user_id: session.user_id,
                domain: impact.domain,
                session_id: Some(session.id),
                old_rating: level.rating,
                new_rating: new_state.rating,
                old_rd: level.rating_deviation,
                new_rd: new_state.rating_deviation,
                change_amount,
                performance_score: score,
                domain_impact: impact.impact,
                points_awarded: points,
                change_reason: ChangeReason::SessionCompleted,
                metadata: Some(impact.reason.clone()),
                created_at: now,
            })?;

            post_ratings.insert(impact.domain, new_state.rating);
            updates.push(DomainUpdate {
                domain: impact.domain,
                impact: impact.impact,
                performance_score: score,
                old_rating: level.rating,
                new_rating: new_state.rating,
                old_rd: level.rating_deviation,
                new_rd: new_state.rating_deviation,
                points_awarded: points,
            });
        }
    }
    tx.commit()
        .map_err(|e| ProcessError::CommitFailed(e.to_string()))?;

    for update in &updates {
        recorder.record_points(update.domain.code(), update.points_awarded);
    }

    let total_points = updates.iter().map(|u| u.points_awarded).sum();
    let outcome = SessionOutcome {
        session_id: session.id,
        user_id: session.user_id,
        updates,
        total_points,
        general_fitness_score: calculate_general_fitness_score(&post_ratings),
    };

    tracing::info!(
        session_id = %session.id,
        user_id = %session.user_id,
        total_points,
        fitness = outcome.general_fitness_score,
        "session processed"
    );

    Ok(outcome)
}

/// Keep at most one impact entry per domain. The detector can emit two
/// explosivity entries (RPE and power paths); the list is sorted by
/// descending impact, so the first entry per domain is the strongest.
fn fold_impacts(impacts: Vec<DomainImpact>) -> Vec<DomainImpact> {
    let mut seen: Vec<Domain> = Vec::new();
    impacts
        .into_iter()
        .filter(|entry| {
            if seen.contains(&entry.domain) {
                false
            } else {
                seen.push(entry.domain);
                true
            }
        })
        .collect()
}
