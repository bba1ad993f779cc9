//! Inactivity decay.
//!
//! A scheduled batch that regresses unused domain ratings toward baseline
//! while growing their uncertainty. Each row is processed in its own
//! transaction with a re-checked timestamp precondition, so a session
//! completing mid-batch simply wins and the decay attempt is dropped.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::engine::constants::{
    rd_aging_constant, DECAY_RATING_REGRESSION, DECAY_RD_PERIODS, INITIAL_VIBE_LEVEL, MAX_RATING,
    MAX_RD, MIN_RATING, MIN_RD,
};
use crate::engine::glicko::Glicko2State;
use crate::storage::database::{Database, DatabaseError};
use crate::storage::vibe_store::{
    ChangeReason, DomainVibeLevel, VibeLevelChange, VibeStore, VibeStoreError,
};

/// Changes smaller than this are treated as "no change": no write, no
/// audit row.
const MIN_DECAY_DELTA: f64 = 0.01;

/// Outcome counts for one decay batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecayReport {
    /// Candidate rows selected
    pub scanned: usize,
    /// Rows decayed and audited
    pub decayed: usize,
    /// Rows skipped (no effective change, or lost the timestamp re-check)
    pub skipped: usize,
    /// Rows that errored; the batch continued past them
    pub failed: usize,
}

/// Decay errors. Per-row failures are tolerated and counted; only
/// selection-level failures abort the batch.
#[derive(Debug, Error)]
pub enum DecayError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Store(#[from] VibeStoreError),
}

/// One decay step: regress the rating toward baseline, grow the deviation,
/// leave volatility alone. Pure; same bounds as the session-path updater.
pub fn decay_state(state: &Glicko2State) -> Glicko2State {
    let rating = (state.rating + (INITIAL_VIBE_LEVEL - state.rating) * DECAY_RATING_REGRESSION)
        .clamp(MIN_RATING, MAX_RATING);

    let c = rd_aging_constant();
    let rd_grown = (state.rating_deviation * state.rating_deviation + c * c / DECAY_RD_PERIODS)
        .sqrt()
        .clamp(MIN_RD, MAX_RD);

    Glicko2State {
        rating,
        rating_deviation: rd_grown,
        volatility: state.volatility,
    }
}

/// Run one decay batch over every row inactive for longer than
/// `inactivity_days`.
pub fn run_decay_batch(
    db: &mut Database,
    inactivity_days: i64,
    now: DateTime<Utc>,
) -> Result<DecayReport, DecayError> {
    let cutoff = now - Duration::days(inactivity_days);
    let candidates = VibeStore::new(db.connection()).decay_candidates(cutoff)?;

    let mut report = DecayReport {
        scanned: candidates.len(),
        ..Default::default()
    };

    for level in candidates {
        match decay_row(db, &level, cutoff, now, inactivity_days) {
            Ok(true) => report.decayed += 1,
            Ok(false) => report.skipped += 1,
            Err(e) => {
                tracing::warn!(
                    user_id = %level.user_id,
                    domain = %level.domain,
                    error = %e,
                    "decay failed for row, continuing batch"
                );
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        scanned = report.scanned,
        decayed = report.decayed,
        skipped = report.skipped,
        failed = report.failed,
        "decay batch finished"
    );

    Ok(report)
}

/// Decay one row inside its own transaction. Returns whether the row was
/// actually updated.
fn decay_row(
    db: &mut Database,
    level: &DomainVibeLevel,
    cutoff: DateTime<Utc>,
    now: DateTime<Utc>,
    inactivity_days: i64,
) -> Result<bool, DecayError> {
    let decayed = decay_state(&level.state());

    let rating_delta = (decayed.rating - level.rating).abs();
    let rd_delta = (decayed.rating_deviation - level.rating_deviation).abs();
    if rating_delta < MIN_DECAY_DELTA && rd_delta < MIN_DECAY_DELTA {
        // Already at the bounds; nothing to persist or audit.
        return Ok(false);
    }

    let tx = db.transaction()?;
    let applied = {
        let store = VibeStore::new(&tx);

        let mut updated = level.clone();
        updated.rating = decayed.rating;
        updated.rating_deviation = decayed.rating_deviation;
        updated.volatility = decayed.volatility;

        // The row may have been refreshed by a session since selection; the
        // conditional update silently drops the decay in that case.
        let applied = store.apply_decay(&updated, cutoff, now)?;
        if applied {
            store.append_change(&VibeLevelChange {
                user_id: level.user_id,
                domain: level.domain,
                session_id: None,
                old_rating: level.rating,
                new_rating: decayed.rating,
                old_rd: level.rating_deviation,
                new_rd: decayed.rating_deviation,
                change_amount: decayed.rating - level.rating,
                performance_score: 0.0,
                domain_impact: 0.0,
                points_awarded: 0,
                change_reason: ChangeReason::Decay,
                metadata: Some(format!("Inactivity decay after {} days", inactivity_days)),
                created_at: now,
            })?;
        }
        applied
    };
    tx.commit()
        .map_err(|e| DecayError::Database(DatabaseError::TransactionFailed(e.to_string())))?;

    Ok(applied)
}
