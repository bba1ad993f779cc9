//! Persistence for domain rating state and the rating audit trail.
//!
//! All operations take a borrowed connection so callers control the
//! transaction boundary: the session processor runs every write of one
//! session inside a single transaction, the decay batch scopes each row to
//! its own.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;
use uuid::Uuid;

use crate::engine::constants::{INITIAL_RD, INITIAL_VIBE_LEVEL, INITIAL_VOLATILITY};
use crate::engine::domain::Domain;
use crate::engine::glicko::Glicko2State;

/// One user's rating state in one domain.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainVibeLevel {
    pub user_id: Uuid,
    pub domain: Domain,
    pub rating: f64,
    pub rating_deviation: f64,
    pub volatility: f64,
    /// None until the first session or decay write
    pub last_updated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl DomainVibeLevel {
    /// Default state for a domain the user has never trained.
    pub fn fresh(user_id: Uuid, domain: Domain, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            domain,
            rating: INITIAL_VIBE_LEVEL,
            rating_deviation: INITIAL_RD,
            volatility: INITIAL_VOLATILITY,
            last_updated_at: None,
            created_at: now,
        }
    }

    /// The Glicko-2 triple for this row.
    pub fn state(&self) -> Glicko2State {
        Glicko2State::new(self.rating, self.rating_deviation, self.volatility)
    }
}

/// Why a rating row was mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeReason {
    SessionCompleted,
    Decay,
}

impl ChangeReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeReason::SessionCompleted => "session_completed",
            ChangeReason::Decay => "decay",
        }
    }

    pub fn from_str(s: &str) -> Option<ChangeReason> {
        match s {
            "session_completed" => Some(ChangeReason::SessionCompleted),
            "decay" => Some(ChangeReason::Decay),
            _ => None,
        }
    }
}

/// One audit-trail entry. Append-only; forms the complete provenance of a
/// rating value.
#[derive(Debug, Clone, PartialEq)]
pub struct VibeLevelChange {
    pub user_id: Uuid,
    pub domain: Domain,
    /// None for decay-originated entries
    pub session_id: Option<Uuid>,
    pub old_rating: f64,
    pub new_rating: f64,
    pub old_rd: f64,
    pub new_rd: f64,
    pub change_amount: f64,
    pub performance_score: f64,
    pub domain_impact: f64,
    pub points_awarded: u32,
    pub change_reason: ChangeReason,
    /// Free-form reason text (detector reason, decay note)
    pub metadata: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Store for rating state and audit rows.
pub struct VibeStore<'a> {
    conn: &'a Connection,
}

impl<'a> VibeStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Read one domain row, falling back to the lazy default when absent.
    pub fn get_level(
        &self,
        user_id: Uuid,
        domain: Domain,
        now: DateTime<Utc>,
    ) -> Result<DomainVibeLevel, VibeStoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT user_id, domain, rating, rating_deviation, volatility,
                        last_updated_at, created_at
                 FROM domain_vibe_levels WHERE user_id = ?1 AND domain = ?2",
                params![user_id.to_string(), domain.code()],
                parse_level_row,
            )
            .optional()?;

        Ok(row.unwrap_or_else(|| DomainVibeLevel::fresh(user_id, domain, now)))
    }

    /// Read the full six-domain rating set for a user, defaulting missing
    /// domains. The balance bonus and fitness score depend on this snapshot
    /// being taken before any of the session's writes.
    pub fn get_all_levels(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<HashMap<Domain, DomainVibeLevel>, VibeStoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, domain, rating, rating_deviation, volatility,
                    last_updated_at, created_at
             FROM domain_vibe_levels WHERE user_id = ?1",
        )?;

        let mut levels: HashMap<Domain, DomainVibeLevel> = stmt
            .query_map(params![user_id.to_string()], parse_level_row)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|level| (level.domain, level))
            .collect();

        for domain in Domain::ALL {
            levels
                .entry(domain)
                .or_insert_with(|| DomainVibeLevel::fresh(user_id, domain, now));
        }

        Ok(levels)
    }

    /// Insert or update a domain row, refreshing `last_updated_at`.
    pub fn upsert_level(&self, level: &DomainVibeLevel) -> Result<(), VibeStoreError> {
        self.conn.execute(
            "INSERT INTO domain_vibe_levels
             (user_id, domain, rating, rating_deviation, volatility, last_updated_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(user_id, domain) DO UPDATE SET
               rating = excluded.rating,
               rating_deviation = excluded.rating_deviation,
               volatility = excluded.volatility,
               last_updated_at = excluded.last_updated_at",
            params![
                level.user_id.to_string(),
                level.domain.code(),
                level.rating,
                level.rating_deviation,
                level.volatility,
                level.last_updated_at.map(|t| t.to_rfc3339()),
                level.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    /// Conditionally apply a decay write: the update only lands if the row
    /// is still older than the cutoff, so a racing session update wins.
    /// Returns false when the precondition no longer holds.
    pub fn apply_decay(
        &self,
        level: &DomainVibeLevel,
        cutoff: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<bool, VibeStoreError> {
        let updated = self.conn.execute(
            "UPDATE domain_vibe_levels SET
               rating = ?1, rating_deviation = ?2, volatility = ?3, last_updated_at = ?4
             WHERE user_id = ?5 AND domain = ?6
               AND last_updated_at IS NOT NULL AND last_updated_at < ?7",
            params![
                level.rating,
                level.rating_deviation,
                level.volatility,
                now.to_rfc3339(),
                level.user_id.to_string(),
                level.domain.code(),
                cutoff.to_rfc3339(),
            ],
        )?;

        Ok(updated > 0)
    }

    /// Select rows eligible for decay: last updated before the cutoff.
    /// Rows never written by a session (NULL timestamp) are still at their
    /// defaults and are not candidates.
    pub fn decay_candidates(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<DomainVibeLevel>, VibeStoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, domain, rating, rating_deviation, volatility,
                    last_updated_at, created_at
             FROM domain_vibe_levels
             WHERE last_updated_at IS NOT NULL AND last_updated_at < ?1
             ORDER BY user_id, domain",
        )?;

        let rows = stmt.query_map(params![cutoff.to_rfc3339()], parse_level_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(VibeStoreError::from)
    }

    /// Append one audit-trail row.
    pub fn append_change(&self, change: &VibeLevelChange) -> Result<(), VibeStoreError> {
        self.conn.execute(
            "INSERT INTO vibe_level_changes
             (user_id, domain, session_id, old_rating, new_rating, old_rd, new_rd,
              change_amount, performance_score, domain_impact, points_awarded,
              change_reason, metadata, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                change.user_id.to_string(),
                change.domain.code(),
                change.session_id.map(|id| id.to_string()),
                change.old_rating,
                change.new_rating,
                change.old_rd,
                change.new_rd,
                change.change_amount,
                change.performance_score,
                change.domain_impact,
                change.points_awarded,
                change.change_reason.as_str(),
                change.metadata,
                change.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    /// Audit rows for a user, most recent first.
    pub fn changes_for_user(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> Result<Vec<VibeLevelChange>, VibeStoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, domain, session_id, old_rating, new_rating, old_rd, new_rd,
                    change_amount, performance_score, domain_impact, points_awarded,
                    change_reason, metadata, created_at
             FROM vibe_level_changes
             WHERE user_id = ?1
             ORDER BY id DESC
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![user_id.to_string(), limit], parse_change_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(VibeStoreError::from)
    }

    /// Audit rows produced by one session, in write order.
    pub fn changes_for_session(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<VibeLevelChange>, VibeStoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, domain, session_id, old_rating, new_rating, old_rd, new_rd,
                    change_amount, performance_score, domain_impact, points_awarded,
                    change_reason, metadata, created_at
             FROM vibe_level_changes
             WHERE session_id = ?1
             ORDER BY id ASC",
        )?;

        let rows = stmt.query_map(params![session_id.to_string()], parse_change_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(VibeStoreError::from)
    }
}

/// Parse a database row into a DomainVibeLevel.
fn parse_level_row(row: &rusqlite::Row) -> rusqlite::Result<DomainVibeLevel> {
    let user_id_str: String = row.get(0)?;
    let domain_str: String = row.get(1)?;
    let last_updated_str: Option<String> = row.get(5)?;
    let created_at_str: String = row.get(6)?;

    Ok(DomainVibeLevel {
        user_id: Uuid::parse_str(&user_id_str).unwrap_or_default(),
        domain: Domain::from_code(&domain_str).unwrap_or(Domain::Intelligence),
        rating: row.get(2)?,
        rating_deviation: row.get(3)?,
        volatility: row.get(4)?,
        last_updated_at: last_updated_str.and_then(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|t| t.with_timezone(&Utc))
                .ok()
        }),
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

/// Parse a database row into a VibeLevelChange.
fn parse_change_row(row: &rusqlite::Row) -> rusqlite::Result<VibeLevelChange> {
    let user_id_str: String = row.get(0)?;
    let domain_str: String = row.get(1)?;
    let session_id_str: Option<String> = row.get(2)?;
    let reason_str: String = row.get(11)?;
    let created_at_str: String = row.get(13)?;

    Ok(VibeLevelChange {
        user_id: Uuid::parse_str(&user_id_str).unwrap_or_default(),
        domain: Domain::from_code(&domain_str).unwrap_or(Domain::Intelligence),
        session_id: session_id_str.and_then(|s| Uuid::parse_str(&s).ok()),
        old_rating: row.get(3)?,
        new_rating: row.get(4)?,
        old_rd: row.get(5)?,
        new_rd: row.get(6)?,
        change_amount: row.get(7)?,
        performance_score: row.get(8)?,
        domain_impact: row.get(9)?,
        points_awarded: row.get(10)?,
        change_reason: ChangeReason::from_str(&reason_str)
            .unwrap_or(ChangeReason::SessionCompleted),
        metadata: row.get(12)?,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

/// Vibe store errors.
#[derive(Debug, Error)]
pub enum VibeStoreError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
}
