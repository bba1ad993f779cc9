//! Decay batch tests against an in-memory database.

use chrono::{Duration, Utc};
use uuid::Uuid;

use vibelevel::decay::run_decay_batch;
use vibelevel::engine::domain::Domain;
use vibelevel::storage::{ChangeReason, Database, DomainVibeLevel, VibeStore};

const INACTIVITY_DAYS: i64 = 14;

fn seed_level(
    db: &Database,
    user_id: Uuid,
    domain: Domain,
    rating: f64,
    rd: f64,
    days_stale: i64,
) {
    let now = Utc::now();
    let store = VibeStore::new(db.connection());
    let mut level = DomainVibeLevel::fresh(user_id, domain, now);
    level.rating = rating;
    level.rating_deviation = rd;
    level.last_updated_at = Some(now - Duration::days(days_stale));
    store.upsert_level(&level).unwrap();
}

#[test]
fn stale_row_decays_toward_baseline_with_audit() {
    let mut db = Database::open_in_memory().unwrap();
    let user_id = Uuid::new_v4();
    seed_level(&db, user_id, Domain::Strength, 1500.0, 100.0, 30);

    let now = Utc::now();
    let report = run_decay_batch(&mut db, INACTIVITY_DAYS, now).unwrap();
    assert_eq!(report.scanned, 1);
    assert_eq!(report.decayed, 1);
    assert_eq!(report.failed, 0);

    let store = VibeStore::new(db.connection());
    let level = store.get_level(user_id, Domain::Strength, now).unwrap();
    assert!(level.rating < 1500.0);
    assert!(level.rating > 1000.0);
    assert!(level.rating_deviation > 100.0);

    let changes = store.changes_for_user(user_id, 10).unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].change_reason, ChangeReason::Decay);
    assert_eq!(changes[0].session_id, None);
    assert_eq!(changes[0].points_awarded, 0);
}

#[test]
fn second_run_is_a_noop() {
    let mut db = Database::open_in_memory().unwrap();
    let user_id = Uuid::new_v4();
    seed_level(&db, user_id, Domain::Endurance, 1800.0, 150.0, 60);

    let now = Utc::now();
    let first = run_decay_batch(&mut db, INACTIVITY_DAYS, now).unwrap();
    assert_eq!(first.decayed, 1);

    // The decay refreshed last_updated_at, so the row is no longer stale.
    let second = run_decay_batch(&mut db, INACTIVITY_DAYS, now).unwrap();
    assert_eq!(second.scanned, 0);
    assert_eq!(second.decayed, 0);

    let store = VibeStore::new(db.connection());
    assert_eq!(store.changes_for_user(user_id, 10).unwrap().len(), 1);
}

#[test]
fn recently_active_rows_are_not_candidates() {
    let mut db = Database::open_in_memory().unwrap();
    let user_id = Uuid::new_v4();
    seed_level(&db, user_id, Domain::Agility, 1400.0, 120.0, 3);

    let report = run_decay_batch(&mut db, INACTIVITY_DAYS, Utc::now()).unwrap();
    assert_eq!(report.scanned, 0);

    let store = VibeStore::new(db.connection());
    let level = store.get_level(user_id, Domain::Agility, Utc::now()).unwrap();
    assert_eq!(level.rating, 1400.0);
}

#[test]
fn never_trained_rows_are_never_decayed() {
    let mut db = Database::open_in_memory().unwrap();
    let user_id = Uuid::new_v4();
    // Row with NULL last_updated_at: present but never written by a session.
    db.connection()
        .execute(
            "INSERT INTO domain_vibe_levels (user_id, domain, rating, rating_deviation,
             volatility, last_updated_at, created_at)
             VALUES (?1, 'strength', 1000.0, 350.0, 0.06, NULL, ?2)",
            rusqlite::params![user_id.to_string(), Utc::now().to_rfc3339()],
        )
        .unwrap();

    let report = run_decay_batch(&mut db, INACTIVITY_DAYS, Utc::now()).unwrap();
    assert_eq!(report.scanned, 0);
}

#[test]
fn row_at_bounds_is_skipped_without_audit() {
    let mut db = Database::open_in_memory().unwrap();
    let user_id = Uuid::new_v4();
    seed_level(&db, user_id, Domain::Regeneration, 1000.0, 350.0, 60);

    let report = run_decay_batch(&mut db, INACTIVITY_DAYS, Utc::now()).unwrap();
    assert_eq!(report.scanned, 1);
    assert_eq!(report.decayed, 0);
    assert_eq!(report.skipped, 1);

    let store = VibeStore::new(db.connection());
    assert!(store.changes_for_user(user_id, 10).unwrap().is_empty());
}
