//! End-to-end session completion tests against an in-memory database.

use chrono::{Duration, Utc};
use uuid::Uuid;

use vibelevel::engine::domain::Domain;
use vibelevel::session::{
    process_session, ExerciseCatalog, ExerciseSet, NoopPointsRecorder, SessionExercise,
    WorkoutSession,
};
use vibelevel::storage::{ChangeReason, Database, VibeStore};

fn session_with_sets(user_id: Uuid, minutes: i64, sets: Vec<ExerciseSet>) -> WorkoutSession {
    let start = Utc::now() - Duration::minutes(minutes);
    WorkoutSession {
        id: Uuid::new_v4(),
        user_id,
        started_at: Some(start),
        completed_at: Some(start + Duration::minutes(minutes)),
        exercises: vec![SessionExercise {
            exercise_id: Uuid::new_v4(),
            actual: None,
            sets,
        }],
    }
}

fn strength_session(user_id: Uuid, weight_kg: f64) -> WorkoutSession {
    session_with_sets(
        user_id,
        10,
        vec![ExerciseSet {
            reps: Some(1),
            weight_kg: Some(weight_kg),
            ..Default::default()
        }],
    )
}

#[test]
fn strength_session_raises_rating_and_audits() {
    let mut db = Database::open_in_memory().unwrap();
    let user_id = Uuid::new_v4();
    let session = strength_session(user_id, 600.0);
    let now = Utc::now();

    let outcome =
        process_session(&mut db, &session, &ExerciseCatalog::new(), &NoopPointsRecorder, now)
            .unwrap();

    assert_eq!(outcome.updates.len(), 1);
    let update = &outcome.updates[0];
    assert_eq!(update.domain, Domain::Strength);
    assert_eq!(update.impact, 1.0);
    assert_eq!(update.old_rating, 1000.0);
    assert!(update.new_rating > 1000.0);
    assert!((5..=200).contains(&update.points_awarded));
    assert_eq!(outcome.total_points, update.points_awarded);

    let store = VibeStore::new(db.connection());
    let level = store.get_level(user_id, Domain::Strength, now).unwrap();
    assert_eq!(level.rating, update.new_rating);
    assert!(level.last_updated_at.is_some());

    let changes = store.changes_for_session(session.id).unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].change_reason, ChangeReason::SessionCompleted);
    assert_eq!(changes[0].session_id, Some(session.id));
    assert_eq!(changes[0].new_rating, update.new_rating);
    assert!(changes[0].metadata.is_some());
}

#[test]
fn empty_session_falls_back_to_intelligence() {
    let mut db = Database::open_in_memory().unwrap();
    let user_id = Uuid::new_v4();
    let session = WorkoutSession {
        id: Uuid::new_v4(),
        user_id,
        started_at: None,
        completed_at: None,
        exercises: Vec::new(),
    };

    let outcome = process_session(
        &mut db,
        &session,
        &ExerciseCatalog::new(),
        &NoopPointsRecorder,
        Utc::now(),
    )
    .unwrap();

    assert_eq!(outcome.updates.len(), 1);
    assert_eq!(outcome.updates[0].domain, Domain::Intelligence);
    assert_eq!(outcome.updates[0].impact, 0.5);
}

#[test]
fn high_rpe_short_heavy_session_updates_strength_and_explosivity() {
    let mut db = Database::open_in_memory().unwrap();
    let user_id = Uuid::new_v4();
    let session = session_with_sets(
        user_id,
        10,
        vec![ExerciseSet {
            reps: Some(10),
            weight_kg: Some(100.0),
            rpe: Some(10.0),
            ..Default::default()
        }],
    );

    let outcome = process_session(
        &mut db,
        &session,
        &ExerciseCatalog::new(),
        &NoopPointsRecorder,
        Utc::now(),
    )
    .unwrap();

    let domains: Vec<Domain> = outcome.updates.iter().map(|u| u.domain).collect();
    assert!(domains.contains(&Domain::Strength));
    assert!(domains.contains(&Domain::Explosivity));
    // Folding keeps one update (and one audit row) per domain.
    let store = VibeStore::new(db.connection());
    let changes = store.changes_for_session(session.id).unwrap();
    assert_eq!(changes.len(), domains.len());
}

#[test]
fn beginner_earns_at_least_as_much_as_advanced_for_same_session() {
    let mut db = Database::open_in_memory().unwrap();
    let now = Utc::now();
    let beginner = Uuid::new_v4();
    let advanced = Uuid::new_v4();

    {
        let store = VibeStore::new(db.connection());
        let mut level = vibelevel::storage::DomainVibeLevel::fresh(advanced, Domain::Strength, now);
        level.rating = 2000.0;
        level.rating_deviation = 50.0;
        level.last_updated_at = Some(now);
        store.upsert_level(&level).unwrap();
    }

    let beginner_outcome = process_session(
        &mut db,
        &strength_session(beginner, 600.0),
        &ExerciseCatalog::new(),
        &NoopPointsRecorder,
        now,
    )
    .unwrap();
    let advanced_outcome = process_session(
        &mut db,
        &strength_session(advanced, 600.0),
        &ExerciseCatalog::new(),
        &NoopPointsRecorder,
        now,
    )
    .unwrap();

    assert!(beginner_outcome.total_points >= 5);
    assert!(advanced_outcome.total_points >= 5);
    assert!(beginner_outcome.total_points >= advanced_outcome.total_points);
}

#[test]
fn fitness_score_penalizes_single_domain_spike() {
    let mut db = Database::open_in_memory().unwrap();
    let user_id = Uuid::new_v4();

    let outcome = process_session(
        &mut db,
        &strength_session(user_id, 600.0),
        &ExerciseCatalog::new(),
        &NoopPointsRecorder,
        Utc::now(),
    )
    .unwrap();

    let strength = outcome.updates[0].new_rating;
    let arithmetic = (strength + 5.0 * 1000.0) / 6.0;
    assert!(outcome.general_fitness_score > 1000.0);
    assert!(outcome.general_fitness_score < arithmetic);
}

#[test]
fn recovery_session_with_catalog_types_trains_regeneration() {
    let mut db = Database::open_in_memory().unwrap();
    let user_id = Uuid::new_v4();
    let exercise_id = Uuid::new_v4();

    let mut catalog = ExerciseCatalog::new();
    catalog.insert(exercise_id, "yoga");

    let start = Utc::now() - Duration::minutes(40);
    let session = WorkoutSession {
        id: Uuid::new_v4(),
        user_id,
        started_at: Some(start),
        completed_at: Some(start + Duration::minutes(40)),
        exercises: vec![SessionExercise {
            exercise_id,
            actual: None,
            sets: vec![ExerciseSet {
                rpe: Some(2.0),
                ..Default::default()
            }],
        }],
    };

    let outcome =
        process_session(&mut db, &session, &catalog, &NoopPointsRecorder, Utc::now()).unwrap();

    let regen = outcome
        .updates
        .iter()
        .find(|u| u.domain == Domain::Regeneration)
        .expect("regeneration should be detected");
    assert_eq!(regen.impact, 0.9);
}
