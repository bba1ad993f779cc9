//! Session-completion surface: inbound snapshot types and the atomic
//! processing pipeline.

pub mod processor;
pub mod types;

pub use processor::{
    process_session, DomainUpdate, NoopPointsRecorder, PointsRecorder, ProcessError,
    SessionOutcome, TracingPointsRecorder,
};
pub use types::{ActualEffort, ExerciseCatalog, ExerciseSet, SessionExercise, WorkoutSession};
