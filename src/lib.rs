//! VibeLevel - Adaptive Skill Rating & Domain Detection Engine
//!
//! Converts completed workout sessions into weighted domain classifications,
//! Glicko-2-style per-domain skill rating updates, and bounded point awards.
//! Ships with the companion inactivity-decay batch that regresses unused
//! domain ratings toward baseline.

pub mod config;
pub mod decay;
pub mod engine;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use engine::{
    aggregate_session, calculate_general_fitness_score, calculate_performance_score,
    calculate_points_from_vibe_level, detect_session_domains, domain_balance_bonus,
    update_glicko2_rating, Domain, DomainImpact, Glicko2State, SessionMetrics,
};
pub use session::{process_session, ExerciseCatalog, SessionOutcome, WorkoutSession};
pub use storage::{Database, DomainVibeLevel, VibeLevelChange};
