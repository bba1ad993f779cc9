//! Core rating algorithms: pure functions, no I/O.

pub mod aggregator;
pub mod constants;
pub mod detector;
pub mod domain;
pub mod fitness;
pub mod glicko;
pub mod points;
pub mod scorer;

pub use aggregator::{aggregate_session, SessionMetrics};
pub use detector::{detect_session_domains, DomainImpact};
pub use domain::Domain;
pub use fitness::calculate_general_fitness_score;
pub use glicko::{update_glicko2_rating, Glicko2State};
pub use points::{calculate_points_from_vibe_level, domain_balance_bonus};
pub use scorer::calculate_performance_score;
