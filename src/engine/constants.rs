//! Global rating-system constants.
//!
//! These are contractual values: the detector thresholds, Glicko-2 scale
//! factor and bounds are baked into existing user rating history and must
//! not drift between releases.

/// Baseline rating every domain starts at.
pub const INITIAL_VIBE_LEVEL: f64 = 1000.0;

/// Initial rating deviation for a fresh domain row.
pub const INITIAL_RD: f64 = 350.0;

/// Initial volatility for a fresh domain row.
pub const INITIAL_VOLATILITY: f64 = 0.06;

/// Hard rating floor.
pub const MIN_RATING: f64 = 100.0;

/// Hard rating ceiling.
pub const MAX_RATING: f64 = 3000.0;

/// Rating deviation bounds.
pub const MIN_RD: f64 = 30.0;
pub const MAX_RD: f64 = 350.0;

/// Volatility bounds.
pub const MIN_VOLATILITY: f64 = 0.01;
pub const MAX_VOLATILITY: f64 = 0.1;

/// Glicko-2 system constant constraining volatility change per update.
pub const TAU: f64 = 0.5;

/// Glicko-2 rating-to-internal scale factor.
pub const GLICKO_SCALE: f64 = 173.7178;

/// Center point used when moving between rating and internal scale.
///
/// Domain ratings are initialized at 1000 but the descale center is 1500.
/// The offset is an observed property of the live rating history; changing
/// it would shift every stored rating.
pub const GLICKO_CENTER: f64 = 1500.0;

/// Fraction of the distance back to baseline removed per decay cycle.
pub const DECAY_RATING_REGRESSION: f64 = 0.05;

/// Number of decay cycles over which RD regrows from its floor to its cap.
pub const DECAY_RD_PERIODS: f64 = 30.0;

/// Minimum and maximum points awarded per domain update.
pub const MIN_POINTS: f64 = 5.0;
pub const MAX_POINTS: f64 = 200.0;

/// RD aging constant: grows deviation back toward [`MAX_RD`] with inactivity.
pub fn rd_aging_constant() -> f64 {
    ((MAX_RD * MAX_RD - 50.0 * 50.0) / std::f64::consts::LN_2).sqrt()
}
