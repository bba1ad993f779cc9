//! Glicko-2 rating transition.
//!
//! Takes the per-domain `(rating, deviation, volatility)` state, a session
//! outcome in [0, 1] and a domain impact weight, and produces the new state.
//! Pure and deterministic: identical float inputs give bit-identical
//! outputs (fixed solver iteration count, no data-dependent branching
//! beyond the documented derivative guard).
//!
//! Note the descale center: ratings move on an axis centered at 1500 even
//! though domains baseline at 1000. The offset is baked into every stored
//! rating, so it is part of the contract.

use crate::engine::constants::{
    GLICKO_CENTER, GLICKO_SCALE, MAX_RATING, MAX_RD, MAX_VOLATILITY, MIN_RATING, MIN_RD,
    MIN_VOLATILITY, TAU,
};

/// Per-domain Glicko-2 state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glicko2State {
    pub rating: f64,
    pub rating_deviation: f64,
    pub volatility: f64,
}

impl Glicko2State {
    pub fn new(rating: f64, rating_deviation: f64, volatility: f64) -> Self {
        Self {
            rating,
            rating_deviation,
            volatility,
        }
    }
}

/// Apply one rated outcome to a domain's state.
///
/// `outcome` is the performance score rescaled to [0, 1]; `impact` scales
/// only the rating delta, never deviation or volatility.
pub fn update_glicko2_rating(state: &Glicko2State, outcome: f64, impact: f64) -> Glicko2State {
    let mu = (state.rating - GLICKO_CENTER) / GLICKO_SCALE;
    let phi = state.rating_deviation / GLICKO_SCALE;

    let g = 1.0 / (1.0 + 3.0 * phi * phi / (std::f64::consts::PI * std::f64::consts::PI)).sqrt();
    let e = 1.0 / (1.0 + (-g * mu).exp());
    let v = 1.0 / (g * g * e * (1.0 - e));
    let delta = v * g * (outcome - e);

    let new_volatility = solve_volatility(phi, v, delta, state.volatility);

    let phi_star = (phi * phi + new_volatility * new_volatility).sqrt();
    let phi_prime = 1.0 / (1.0 / (phi_star * phi_star) + 1.0 / v).sqrt();
    let mu_prime = mu + phi_prime * phi_prime * g * (outcome - e);

    let new_rating_raw = mu_prime * GLICKO_SCALE + GLICKO_CENTER;
    let new_rd_raw = phi_prime * GLICKO_SCALE;

    // Only the rating delta is impact-weighted.
    let rating_change = (new_rating_raw - state.rating) * impact;

    Glicko2State {
        rating: (state.rating + rating_change).clamp(MIN_RATING, MAX_RATING),
        rating_deviation: new_rd_raw.clamp(MIN_RD, MAX_RD),
        volatility: new_volatility.clamp(MIN_VOLATILITY, MAX_VOLATILITY),
    }
}

/// Solve for the new volatility with a bounded Newton-Raphson iteration.
///
/// Three fixed iterations from `a = ln(volatility^2)` using a forward
/// numerical derivative with step 1e-4; stops early only when the
/// derivative magnitude falls below 1e-4.
fn solve_volatility(phi: f64, v: f64, delta: f64, volatility: f64) -> f64 {
    let a = (volatility * volatility).ln();

    let f = |x: f64| -> f64 {
        let ex = x.exp();
        let denom = 2.0 * (phi * phi + v + ex) * (phi * phi + v + ex);
        ex * (delta * delta - phi * phi - v - ex) / denom - (x - a) / (TAU * TAU)
    };

    const STEP: f64 = 1e-4;
    let mut x = a;
    for _ in 0..3 {
        let fx = f(x);
        let derivative = (f(x + STEP) - fx) / STEP;
        if derivative.abs() < 1e-4 {
            break;
        }
        x -= fx / derivative;
    }

    (x / 2.0).exp()
}
