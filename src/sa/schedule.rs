//! Schedule policy: parameter auto-tuning, temperature decay, move
//! budgets, and stop criteria.
//!
//! The engine consults this module once per temperature level. Everything
//! here is a pure function of the run state except the random move-budget
//! variation, which draws from the caller's generator.

use rand::Rng;

use super::config::{DecayMethod, IterationMethod};

/// Acceptance-rate threshold below which a run stops.
///
/// The check is skipped until at least one move has been evaluated.
pub const MIN_ACCEPTANCE_RATE: f64 = 0.01;

/// Rejected-move budget after which a run stops.
///
/// The count accumulates over the whole run; an accepted move does not
/// reset it.
pub const NO_IMPROVEMENT_LIMIT: usize = 5000;

/// Run parameters derived from the instance.
///
/// Produced by [`SaParams::auto_tune`] at the start of a run and fixed
/// for its duration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaParams {
    /// Starting temperature `T0`.
    pub initial_temperature: f64,

    /// Geometric decay factor.
    pub alpha: f64,

    /// Temperature at which the run stops.
    pub min_temperature: f64,

    /// Base number of moves tried per temperature level.
    pub iterations_per_temperature: usize,

    /// Hard cap on total moves.
    pub max_iterations: usize,
}

impl SaParams {
    /// Derives run parameters from the instance size and its mean
    /// pairwise distance.
    ///
    /// - `T0` is the override when given, otherwise
    ///   `max(1.0, average_distance * 10)`, so the starting temperature
    ///   scales with the magnitude of the distances.
    /// - `min_temperature` is `T0 / 1000`.
    /// - `alpha` is banded by instance size: `0.8` up to 7 locations,
    ///   `0.9` up to 14, `0.995` beyond, so larger instances cool slower.
    /// - The per-level move budget is `max(100, n * 20)` and the hard
    ///   cap `max(1000, n * 5000)`.
    ///
    /// The bands and constants are tunable defaults chosen so that
    /// exploration effort grows with the instance without manual tuning,
    /// not hard laws.
    pub fn auto_tune(
        locations: usize,
        average_distance: f64,
        initial_temperature: Option<f64>,
    ) -> Self {
        let t0 = initial_temperature.unwrap_or_else(|| (average_distance * 10.0).max(1.0));
        let alpha = if locations <= 7 {
            0.8
        } else if locations <= 14 {
            0.9
        } else {
            0.995
        };
        SaParams {
            initial_temperature: t0,
            alpha,
            min_temperature: t0 / 1000.0,
            iterations_per_temperature: (locations * 20).max(100),
            max_iterations: (locations * 5000).max(1000),
        }
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// The temperature reached `min_temperature`.
    MinTemperature,

    /// The total move count reached `max_iterations`.
    IterationLimit,

    /// The overall acceptance rate fell below [`MIN_ACCEPTANCE_RATE`].
    LowAcceptance,

    /// More than [`NO_IMPROVEMENT_LIMIT`] moves were rejected.
    Stagnation,
}

/// Computes the temperature for the next level.
///
/// - [`Geometric`](DecayMethod::Geometric): `t * alpha`
/// - [`Linear`](DecayMethod::Linear):
///   `max(min, t - (T0 - min) / max_iterations)`
/// - [`Gradual`](DecayMethod::Gradual):
///   `max(min, t * (1 - 0.5 * iteration / max_iterations))`
/// - [`Logarithmic`](DecayMethod::Logarithmic): `T0 / ln(2 + iteration)`
///
/// The engine applies this once per level, after the inner move loop, so
/// `iteration` is at least 1 by the first call and the logarithmic
/// variant always lands below `T0` (a zeroth application would overshoot
/// it, since `ln 2 < 1`).
pub fn decay_temperature(t: f64, method: DecayMethod, iteration: usize, params: &SaParams) -> f64 {
    match method {
        DecayMethod::Geometric => t * params.alpha,
        DecayMethod::Linear => {
            let step = (params.initial_temperature - params.min_temperature)
                / params.max_iterations as f64;
            (t - step).max(params.min_temperature)
        }
        DecayMethod::Gradual => {
            let factor = 1.0 - 0.5 * iteration as f64 / params.max_iterations as f64;
            (t * factor).max(params.min_temperature)
        }
        DecayMethod::Logarithmic => params.initial_temperature / ((2 + iteration) as f64).ln(),
    }
}

/// Computes the move budget for the next temperature level.
///
/// `base` is always the auto-tuned budget, never the previous level's.
///
/// - [`Constant`](IterationMethod::Constant): `base`
/// - [`Linear`](IterationMethod::Linear): `base + iteration / 1000`
/// - [`Exponential`](IterationMethod::Exponential):
///   `floor(base * 1.02 ^ (iteration / 5000))`
/// - [`Random`](IterationMethod::Random):
///   `base + uniform(0..max(1, base / 5))`
///
/// Linear uses integer division; the exponential exponent is
/// real-valued. The random bonus bound is exclusive, so bases below 5
/// get no bonus.
pub fn vary_iterations<R: Rng + ?Sized>(
    base: usize,
    method: IterationMethod,
    iteration: usize,
    rng: &mut R,
) -> usize {
    match method {
        IterationMethod::Constant => base,
        IterationMethod::Linear => base + iteration / 1000,
        IterationMethod::Exponential => {
            (base as f64 * 1.02f64.powf(iteration as f64 / 5000.0)) as usize
        }
        IterationMethod::Random => base + rng.random_range(0..(base / 5).max(1)),
    }
}

/// Evaluates the stop criteria in order; `None` means keep going.
///
/// 1. `t <= min_temperature`: [`StopReason::MinTemperature`]
/// 2. `iteration >= max_iterations`: [`StopReason::IterationLimit`]
/// 3. `accepted_moves / total_moves < MIN_ACCEPTANCE_RATE`:
///    [`StopReason::LowAcceptance`]; skipped while `total_moves == 0`,
///    so a run that has not evaluated a move yet is not declared
///    degenerate
/// 4. `no_improvement > NO_IMPROVEMENT_LIMIT`: [`StopReason::Stagnation`]
///
/// Criteria 1 and 2 are monotone within a run: the engine never raises
/// the temperature or rewinds the move counter, so once either holds it
/// holds for every later check.
pub fn stop_criterion(
    t: f64,
    iteration: usize,
    accepted_moves: usize,
    total_moves: usize,
    no_improvement: usize,
    params: &SaParams,
) -> Option<StopReason> {
    if t <= params.min_temperature {
        return Some(StopReason::MinTemperature);
    }
    if iteration >= params.max_iterations {
        return Some(StopReason::IterationLimit);
    }
    if total_moves > 0 && (accepted_moves as f64 / total_moves as f64) < MIN_ACCEPTANCE_RATE {
        return Some(StopReason::LowAcceptance);
    }
    if no_improvement > NO_IMPROVEMENT_LIMIT {
        return Some(StopReason::Stagnation);
    }
    None
}
