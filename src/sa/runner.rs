//! The annealing engine: 2-opt moves under Metropolis acceptance.

use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use super::config::SaConfig;
use super::schedule::{decay_temperature, stop_criterion, vary_iterations, SaParams, StopReason};
use crate::distance::{average_distance, DistanceTable};
use crate::error::Error;
use crate::solution::Solution;

/// Metropolis acceptance probability for a move that changes the tour
/// cost by `delta` at temperature `t`.
///
/// Improving moves are certain; worsening moves are accepted with
/// probability `exp(-delta / t)`, which vanishes as `t` approaches zero
/// and tends to one as `t` grows.
pub fn acceptance_probability(delta: f64, t: f64) -> f64 {
    if delta < 0.0 {
        1.0
    } else if t <= 0.0 {
        0.0
    } else {
        (-delta / t).exp()
    }
}

/// A tour captured during a run, with the move index and temperature at
/// the moment of capture.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackedSolution {
    /// The captured tour. An independent copy: later moves never touch it.
    pub solution: Solution,

    /// Move index at capture time.
    pub iteration: usize,

    /// Temperature at capture time.
    pub temperature: f64,
}

/// Everything a finished run reports.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaResult {
    /// The initial random tour.
    pub first: TrackedSolution,

    /// The working tour when the run stopped.
    pub last: TrackedSolution,

    /// The cheapest tour seen. Ties keep the earlier find.
    pub best: TrackedSolution,

    /// The most expensive tour seen. Ties keep the earlier find.
    pub worst: TrackedSolution,

    /// Total iterations, one evaluated move each.
    pub iterations: usize,

    /// Moves that passed the acceptance criterion.
    pub accepted_moves: usize,

    /// Moves evaluated, accepted or not. Equals `iterations` for this
    /// engine.
    pub total_moves: usize,

    /// Temperature when the run stopped.
    pub final_temperature: f64,

    /// The criterion that ended the run.
    pub stop_reason: StopReason,

    /// The parameters the run used.
    pub params: SaParams,

    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

impl SaResult {
    /// Fraction of evaluated moves that were accepted; `0.0` before any
    /// move was evaluated.
    pub fn acceptance_rate(&self) -> f64 {
        if self.total_moves == 0 {
            0.0
        } else {
            self.accepted_moves as f64 / self.total_moves as f64
        }
    }
}

/// Simulated annealing runner bound to one distance table.
///
/// The working location list is derived from the table at construction
/// and fixed for the runner's lifetime; construction fails fast on
/// anything that could not run.
///
/// # Examples
///
/// ```
/// use tsp_anneal::distance::DistanceMatrix;
/// use tsp_anneal::sa::{SaConfig, SaRunner};
///
/// let table = DistanceMatrix::from_text(
///     "A B 1
///      B C 1
///      C D 1
///      D A 1
///      A C 2
///      B D 2",
/// )?;
///
/// let runner = SaRunner::new(&table, SaConfig::default().with_seed(42))?;
/// let result = runner.run()?;
///
/// assert_eq!(result.best.solution.cost(), 4.0);
/// # Ok::<(), tsp_anneal::error::Error>(())
/// ```
#[derive(Debug)]
pub struct SaRunner<T: DistanceTable> {
    table: T,
    locations: Vec<String>,
    config: SaConfig,
}

impl<T: DistanceTable> SaRunner<T> {
    /// Creates a runner over `table`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] if the configuration fails
    /// [`SaConfig::validate`]; [`Error::TooFewLocations`] if the table
    /// holds fewer than two locations.
    pub fn new(table: T, config: SaConfig) -> Result<Self, Error> {
        config.validate()?;
        let locations = table.locations().to_vec();
        if locations.len() < 2 {
            return Err(Error::TooFewLocations(locations.len()));
        }
        Ok(SaRunner {
            table,
            locations,
            config,
        })
    }

    /// Runs the annealing loop to completion.
    ///
    /// The run has three phases:
    ///
    /// 1. **Initialization**: parameters are tuned to the instance
    ///    ([`SaParams::auto_tune`]), a random tour is evaluated, and all
    ///    four tracked records start from it.
    /// 2. **Cooling**: up to the current move budget of 2-opt moves is
    ///    tried per temperature level under Metropolis acceptance; after
    ///    each level the budget and temperature are recomputed with the
    ///    configured methods.
    /// 3. **Stopped**: the first satisfied criterion ends the run; see
    ///    [`StopReason`].
    ///
    /// The rejection counter behind [`StopReason::Stagnation`] is
    /// cumulative over the whole run: accepted moves do not reset it.
    ///
    /// # Errors
    ///
    /// [`Error::MissingDistance`] if the table omits a pair of working
    /// locations. The engine does not retry or skip: a usable table
    /// defines every pair its tours can walk.
    pub fn run(&self) -> Result<SaResult, Error> {
        let start = Instant::now();

        let mut rng = match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::seed_from_u64(rand::random()),
        };

        // Initialize: tune parameters to the instance, start from a
        // random tour.
        let n = self.locations.len();
        let params = SaParams::auto_tune(
            n,
            average_distance(&self.table)?,
            self.config.initial_temperature,
        );
        debug!(
            event = "auto_tune",
            locations = n,
            initial_temperature = params.initial_temperature,
            alpha = params.alpha,
            min_temperature = params.min_temperature,
            iterations_per_temperature = params.iterations_per_temperature,
            max_iterations = params.max_iterations,
        );

        let mut current = Solution::random(&self.locations, &mut rng);
        current.evaluate(&self.table)?;

        let mut t = params.initial_temperature;
        let mut iteration = 0usize;
        let mut accepted_moves = 0usize;
        let mut total_moves = 0usize;
        let mut no_improvement = 0usize;

        let initial = TrackedSolution {
            solution: current.clone(),
            iteration: 0,
            temperature: t,
        };
        let first = initial.clone();
        let mut last = initial.clone();
        let mut best = initial.clone();
        let mut worst = initial;

        let mut budget = params.iterations_per_temperature;

        // Cool until a stop criterion fires.
        let stop_reason = loop {
            if let Some(reason) = stop_criterion(
                t,
                iteration,
                accepted_moves,
                total_moves,
                no_improvement,
                &params,
            ) {
                break reason;
            }

            for _ in 0..budget {
                if stop_criterion(
                    t,
                    iteration,
                    accepted_moves,
                    total_moves,
                    no_improvement,
                    &params,
                )
                .is_some()
                {
                    break;
                }

                // 2-opt move: reverse path[i + 1..=j].
                let i = rng.random_range(0..n - 1);
                let j = rng.random_range(i + 1..n);
                let delta = self.two_opt_delta(current.path(), i, j)?;

                let mut neighbor = current.clone();
                neighbor.path_mut()[i + 1..=j].reverse();
                neighbor.set_cost(current.cost() + delta);

                total_moves += 1;

                // Metropolis acceptance criterion.
                let accept = if delta < 0.0 {
                    true
                } else {
                    rng.random_range(0.0..1.0) < acceptance_probability(delta, t)
                };

                if accept {
                    current = neighbor;
                    accepted_moves += 1;

                    if current.cost() < best.solution.cost() {
                        best = TrackedSolution {
                            solution: current.clone(),
                            iteration,
                            temperature: t,
                        };
                    }
                    if current.cost() > worst.solution.cost() {
                        worst = TrackedSolution {
                            solution: current.clone(),
                            iteration,
                            temperature: t,
                        };
                    }
                } else {
                    // Cumulative over the run, never reset by acceptance.
                    no_improvement += 1;
                }

                iteration += 1;
            }

            // End of level: record the working tour at the pre-decay
            // temperature, then recompute the budget and temperature.
            last = TrackedSolution {
                solution: current.clone(),
                iteration,
                temperature: t,
            };
            budget = vary_iterations(
                params.iterations_per_temperature,
                self.config.iteration_variation,
                iteration,
                &mut rng,
            );
            t = decay_temperature(t, self.config.decay, iteration, &params);

            trace!(
                event = "cooling_step",
                iteration,
                temperature = t,
                budget,
                current_cost = current.cost(),
                best_cost = best.solution.cost(),
            );
        };

        let elapsed = start.elapsed();
        debug!(
            event = "run_end",
            stop_reason = ?stop_reason,
            iterations = iteration,
            accepted_moves,
            total_moves,
            best_cost = best.solution.cost(),
            final_temperature = t,
            elapsed_ms = elapsed.as_millis() as u64,
        );

        Ok(SaResult {
            first,
            last,
            best,
            worst,
            iterations: iteration,
            accepted_moves,
            total_moves,
            final_temperature: t,
            stop_reason,
            params,
            elapsed,
        })
    }

    /// Cost change from reversing `path[i + 1..=j]`, read off the four
    /// affected edges.
    ///
    /// The reversal replaces edges `(path[i], path[i+1])` and
    /// `(path[j], path[j+1])` (index mod n, the closing edge) with
    /// `(path[i], path[j])` and `(path[i+1], path[j+1])`; interior edges
    /// only change direction, which symmetric distances ignore.
    fn two_opt_delta(&self, path: &[String], i: usize, j: usize) -> Result<f64, Error> {
        let n = path.len();
        let after_j = &path[(j + 1) % n];
        let removed = self.table.require_distance(&path[i], &path[i + 1])?
            + self.table.require_distance(&path[j], after_j)?;
        let added = self.table.require_distance(&path[i], &path[j])?
            + self.table.require_distance(&path[i + 1], after_j)?;
        Ok(added - removed)
    }
}
