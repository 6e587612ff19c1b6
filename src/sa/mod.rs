//! Simulated Annealing (SA) for the symmetric traveling salesman problem.
//!
//! A single-solution trajectory search over complete tours. Starting
//! from a random tour, the engine repeatedly proposes 2-opt moves
//! (reverse a segment of the visit order) and accepts them by the
//! Metropolis criterion: improvements always, deteriorations with a
//! probability that falls with the temperature, so early exploration
//! gives way to late refinement.
//!
//! Run parameters are tuned to the instance automatically
//! ([`SaParams::auto_tune`]); temperature decay and per-level move
//! budgets are pluggable ([`DecayMethod`], [`IterationMethod`]); runs
//! stop on the first of four criteria ([`StopReason`]) and report the
//! first, last, best, and worst tours seen ([`SaResult`]).
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"
//! - Croes (1958), "A Method for Solving Traveling-Salesman Problems" (2-opt)

mod config;
mod runner;
mod schedule;

pub use config::{DecayMethod, IterationMethod, SaConfig};
pub use runner::{acceptance_probability, SaResult, SaRunner, TrackedSolution};
pub use schedule::{decay_temperature, stop_criterion, vary_iterations, SaParams, StopReason};
pub use schedule::{MIN_ACCEPTANCE_RATE, NO_IMPROVEMENT_LIMIT};
