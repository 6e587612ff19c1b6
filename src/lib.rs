//! Simulated annealing for the symmetric traveling salesman problem (TSP).
//!
//! Given symmetric pairwise distances over a fixed set of named
//! locations, the solver searches for a low-cost closed tour that visits
//! every location exactly once:
//!
//! - **Auto-tuned parameters**: initial temperature, cooling factor, and
//!   iteration budgets are derived from the instance size and its mean
//!   distance; the temperature can be overridden.
//! - **2-opt neighborhood**: candidate tours differ by one reversed
//!   segment, costed in O(1) from the four affected edges.
//! - **Metropolis acceptance**: improvements always pass; deteriorations
//!   pass with probability `exp(-delta / T)`.
//! - **Pluggable schedules**: four temperature decay methods and four
//!   per-temperature iteration budgets.
//! - **Deterministic replay**: every run draws from a seedable generator.
//! - **Run records**: the first, last, best, and worst tours of a run,
//!   each with the iteration and temperature at which it was seen.
//!
//! # Architecture
//!
//! The crate is the search core only. Anything that is not the annealing
//! loop (reading distance files into a table, prompting for methods,
//! formatting reports) belongs to the caller, which talks to the engine
//! through the [`distance::DistanceTable`] contract and the
//! [`sa::SaResult`] it gets back.

pub mod distance;
pub mod error;
pub mod sa;
pub mod solution;
