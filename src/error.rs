//! Crate error type.

use thiserror::Error;

/// Errors raised while building a distance table or running the solver.
///
/// Configuration problems (`TooFewLocations`, `UnknownLocation`,
/// `DuplicateLocation`, `InvalidConfig`) are reported before any run state
/// is created. `MissingDistance` is a lookup failure: a correctly built
/// table defines every pair, so the solver propagates it immediately and
/// never retries.
#[derive(Debug, Error)]
pub enum Error {
    /// A tour needs at least two locations.
    #[error("at least 2 locations are required, got {0}")]
    TooFewLocations(usize),

    /// A requested location is not present in the distance table.
    #[error("location `{0}` is not present in the distance table")]
    UnknownLocation(String),

    /// The same location was requested twice in a subset.
    #[error("location `{0}` was given more than once")]
    DuplicateLocation(String),

    /// No distance is defined for a pair of locations.
    #[error("no distance defined between `{from}` and `{to}`")]
    MissingDistance { from: String, to: String },

    /// A distance entry is negative, non-finite, or a non-zero self-loop.
    #[error("invalid distance {value} between `{from}` and `{to}`: distances must be finite and non-negative")]
    InvalidDistance { from: String, to: String, value: f64 },

    /// The same unordered pair appears twice in a table definition.
    #[error("duplicate distance entry for `{from}` and `{to}`")]
    DuplicateDistance { from: String, to: String },

    /// A line of distance-table text could not be parsed.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Invalid solver configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error while loading a distance table.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
