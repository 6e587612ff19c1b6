//! Candidate tours and their evaluation.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::distance::DistanceTable;
use crate::error::Error;

/// A candidate tour: an ordered visit of locations, closed back to the
/// start, plus its cached cost.
///
/// Construction leaves the cost at `f64::INFINITY` until
/// [`evaluate`](Solution::evaluate) or [`set_cost`](Solution::set_cost)
/// assigns it, so an unevaluated tour never compares better than a real
/// one.
///
/// # Examples
///
/// ```
/// use tsp_anneal::distance::DistanceMatrix;
/// use tsp_anneal::solution::Solution;
///
/// let table = DistanceMatrix::from_edges([
///     ("A", "B", 3.0),
///     ("B", "C", 4.0),
///     ("A", "C", 5.0),
/// ])
/// .unwrap();
///
/// let mut tour = Solution::new(vec!["A".into(), "B".into(), "C".into()]);
/// tour.evaluate(&table).unwrap();
///
/// assert_eq!(tour.cost(), 12.0);
/// assert_eq!(tour.to_string(), "A -> B -> C -> A");
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    path: Vec<String>,
    cost: f64,
}

impl Solution {
    /// Creates an unevaluated tour over `path`.
    pub fn new(path: Vec<String>) -> Self {
        Solution {
            path,
            cost: f64::INFINITY,
        }
    }

    /// Creates an unevaluated tour visiting `locations` in random order.
    pub fn random<R: Rng + ?Sized>(locations: &[String], rng: &mut R) -> Self {
        let mut path = locations.to_vec();
        path.shuffle(rng);
        Solution::new(path)
    }

    /// Recomputes the tour cost from `table` and caches it.
    ///
    /// The cost is the sum of consecutive-visit distances plus the closing
    /// edge back to the first location. Tours with fewer than two visits
    /// cost `0.0`. On error the cached cost is left untouched.
    pub fn evaluate<T: DistanceTable + ?Sized>(&mut self, table: &T) -> Result<(), Error> {
        if self.path.len() < 2 {
            self.cost = 0.0;
            return Ok(());
        }
        let mut total = 0.0;
        for pair in self.path.windows(2) {
            total += table.require_distance(&pair[0], &pair[1])?;
        }
        total += table.require_distance(&self.path[self.path.len() - 1], &self.path[0])?;
        self.cost = total;
        Ok(())
    }

    /// Overrides the cached cost without re-walking the tour.
    ///
    /// Used when the caller already knows the cost, e.g. from an
    /// incremental move delta.
    pub fn set_cost(&mut self, cost: f64) {
        self.cost = cost;
    }

    /// Visit order. The closing edge back to the start is implicit.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Cached tour cost. `f64::INFINITY` until first evaluated.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Number of visited locations.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Whether the tour visits no locations.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub(crate) fn path_mut(&mut self) -> &mut [String] {
        &mut self.path
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.path.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            f.write_str(name)?;
        }
        if self.path.len() >= 2 {
            write!(f, " -> {}", self.path[0])?;
        }
        Ok(())
    }
}
