//! Distance tables: the data the solver consumes.
//!
//! The solver only needs two capabilities, an ordered list of location
//! names and a symmetric pairwise distance, expressed by the
//! [`DistanceTable`] trait. [`DistanceMatrix`] is the bundled in-memory
//! implementation with text parsing and named-subset extraction.

use std::collections::HashMap;
use std::path::Path;

use crate::error::Error;

/// Symmetric pairwise distances over a fixed, ordered set of locations.
///
/// # Contract
///
/// - [`locations`](DistanceTable::locations) is ordered, free of
///   duplicates, and stable for the lifetime of the table.
/// - [`distance`](DistanceTable::distance) is symmetric, non-negative,
///   returns `Some(0.0)` for `(x, x)` when `x` is a known location, and
///   `None` for any pair it does not define.
///
/// A table that defines every pair over its locations never produces
/// [`Error::MissingDistance`] downstream; a gap is a configuration
/// mistake, not a solver concern.
pub trait DistanceTable {
    /// Ordered, deduplicated location names.
    fn locations(&self) -> &[String];

    /// Distance between two locations, or `None` if the pair is undefined.
    fn distance(&self, from: &str, to: &str) -> Option<f64>;

    /// Distance between two locations, erroring on undefined pairs.
    fn require_distance(&self, from: &str, to: &str) -> Result<f64, Error> {
        self.distance(from, to).ok_or_else(|| Error::MissingDistance {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

impl<T: DistanceTable + ?Sized> DistanceTable for &T {
    fn locations(&self) -> &[String] {
        (**self).locations()
    }

    fn distance(&self, from: &str, to: &str) -> Option<f64> {
        (**self).distance(from, to)
    }
}

/// In-memory symmetric distance matrix keyed by location name.
///
/// Pairs are stored once under a normalized index pair, so inserting
/// `A → B` also answers `B → A`. Self-distances are implicitly zero for
/// every known location.
///
/// # Examples
///
/// ```
/// use tsp_anneal::distance::{DistanceMatrix, DistanceTable};
///
/// let table = DistanceMatrix::from_text(
///     "# unit square, diagonals 2
///      A B 1
///      B C 1
///      C D 1
///      D A 1
///      A C 2
///      B D 2",
/// )
/// .unwrap();
///
/// assert_eq!(table.locations(), ["A", "B", "C", "D"]);
/// assert_eq!(table.distance("C", "A"), Some(2.0));
/// assert_eq!(table.distance("A", "A"), Some(0.0));
/// assert_eq!(table.distance("A", "Z"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DistanceMatrix {
    names: Vec<String>,
    index: HashMap<String, usize>,
    dist: HashMap<(usize, usize), f64>,
}

impl DistanceMatrix {
    /// Builds a matrix from `(from, to, distance)` triples.
    ///
    /// Location order follows first appearance in the edge list. A triple
    /// with `from == to` and distance `0` declares a location without
    /// defining any pair.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDistance`] for negative, non-finite, or non-zero
    /// self-loop distances; [`Error::DuplicateDistance`] when the same
    /// unordered pair appears twice (in either orientation).
    pub fn from_edges<'a, I>(edges: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (&'a str, &'a str, f64)>,
    {
        let mut matrix = DistanceMatrix::default();
        for (from, to, value) in edges {
            matrix.insert(from, to, value)?;
        }
        Ok(matrix)
    }

    /// Parses a matrix from line-oriented text.
    ///
    /// One `FROM TO DISTANCE` triple per line, whitespace-separated.
    /// Blank lines and lines starting with `#` are skipped.
    ///
    /// # Errors
    ///
    /// [`Error::Parse`] with a 1-based line number for malformed lines,
    /// plus the construction errors of [`from_edges`](Self::from_edges).
    pub fn from_text(input: &str) -> Result<Self, Error> {
        let mut matrix = DistanceMatrix::default();
        for (lineno, raw) in input.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 3 {
                return Err(Error::Parse {
                    line: lineno + 1,
                    message: format!("expected `FROM TO DISTANCE`, got {} fields", fields.len()),
                });
            }
            let value: f64 = fields[2].parse().map_err(|_| Error::Parse {
                line: lineno + 1,
                message: format!("`{}` is not a number", fields[2]),
            })?;
            matrix.insert(fields[0], fields[1], value)?;
        }
        Ok(matrix)
    }

    /// Loads a matrix from a text file in the [`from_text`](Self::from_text)
    /// format.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_text(&contents)
    }

    /// Extracts the sub-matrix over `names`, in the given order.
    ///
    /// Pairs the parent does not define stay undefined in the subset.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownLocation`] if a name is absent from this matrix;
    /// [`Error::DuplicateLocation`] if a name is given twice.
    pub fn subset<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, Error> {
        let mut sub = DistanceMatrix::default();
        for name in names {
            let name = name.as_ref();
            if !self.index.contains_key(name) {
                return Err(Error::UnknownLocation(name.to_string()));
            }
            if sub.index.contains_key(name) {
                return Err(Error::DuplicateLocation(name.to_string()));
            }
            sub.intern(name);
        }
        for i in 0..sub.names.len() {
            for j in (i + 1)..sub.names.len() {
                if let Some(d) = self.distance(&sub.names[i], &sub.names[j]) {
                    sub.dist.insert((i, j), d);
                }
            }
        }
        Ok(sub)
    }

    /// Number of known locations.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the matrix knows no locations.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn insert(&mut self, from: &str, to: &str, value: f64) -> Result<(), Error> {
        if !value.is_finite() || value < 0.0 || (from == to && value != 0.0) {
            return Err(Error::InvalidDistance {
                from: from.to_string(),
                to: to.to_string(),
                value,
            });
        }
        let a = self.intern(from);
        let b = self.intern(to);
        if a == b {
            // Zero self-loop: declares the location, defines no pair.
            return Ok(());
        }
        let key = (a.min(b), a.max(b));
        if self.dist.insert(key, value).is_some() {
            return Err(Error::DuplicateDistance {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(())
    }

    fn intern(&mut self, name: &str) -> usize {
        if let Some(&i) = self.index.get(name) {
            return i;
        }
        let i = self.names.len();
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), i);
        i
    }
}

impl DistanceTable for DistanceMatrix {
    fn locations(&self) -> &[String] {
        &self.names
    }

    fn distance(&self, from: &str, to: &str) -> Option<f64> {
        let a = *self.index.get(from)?;
        let b = *self.index.get(to)?;
        if a == b {
            return Some(0.0);
        }
        self.dist.get(&(a.min(b), a.max(b))).copied()
    }
}

/// Mean distance over all unordered location pairs.
///
/// Returns `Ok(0.0)` for fewer than two locations. Used by parameter
/// auto-tuning to scale the initial temperature to the instance.
pub fn average_distance<T: DistanceTable + ?Sized>(table: &T) -> Result<f64, Error> {
    let locations = table.locations();
    let n = locations.len();
    if n < 2 {
        return Ok(0.0);
    }
    let mut total = 0.0;
    let mut pairs = 0usize;
    for i in 0..n {
        for j in (i + 1)..n {
            total += table.require_distance(&locations[i], &locations[j])?;
            pairs += 1;
        }
    }
    Ok(total / pairs as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> DistanceMatrix {
        DistanceMatrix::from_edges([("A", "B", 3.0), ("B", "C", 4.0), ("A", "C", 5.0)]).unwrap()
    }

    #[test]
    fn test_from_edges_orders_by_first_appearance() {
        let m = triangle();
        assert_eq!(m.locations(), ["A", "B", "C"]);
        assert_eq!(m.len(), 3);
        assert!(!m.is_empty());
    }

    #[test]
    fn test_distance_is_symmetric() {
        let m = triangle();
        assert_eq!(m.distance("A", "B"), Some(3.0));
        assert_eq!(m.distance("B", "A"), Some(3.0));
        assert_eq!(m.distance("C", "A"), Some(5.0));
    }

    #[test]
    fn test_self_distance_is_zero() {
        let m = triangle();
        assert_eq!(m.distance("B", "B"), Some(0.0));
    }

    #[test]
    fn test_unknown_location_has_no_distance() {
        let m = triangle();
        assert_eq!(m.distance("A", "Z"), None);
        assert_eq!(m.distance("Z", "Z"), None);
    }

    #[test]
    fn test_require_distance_reports_missing_pair() {
        let m = DistanceMatrix::from_edges([("A", "B", 1.0), ("C", "C", 0.0)]).unwrap();
        let err = m.require_distance("A", "C").unwrap_err();
        assert!(matches!(err, Error::MissingDistance { .. }));
    }

    #[test]
    fn test_from_edges_rejects_negative_distance() {
        let err = DistanceMatrix::from_edges([("A", "B", -1.0)]).unwrap_err();
        assert!(matches!(err, Error::InvalidDistance { .. }));
    }

    #[test]
    fn test_from_edges_rejects_non_finite_distance() {
        let err = DistanceMatrix::from_edges([("A", "B", f64::NAN)]).unwrap_err();
        assert!(matches!(err, Error::InvalidDistance { .. }));

        let err = DistanceMatrix::from_edges([("A", "B", f64::INFINITY)]).unwrap_err();
        assert!(matches!(err, Error::InvalidDistance { .. }));
    }

    #[test]
    fn test_from_edges_rejects_nonzero_self_loop() {
        let err = DistanceMatrix::from_edges([("A", "A", 2.0)]).unwrap_err();
        assert!(matches!(err, Error::InvalidDistance { .. }));
    }

    #[test]
    fn test_zero_self_loop_declares_location() {
        let m = DistanceMatrix::from_edges([("A", "B", 1.0), ("C", "C", 0.0)]).unwrap();
        assert_eq!(m.locations(), ["A", "B", "C"]);
        assert_eq!(m.distance("C", "C"), Some(0.0));
        assert_eq!(m.distance("A", "C"), None);
    }

    #[test]
    fn test_from_edges_rejects_duplicate_pair() {
        let err = DistanceMatrix::from_edges([("A", "B", 1.0), ("A", "B", 2.0)]).unwrap_err();
        assert!(matches!(err, Error::DuplicateDistance { .. }));

        // Same pair in the opposite orientation is still a duplicate.
        let err = DistanceMatrix::from_edges([("A", "B", 1.0), ("B", "A", 1.0)]).unwrap_err();
        assert!(matches!(err, Error::DuplicateDistance { .. }));
    }

    #[test]
    fn test_from_text_skips_comments_and_blanks() {
        let m = DistanceMatrix::from_text(
            "# header comment

             A B 1.5
             # interior comment
             B C 2.5",
        )
        .unwrap();
        assert_eq!(m.locations(), ["A", "B", "C"]);
        assert_eq!(m.distance("B", "C"), Some(2.5));
    }

    #[test]
    fn test_from_text_reports_line_numbers() {
        let err = DistanceMatrix::from_text("A B 1\nA C\n").unwrap_err();
        match err {
            Error::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }

        let err = DistanceMatrix::from_text("A B one\n").unwrap_err();
        match err {
            Error::Parse { line, .. } => assert_eq!(line, 1),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = DistanceMatrix::load("definitely/not/a/file.txt").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_load_reads_text_file() {
        let path = std::env::temp_dir().join("tsp_anneal_distance_load_test.txt");
        std::fs::write(&path, "A B 7\nB C 8\n").unwrap();
        let m = DistanceMatrix::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(m.locations(), ["A", "B", "C"]);
        assert_eq!(m.distance("A", "B"), Some(7.0));
    }

    #[test]
    fn test_subset_preserves_given_order() {
        let m = triangle();
        let sub = m.subset(&["C", "A"]).unwrap();
        assert_eq!(sub.locations(), ["C", "A"]);
        assert_eq!(sub.distance("C", "A"), Some(5.0));
        assert_eq!(sub.distance("C", "B"), None);
    }

    #[test]
    fn test_subset_rejects_unknown_location() {
        let err = triangle().subset(&["A", "Z"]).unwrap_err();
        assert!(matches!(err, Error::UnknownLocation(name) if name == "Z"));
    }

    #[test]
    fn test_subset_rejects_duplicate_location() {
        let err = triangle().subset(&["A", "B", "A"]).unwrap_err();
        assert!(matches!(err, Error::DuplicateLocation(name) if name == "A"));
    }

    #[test]
    fn test_subset_keeps_missing_pairs_missing() {
        let m = DistanceMatrix::from_edges([("A", "B", 1.0), ("B", "C", 2.0), ("C", "C", 0.0)])
            .unwrap();
        let sub = m.subset(&["A", "C"]).unwrap();
        assert_eq!(sub.distance("A", "C"), None);
    }

    #[test]
    fn test_average_distance_triangle() {
        let avg = average_distance(&triangle()).unwrap();
        assert!((avg - 4.0).abs() < 1e-12, "expected (3+4+5)/3, got {avg}");
    }

    #[test]
    fn test_average_distance_under_two_locations() {
        let empty = DistanceMatrix::default();
        assert_eq!(average_distance(&empty).unwrap(), 0.0);

        let single = DistanceMatrix::from_edges([("A", "A", 0.0)]).unwrap();
        assert_eq!(average_distance(&single).unwrap(), 0.0);
    }

    #[test]
    fn test_average_distance_propagates_missing_pair() {
        let m = DistanceMatrix::from_edges([("A", "B", 1.0), ("C", "C", 0.0)]).unwrap();
        assert!(matches!(
            average_distance(&m),
            Err(Error::MissingDistance { .. })
        ));
    }

    #[test]
    fn test_table_usable_through_reference() {
        fn total_pairs<T: DistanceTable>(table: T) -> usize {
            let n = table.locations().len();
            n * (n - 1) / 2
        }

        let m = triangle();
        assert_eq!(total_pairs(&m), 3);
        assert_eq!(m.distance("A", "B"), Some(3.0));
    }
}
