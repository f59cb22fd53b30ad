// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Instance Loading
//!
//! Reads a point instance from text and normalizes it against a reference
//! point. The format is one point per line with whitespace-separated
//! coordinates; lines starting with `#` are comments and blank lines are
//! skipped. The first point fixes the dimensionality.
//!
//! Normalized coordinates are distances to the reference point:
//! `reference - value` when minimizing and `value - reference` when
//! maximizing. The reference must strictly dominate every point, so every
//! normalized coordinate is positive. Without an explicit reference the
//! origin is used.
//!
//! ```rust
//! use hssp_model::index::PointId;
//! use hssp_model::loading::PointSetLoader;
//!
//! let set = PointSetLoader::new()
//!     .with_reference(vec![6.0, 6.0])
//!     .from_str("5 1\n1 5\n3 3\n")
//!     .unwrap();
//! assert_eq!(set.point(PointId::new(2)).coordinates(), &[3.0, 3.0]);
//! ```

use crate::point::{ModelError, PointSet};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Errors raised while loading an instance.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read instance: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: cannot parse `{token}` as a coordinate")]
    Parse { line: usize, token: String },
    #[error("line {line}: expected {expected} coordinates but found {found}")]
    DimensionMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("reference point has {found} coordinates but the instance has {expected} dimensions")]
    ReferenceDimension { expected: usize, found: usize },
    #[error("line {line}: reference point does not dominate coordinate {dimension}")]
    NotDominated { line: usize, dimension: usize },
    #[error("instance contains no points")]
    Empty,
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// A configurable loader for point instances.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSetLoader {
    reference: Option<Vec<f64>>,
    maximize: bool,
}

impl PointSetLoader {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `reference` instead of the origin.
    #[inline]
    pub fn with_reference(mut self, reference: Vec<f64>) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Treats every objective as maximized.
    #[inline]
    pub fn with_maximize(mut self, yes: bool) -> Self {
        self.maximize = yes;
        self
    }

    /// Loads and normalizes an instance from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, rdr: R) -> Result<PointSet, LoadError> {
        let mut rows: Vec<Vec<f64>> = Vec::new();
        let mut dimensions = 0;

        for (number, line) in rdr.lines().enumerate() {
            let line = line?;
            let number = number + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut row = Vec::with_capacity(dimensions);
            for token in trimmed.split_whitespace() {
                let value: f64 = token.parse().map_err(|_| LoadError::Parse {
                    line: number,
                    token: token.to_string(),
                })?;
                row.push(value);
            }

            if rows.is_empty() {
                dimensions = row.len();
                self.check_reference(dimensions)?;
            } else if row.len() != dimensions {
                return Err(LoadError::DimensionMismatch {
                    line: number,
                    expected: dimensions,
                    found: row.len(),
                });
            }

            self.normalize(&mut row, number)?;
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(LoadError::Empty);
        }

        Ok(PointSet::new(dimensions, rows)?)
    }

    /// Loads an instance from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<PointSet, LoadError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads an instance from a generic reader.
    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<PointSet, LoadError> {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads an instance from a string slice.
    #[inline]
    pub fn from_str(&self, s: &str) -> Result<PointSet, LoadError> {
        self.from_reader(s.as_bytes())
    }

    fn check_reference(&self, dimensions: usize) -> Result<(), LoadError> {
        match &self.reference {
            Some(reference) if reference.len() != dimensions => Err(LoadError::ReferenceDimension {
                expected: dimensions,
                found: reference.len(),
            }),
            _ => Ok(()),
        }
    }

    fn normalize(&self, row: &mut [f64], line: usize) -> Result<(), LoadError> {
        for (dimension, value) in row.iter_mut().enumerate() {
            let reference = self
                .reference
                .as_ref()
                .map_or(0.0, |reference| reference[dimension]);
            let distance = if self.maximize {
                *value - reference
            } else {
                reference - *value
            };
            if distance.is_nan() || distance <= 0.0 {
                return Err(LoadError::NotDominated { line, dimension });
            }
            *value = distance;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::PointId;
    use std::io::Write;

    const SMALL_INSTANCE: &str = r#"
        # three points, two objectives
        5 1
        1 5

        3 3
    "#;

    #[test]
    fn test_loads_and_normalizes_for_minimization() {
        let set = PointSetLoader::new()
            .with_reference(vec![6.0, 6.0])
            .from_str(SMALL_INSTANCE)
            .expect("Failed to load");

        assert_eq!(set.len(), 3);
        assert_eq!(set.dimensions(), 2);
        assert_eq!(set.point(PointId::new(0)).coordinates(), &[1.0, 5.0]);
        assert_eq!(set.point(PointId::new(1)).coordinates(), &[5.0, 1.0]);
        assert_eq!(set.point(PointId::new(2)).coordinates(), &[3.0, 3.0]);
    }

    #[test]
    fn test_loads_and_normalizes_for_maximization() {
        let set = PointSetLoader::new()
            .with_maximize(true)
            .from_str("1 5\n5 1\n")
            .expect("Failed to load");
        assert_eq!(set.point(PointId::new(0)).coordinates(), &[1.0, 5.0]);

        let shifted = PointSetLoader::new()
            .with_maximize(true)
            .with_reference(vec![0.5, 0.5])
            .from_str("1 5\n")
            .expect("Failed to load");
        assert_eq!(shifted.point(PointId::new(0)).coordinates(), &[0.5, 4.5]);
    }

    #[test]
    fn test_origin_reference_requires_negative_values_when_minimizing() {
        let set = PointSetLoader::new()
            .from_str("-1 -2\n")
            .expect("Failed to load");
        assert_eq!(set.point(PointId::new(0)).coordinates(), &[1.0, 2.0]);

        let err = PointSetLoader::new().from_str("-1 -2\n1 -2\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::NotDominated {
                line: 2,
                dimension: 0
            }
        ));
    }

    #[test]
    fn test_parse_error_reports_line_and_token() {
        let err = PointSetLoader::new()
            .with_maximize(true)
            .from_str("1 2\n3 garbage\n")
            .unwrap_err();
        match err {
            LoadError::Parse { line, token } => {
                assert_eq!(line, 2);
                assert_eq!(token, "garbage");
            }
            other => panic!("Expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_dimension_errors() {
        let err = PointSetLoader::new()
            .with_maximize(true)
            .from_str("1 2\n1 2 3\n")
            .unwrap_err();
        assert!(matches!(
            err,
            LoadError::DimensionMismatch {
                line: 2,
                expected: 2,
                found: 3
            }
        ));

        let err = PointSetLoader::new()
            .with_reference(vec![9.0])
            .from_str("1 2\n")
            .unwrap_err();
        assert!(matches!(
            err,
            LoadError::ReferenceDimension {
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_empty_instance_is_rejected() {
        let err = PointSetLoader::new().from_str("# nothing\n\n").unwrap_err();
        assert!(matches!(err, LoadError::Empty));
    }

    #[test]
    fn test_from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "2 2 2").unwrap();
        writeln!(file, "1 3 2").unwrap();

        let set = PointSetLoader::new()
            .with_maximize(true)
            .from_path(file.path())
            .expect("Failed to load");
        assert_eq!(set.len(), 2);
        assert_eq!(set.dimensions(), 3);
    }
}
