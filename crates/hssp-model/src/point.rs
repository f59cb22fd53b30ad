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

//! # Normalized Points
//!
//! A [`Point`] couples a [`PointId`] with its normalized coordinates. A
//! [`PointSet`] owns all points of one instance and guarantees that they share
//! a dimensionality and that every point's id equals its position.

use crate::index::PointId;

/// Errors raised while assembling a [`PointSet`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("a point set needs at least one dimension")]
    ZeroDimensions,
    #[error("point {index} has {found} coordinates but the set has {expected} dimensions")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("coordinate {dimension} of point {index} is not a finite non-negative value: {value}")]
    InvalidCoordinate {
        index: usize,
        dimension: usize,
        value: f64,
    },
}

/// A point in normalized objective space.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    id: PointId,
    coordinates: Box<[f64]>,
}

impl Point {
    #[inline]
    pub fn new(id: PointId, coordinates: Vec<f64>) -> Self {
        Self {
            id,
            coordinates: coordinates.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn id(&self) -> PointId {
        self.id
    }

    #[inline]
    pub fn coordinates(&self) -> &[f64] {
        &self.coordinates
    }

    #[inline]
    pub fn dimensions(&self) -> usize {
        self.coordinates.len()
    }

    /// Returns the coordinate along `dimension`.
    #[inline]
    pub fn coordinate(&self, dimension: usize) -> f64 {
        debug_assert!(
            dimension < self.coordinates.len(),
            "called `Point::coordinate` with dimension out of bounds: the len is {} but the index is {}",
            self.coordinates.len(),
            dimension
        );
        self.coordinates[dimension]
    }

    /// Volume of the box `[0, self]`, i.e. the hypervolume of `{self}`.
    #[inline]
    pub fn box_volume(&self) -> f64 {
        self.coordinates.iter().product()
    }

    /// Returns `true` if `self` is at least as good as `other` in every
    /// coordinate and strictly better in one.
    pub fn dominates(&self, other: &Point) -> bool {
        let mut strictly = false;
        for (a, b) in self.coordinates.iter().zip(other.coordinates.iter()) {
            if a < b {
                return false;
            }
            if a > b {
                strictly = true;
            }
        }
        strictly
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.id)?;
        for (i, c) in self.coordinates.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, ")")
    }
}

/// The normalized points of one problem instance.
#[derive(Clone, Debug, PartialEq)]
pub struct PointSet {
    dimensions: usize,
    points: Vec<Point>,
}

impl PointSet {
    /// Builds a point set from raw normalized coordinate rows. The row index
    /// becomes the point's [`PointId`].
    pub fn new<I>(dimensions: usize, rows: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = Vec<f64>>,
    {
        if dimensions == 0 {
            return Err(ModelError::ZeroDimensions);
        }

        let mut points = Vec::new();
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != dimensions {
                return Err(ModelError::DimensionMismatch {
                    index,
                    expected: dimensions,
                    found: row.len(),
                });
            }
            if let Some((dimension, &value)) = row
                .iter()
                .enumerate()
                .find(|(_, v)| !v.is_finite() || **v < 0.0)
            {
                return Err(ModelError::InvalidCoordinate {
                    index,
                    dimension,
                    value,
                });
            }
            points.push(Point::new(PointId::new(index), row));
        }

        Ok(Self { dimensions, points })
    }

    #[inline]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    /// Returns the point with the given identity.
    #[inline]
    pub fn point(&self, id: PointId) -> &Point {
        debug_assert!(
            id.get() < self.points.len(),
            "called `PointSet::point` with id out of bounds: the len is {} but the index is {}",
            self.points.len(),
            id.get()
        );
        &self.points[id.get()]
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl std::fmt::Display for PointSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PointSet(points: {}, dimensions: {})",
            self.points.len(),
            self.dimensions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(i: usize) -> PointId {
        PointId::new(i)
    }

    #[test]
    fn test_point_set_assigns_ids_by_position() {
        let set = PointSet::new(2, vec![vec![1.0, 5.0], vec![5.0, 1.0], vec![3.0, 3.0]]).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.dimensions(), 2);
        for (i, p) in set.iter().enumerate() {
            assert_eq!(p.id(), pid(i));
        }
        assert_eq!(set.point(pid(2)).coordinates(), &[3.0, 3.0]);
    }

    #[test]
    fn test_point_set_rejects_dimension_mismatch() {
        let err = PointSet::new(2, vec![vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert_eq!(
            err,
            ModelError::DimensionMismatch {
                index: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_point_set_rejects_negative_and_nan() {
        let err = PointSet::new(2, vec![vec![1.0, -2.0]]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidCoordinate {
                index: 0,
                dimension: 1,
                ..
            }
        ));
        assert!(PointSet::new(1, vec![vec![f64::NAN]]).is_err());
        assert_eq!(
            PointSet::new(0, Vec::<Vec<f64>>::new()).unwrap_err(),
            ModelError::ZeroDimensions
        );
    }

    #[test]
    fn test_point_box_volume_and_dominance() {
        let a = Point::new(pid(0), vec![3.0, 3.0]);
        let b = Point::new(pid(1), vec![2.0, 3.0]);
        let c = Point::new(pid(2), vec![1.0, 5.0]);
        assert_eq!(a.box_volume(), 9.0);
        assert!(a.dominates(&b));
        assert!(!b.dominates(&a));
        assert!(!a.dominates(&c));
        assert!(!a.dominates(&a));
    }

    #[test]
    fn test_point_display() {
        let p = Point::new(pid(4), vec![1.5, 2.0]);
        assert_eq!(format!("{}", p), "PointId(4)(1.5, 2)");
    }
}
