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

//! # Hypervolume by Slicing Objectives
//!
//! Exact volume of a union of origin-anchored boxes. Points are sorted by
//! their last coordinate; between two consecutive heights the dominated region
//! is a prism whose cross-section is the `(d - 1)`-dimensional volume of every
//! point at or above that height. The recursion bottoms out in a sorted sweep
//! for two dimensions and a maximum for one.
//!
//! Runs in `O(n^(d-1) log n)`, which is plenty for the instance sizes an exact
//! subset selection can handle.

use crate::oracle::{ContributionTracker, HypervolumeOracle};
use crate::tracker::SetTracker;
use hssp_model::point::Point;

/// Exact hypervolume oracle for any dimensionality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlicingOracle;

impl SlicingOracle {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl HypervolumeOracle for SlicingOracle {
    fn name(&self) -> &str {
        "SlicingOracle"
    }

    fn volume(&self, points: &[&Point]) -> f64 {
        let Some(first) = points.first() else {
            return 0.0;
        };
        let mut coordinates: Vec<&[f64]> = points.iter().map(|p| p.coordinates()).collect();
        slice_volume(&mut coordinates, first.dimensions())
    }

    fn tracker<'p>(
        &self,
        dimensions: usize,
        capacity: usize,
    ) -> Option<Box<dyn ContributionTracker<'p> + 'p>> {
        match dimensions {
            3 | 4 => Some(Box::new(SetTracker::new(dimensions, capacity))),
            _ => None,
        }
    }
}

/// Volume dominated by `points` using only their first `dimensions`
/// coordinates. Reorders `points`.
pub(crate) fn slice_volume(points: &mut [&[f64]], dimensions: usize) -> f64 {
    if points.is_empty() || dimensions == 0 {
        return 0.0;
    }

    match dimensions {
        1 => points.iter().map(|p| p[0]).fold(0.0, f64::max),
        2 => {
            points.sort_unstable_by(|a, b| b[1].total_cmp(&a[1]));
            let mut area = 0.0;
            let mut width: f64 = 0.0;
            for i in 0..points.len() {
                width = width.max(points[i][0]);
                let below = points.get(i + 1).map_or(0.0, |p| p[1]);
                area += width * (points[i][1] - below);
            }
            area
        }
        _ => {
            let axis = dimensions - 1;
            points.sort_unstable_by(|a, b| b[axis].total_cmp(&a[axis]));

            let mut volume = 0.0;
            let mut slab: Vec<&[f64]> = Vec::with_capacity(points.len());
            for i in 0..points.len() {
                slab.push(points[i]);
                let below = points.get(i + 1).map_or(0.0, |p| p[axis]);
                let depth = points[i][axis] - below;
                if depth > 0.0 {
                    volume += depth * slice_volume(&mut slab, axis);
                }
            }
            volume
        }
    }
}
