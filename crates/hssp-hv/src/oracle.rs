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

//! # Hypervolume Oracle Contracts
//!
//! The search never computes volumes itself. It asks an oracle for
//!
//! - the volume of a point set,
//! - the exclusive contribution of every point of a set (the volume lost when
//!   that point alone is removed), and
//! - optionally an incremental [`ContributionTracker`] that amortizes work
//!   across search nodes differing by a single point.
//!
//! Trackers identify points by [`PointId`]. Oracles that cannot offer an
//! incremental structure for a dimensionality return `None` from
//! [`HypervolumeOracle::tracker`] and the search recomputes from scratch.

use hssp_model::{index::PointId, point::Point};

/// Computes hypervolumes relative to the origin.
pub trait HypervolumeOracle: Send + Sync {
    /// A short name used in logs.
    fn name(&self) -> &str;

    /// Returns the hypervolume of `points`; `0.0` for the empty set.
    fn volume(&self, points: &[&Point]) -> f64;

    /// Writes into `out[i]` the volume lost when `points[i]` alone is removed.
    ///
    /// `out` must hold at least `points.len()` values.
    fn exclusive_contributions(&self, points: &[&Point], out: &mut [f64]) {
        debug_assert!(
            out.len() >= points.len(),
            "called `HypervolumeOracle::exclusive_contributions` with a short buffer: the len is {} but {} are required",
            out.len(),
            points.len()
        );

        let total = self.volume(points);
        let mut rest: Vec<&Point> = Vec::with_capacity(points.len().saturating_sub(1));
        for (i, slot) in out.iter_mut().enumerate().take(points.len()) {
            rest.clear();
            rest.extend(
                points
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, p)| *p),
            );
            *slot = (total - self.volume(&rest)).max(0.0);
        }
    }

    /// Returns an incremental tracker for `dimensions`-dimensional points with
    /// identities below `capacity`, if this oracle supports one.
    fn tracker<'p>(
        &self,
        _dimensions: usize,
        _capacity: usize,
    ) -> Option<Box<dyn ContributionTracker<'p> + 'p>> {
        None
    }
}

/// Incrementally maintained contributions over a working set of points.
///
/// Every tracked point is either *enabled* or *disabled*. Both count toward
/// the tracked volume; only disabled points report exclusive contributions.
/// Newly inserted points are disabled.
pub trait ContributionTracker<'p>: Send {
    /// Adds a disabled point.
    fn insert(&mut self, point: &'p Point);

    /// Removes the point with identity `id`. Returns `false` if it was not tracked.
    fn remove(&mut self, id: PointId) -> bool;

    fn enable(&mut self, id: PointId);

    fn disable(&mut self, id: PointId);

    fn is_enabled(&self, id: PointId) -> bool;

    fn contains(&self, id: PointId) -> bool;

    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Volume of all tracked points.
    fn volume(&mut self) -> f64;

    /// Volume `point` would add to the tracked set.
    fn contribution_of(&mut self, point: &'p Point) -> f64;

    /// Writes the exclusive contribution of every disabled point into
    /// `out[id]`. Entries of untracked or enabled points are left untouched.
    fn exclusive_contributions(&mut self, out: &mut [f64]);

    /// Drops every tracked point.
    fn clear(&mut self);
}
