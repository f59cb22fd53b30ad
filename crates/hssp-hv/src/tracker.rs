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

//! # Set Contribution Tracker
//!
//! A working set of borrowed points with an enabled flag per identity. The
//! volume of the whole set is cached and invalidated on every membership
//! change, so a burst of `contribution_of` queries against the same set pays
//! for the set volume once.

use crate::oracle::ContributionTracker;
use crate::slicing::slice_volume;
use fixedbitset::FixedBitSet;
use hssp_model::{index::PointId, point::Point};

/// Incremental tracker backed by the slicing volume computation.
#[derive(Debug, Clone)]
pub struct SetTracker<'p> {
    dimensions: usize,
    members: Vec<&'p Point>,
    enabled: FixedBitSet,
    cached_volume: Option<f64>,
    scratch: Vec<&'p [f64]>,
}

impl<'p> SetTracker<'p> {
    /// Creates an empty tracker for points with identities below `capacity`.
    pub fn new(dimensions: usize, capacity: usize) -> Self {
        Self {
            dimensions,
            members: Vec::with_capacity(capacity),
            enabled: FixedBitSet::with_capacity(capacity),
            cached_volume: None,
            scratch: Vec::with_capacity(capacity + 1),
        }
    }

    #[inline]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    #[inline]
    fn position(&self, id: PointId) -> Option<usize> {
        self.members.iter().position(|p| p.id() == id)
    }

    fn volume_without(&mut self, skip: usize) -> f64 {
        self.scratch.clear();
        self.scratch.extend(
            self.members
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != skip)
                .map(|(_, &p)| p.coordinates()),
        );
        slice_volume(&mut self.scratch, self.dimensions)
    }
}

impl<'p> ContributionTracker<'p> for SetTracker<'p> {
    fn insert(&mut self, point: &'p Point) {
        debug_assert!(
            !self.contains(point.id()),
            "called `SetTracker::insert` with {} which is already tracked",
            point.id()
        );
        debug_assert_eq!(point.dimensions(), self.dimensions);

        if point.id().get() >= self.enabled.len() {
            self.enabled.grow(point.id().get() + 1);
        }
        self.enabled.set(point.id().get(), false);
        self.members.push(point);
        self.cached_volume = None;
    }

    fn remove(&mut self, id: PointId) -> bool {
        match self.position(id) {
            Some(position) => {
                self.members.swap_remove(position);
                self.enabled.set(id.get(), false);
                self.cached_volume = None;
                true
            }
            None => false,
        }
    }

    fn enable(&mut self, id: PointId) {
        debug_assert!(
            self.contains(id),
            "called `SetTracker::enable` with untracked {}",
            id
        );
        self.enabled.insert(id.get());
    }

    fn disable(&mut self, id: PointId) {
        if id.get() < self.enabled.len() {
            self.enabled.set(id.get(), false);
        }
    }

    #[inline]
    fn is_enabled(&self, id: PointId) -> bool {
        self.enabled.contains(id.get())
    }

    #[inline]
    fn contains(&self, id: PointId) -> bool {
        self.position(id).is_some()
    }

    #[inline]
    fn len(&self) -> usize {
        self.members.len()
    }

    fn volume(&mut self) -> f64 {
        if let Some(volume) = self.cached_volume {
            return volume;
        }
        self.scratch.clear();
        self.scratch
            .extend(self.members.iter().map(|&p| p.coordinates()));
        let volume = slice_volume(&mut self.scratch, self.dimensions);
        self.cached_volume = Some(volume);
        volume
    }

    fn contribution_of(&mut self, point: &'p Point) -> f64 {
        let base = self.volume();
        self.scratch.clear();
        self.scratch
            .extend(self.members.iter().map(|&p| p.coordinates()));
        self.scratch.push(point.coordinates());
        (slice_volume(&mut self.scratch, self.dimensions) - base).max(0.0)
    }

    fn exclusive_contributions(&mut self, out: &mut [f64]) {
        let total = self.volume();
        for i in 0..self.members.len() {
            let id = self.members[i].id();
            if self.enabled.contains(id.get()) {
                continue;
            }
            debug_assert!(
                id.get() < out.len(),
                "called `SetTracker::exclusive_contributions` with a short buffer: the len is {} but the index is {}",
                out.len(),
                id.get()
            );
            out[id.get()] = (total - self.volume_without(i)).max(0.0);
        }
    }

    fn clear(&mut self) {
        self.members.clear();
        self.enabled.clear();
        self.cached_volume = None;
    }
}
