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

//! # Shared Incumbent
//!
//! The best `k`-subset found so far, shared by every worker of a solve call.
//! The hypervolume is mirrored into an `AtomicU64` (as `f64` bits) so pruning
//! reads it without locking; the subset itself lives behind a `Mutex` which
//! is the source of truth.
//!
//! A stale read of `best` is always lower than the truth, so it can only cost
//! extra exploration. Installation compares against the locked value again
//! and only accepts strict improvements; value and subset change together
//! under the lock.
//!
//! ```rust
//! use hssp_bnb::incumbent::SharedIncumbent;
//! use hssp_model::index::PointId;
//!
//! let incumbent = SharedIncumbent::new();
//! assert_eq!(incumbent.best(), f64::NEG_INFINITY);
//! assert!(incumbent.try_install(4.0, &[PointId::new(1)]));
//! assert!(!incumbent.try_install(4.0, &[PointId::new(2)]));
//! assert_eq!(incumbent.best(), 4.0);
//! ```

use hssp_model::{index::PointId, solution::Solution};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// A concurrent holder for the best subset found during search.
///
/// `best` starts at negative infinity, meaning "no incumbent yet".
#[derive(Debug)]
pub struct SharedIncumbent {
    /// Hypervolume of the incumbent as `f64::to_bits`.
    best: AtomicU64,
    solution: Mutex<Option<Solution>>,
}

impl Default for SharedIncumbent {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SharedIncumbent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Incumbent(best: {})", self.best())
    }
}

impl SharedIncumbent {
    #[inline]
    pub fn new() -> Self {
        Self {
            best: AtomicU64::new(f64::NEG_INFINITY.to_bits()),
            solution: Mutex::new(None),
        }
    }

    /// Returns the current best hypervolume without locking.
    #[inline]
    pub fn best(&self) -> f64 {
        f64::from_bits(self.best.load(Ordering::Relaxed))
    }

    /// Returns a snapshot of the current incumbent, if any.
    #[inline]
    pub fn snapshot(&self) -> Option<Solution> {
        self.solution.lock().clone()
    }

    /// Installs `members` with value `hypervolume` if it strictly improves on
    /// the incumbent. Returns `true` if installed.
    pub fn try_install(&self, hypervolume: f64, members: &[PointId]) -> bool {
        if hypervolume <= self.best() {
            return false;
        }

        let mut guard = self.solution.lock();
        // The atomic may be stale; the locked solution decides.
        if let Some(current) = guard.as_ref() {
            if hypervolume <= current.hypervolume() {
                return false;
            }
        }

        *guard = Some(Solution::new(hypervolume, members.to_vec()));
        self.best.store(hypervolume.to_bits(), Ordering::Relaxed);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::SharedIncumbent;
    use hssp_model::index::PointId;
    use std::sync::Arc;
    use std::thread;

    fn pid(i: usize) -> PointId {
        PointId::new(i)
    }

    #[test]
    fn test_initial_state() {
        let inc = SharedIncumbent::new();
        assert_eq!(inc.best(), f64::NEG_INFINITY);
        assert!(inc.snapshot().is_none());
    }

    #[test]
    fn test_install_better_solution_updates_best_and_snapshot() {
        let inc = SharedIncumbent::new();
        assert!(inc.try_install(12.5, &[pid(3), pid(1)]));
        assert_eq!(inc.best(), 12.5);

        let snap = inc.snapshot().expect("snapshot should be Some");
        assert_eq!(snap.hypervolume(), 12.5);
        assert_eq!(snap.members(), &[pid(1), pid(3)]);
    }

    #[test]
    fn test_reject_worse_or_equal_candidates() {
        let inc = SharedIncumbent::new();
        assert!(inc.try_install(100.0, &[pid(0)]));
        assert!(!inc.try_install(50.0, &[pid(1)]));
        assert!(!inc.try_install(100.0, &[pid(2)]));
        assert_eq!(inc.best(), 100.0);
        assert_eq!(inc.snapshot().unwrap().members(), &[pid(0)]);
    }

    #[test]
    fn test_zero_volume_beats_empty_incumbent() {
        let inc = SharedIncumbent::new();
        assert!(inc.try_install(0.0, &[pid(0)]));
        assert_eq!(inc.best(), 0.0);
    }

    #[test]
    fn test_concurrent_installs_maximum_wins() {
        let inc = Arc::new(SharedIncumbent::new());
        let values = vec![30.0, 20.0, 40.0, 5.0, 120.0, 75.0, 50.0, 60.0, 90.0];

        let handles: Vec<_> = values
            .iter()
            .copied()
            .enumerate()
            .map(|(i, value)| {
                let inc = Arc::clone(&inc);
                thread::spawn(move || inc.try_install(value, &[pid(i)]))
            })
            .collect();

        let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.iter().any(|&r| r));

        assert_eq!(inc.best(), 120.0);
        let snap = inc.snapshot().unwrap();
        assert_eq!(snap.hypervolume(), 120.0);
        assert_eq!(snap.members(), &[pid(4)]);
    }
}
