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

//! # Search Context
//!
//! Everything the workers of one solve call share: the incumbent, per-worker
//! node counters, the dispatched-task counter, pruning counters, progress
//! reporting and, in validation mode only, the set of explored branch
//! signatures. Created once per solve and passed by shared reference.

use crate::config::{BoundKind, SolverConfig};
use crate::incumbent::SharedIncumbent;
use crate::progress::{PING_CHECK_MASK, ProgressReporter, SearchEvent};
use hssp_model::{index::PointId, solution::Solution};
use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug)]
pub struct SearchContext {
    incumbent: SharedIncumbent,
    nodes: Box<[AtomicU64]>,
    tasks: AtomicU64,
    prunings: [AtomicU64; BoundKind::COUNT],
    incumbent_updates: AtomicU64,
    signatures: Option<Mutex<FxHashSet<Box<[PointId]>>>>,
    progress: ProgressReporter,
}

impl SearchContext {
    pub fn new(config: &SolverConfig) -> Self {
        let workers = config.workers.max(1);
        Self {
            incumbent: SharedIncumbent::new(),
            nodes: (0..workers).map(|_| AtomicU64::new(0)).collect(),
            tasks: AtomicU64::new(0),
            prunings: std::array::from_fn(|_| AtomicU64::new(0)),
            incumbent_updates: AtomicU64::new(0),
            signatures: config
                .validation
                .then(|| Mutex::new(FxHashSet::default())),
            progress: ProgressReporter::new(config.progress, config.verbose),
        }
    }

    #[inline]
    pub fn incumbent(&self) -> &SharedIncumbent {
        &self.incumbent
    }

    /// Current best hypervolume, read without locking.
    #[inline]
    pub fn best(&self) -> f64 {
        self.incumbent.best()
    }

    #[inline]
    pub fn snapshot(&self) -> Option<Solution> {
        self.incumbent.snapshot()
    }

    /// Offers a complete subset found by `worker`.
    pub fn offer(&self, hypervolume: f64, members: &[PointId], worker: usize) -> bool {
        self.install(hypervolume, members, worker, SearchEvent::New)
    }

    /// Installs a subset found before the search starts.
    pub fn seed(&self, hypervolume: f64, members: &[PointId]) -> bool {
        self.install(hypervolume, members, 0, SearchEvent::Init)
    }

    fn install(&self, hypervolume: f64, members: &[PointId], worker: usize, event: SearchEvent) -> bool {
        if !self.incumbent.try_install(hypervolume, members) {
            return false;
        }
        self.incumbent_updates.fetch_add(1, Ordering::Relaxed);
        self.progress.reset_ping();
        self.progress
            .record(event, hypervolume, self.nodes_explored(), worker);
        true
    }

    /// Counts a visited node and emits a progress ping when one is due.
    #[inline]
    pub fn on_node_explored(&self, worker: usize) {
        let previous = self.nodes[worker].fetch_add(1, Ordering::Relaxed);
        if previous & PING_CHECK_MASK == PING_CHECK_MASK && self.progress.claim_ping() {
            self.progress
                .record(SearchEvent::Ping, self.best(), self.nodes_explored(), worker);
        }
    }

    #[inline]
    pub fn on_task_executed(&self) {
        self.tasks.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn on_pruning(&self, kind: BoundKind) {
        self.prunings[kind.index()].fetch_add(1, Ordering::Relaxed);
    }

    /// Records the end of the search.
    pub fn finish(&self) {
        self.progress
            .record(SearchEvent::End, self.best(), self.nodes_explored(), 0);

        if self.progress.is_verbose() {
            for (worker, nodes) in self.nodes_per_worker().into_iter().enumerate() {
                tracing::info!(worker, nodes, "worker summary");
            }
            tracing::info!(tasks = self.tasks_executed(), "dispatched tasks");
        }
    }

    /// Registers the signature of a freshly created branch. Returns `false`
    /// if the same subset was already explored, `true` otherwise (and always
    /// `true` outside validation mode).
    pub fn register_signature(&self, members: &[PointId]) -> bool {
        let Some(signatures) = &self.signatures else {
            return true;
        };
        let mut signature: Box<[PointId]> = members.into();
        signature.sort_unstable();
        signatures.lock().insert(signature)
    }

    pub fn nodes_explored(&self) -> u64 {
        self.nodes
            .iter()
            .map(|n| n.load(Ordering::Relaxed))
            .fold(0u64, u64::saturating_add)
    }

    pub fn nodes_per_worker(&self) -> Vec<u64> {
        self.nodes.iter().map(|n| n.load(Ordering::Relaxed)).collect()
    }

    #[inline]
    pub fn tasks_executed(&self) -> u64 {
        self.tasks.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn prunings(&self, kind: BoundKind) -> u64 {
        self.prunings[kind.index()].load(Ordering::Relaxed)
    }

    #[inline]
    pub fn incumbent_updates(&self) -> u64 {
        self.incumbent_updates.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.progress.elapsed()
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.nodes.len()
    }
}
