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

//! # Branch Engine
//!
//! The recursive include/exclude search. A node owns a cursor into its
//! frame's [`CandidateTable`]: rows before the cursor were decided by
//! ancestors, the row at the cursor is the candidate decided next and the
//! rows after it are still open. The accepted subset lives in a separate
//! buffer that grows on include and shrinks on return.
//!
//! Per node:
//!
//! 1. A complete subset is offered to the incumbent.
//! 2. A dead node (too few candidates left) returns.
//! 3. The bound chain runs; the first bound at or below `best` prunes.
//! 4. The candidate is accepted, every open candidate's marginal
//!    contribution is updated against the grown subset and the include
//!    branch continues with the best updated candidate in front.
//! 5. The marginal contributions saved before step 4 are restored and the
//!    exclude branch continues with the best of those in front.
//!
//! Both branches undo their row swap before returning, so a frame sees its
//! rows in the order it left them. Whether a branch runs in place or on
//! another worker is decided by the [`BranchDispatcher`].
//!
//! Contribution data is reused across nodes where it stays valid: an
//! include child describes the same accepted-plus-remaining set as its
//! parent, so it inherits the exclusive contributions (`is_new`), while an
//! exclude child has to recompute them.

use crate::bound::{BoundInput, BoundProvider};
use crate::config::{BoundKind, SolverConfig};
use crate::context::SearchContext;
use crate::dispatch::{BranchDispatcher, PendingBranch};
use crate::table::{CandidateTable, argmax};
use crate::task::Task;
use crate::validation;
use hssp_hv::oracle::{ContributionTracker, HypervolumeOracle};
use hssp_model::{
    index::PointId,
    point::{Point, PointSet},
};

/// Where the exclusive-drop bound takes its exclusive contributions from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExclusiveSource {
    /// Exact per node (3- and 4-dimensional instances).
    Exact,
    /// Root-level contributions; valid but looser.
    RootFallback,
}

/// The immutable description of one solve call.
#[derive(Debug)]
pub(crate) struct SearchProblem<'p> {
    pub(crate) points: &'p PointSet,
    pub(crate) k: usize,
    pub(crate) exclusive_source: ExclusiveSource,
    /// Nodes carry the exact accepted-plus-remaining volume and an exclusive
    /// tracker is maintained alongside the search.
    pub(crate) maintains_exclusive: bool,
    pub(crate) validation: bool,
}

impl<'p> SearchProblem<'p> {
    pub(crate) fn new(points: &'p PointSet, k: usize, config: &SolverConfig) -> Self {
        let exclusive_source = match points.dimensions() {
            3 | 4 => ExclusiveSource::Exact,
            _ => ExclusiveSource::RootFallback,
        };
        Self {
            points,
            k,
            exclusive_source,
            maintains_exclusive: exclusive_source == ExclusiveSource::Exact
                && config.bounds.contains(BoundKind::ExclusiveDrop),
            validation: config.validation,
        }
    }

    #[inline]
    pub(crate) fn point(&self, id: PointId) -> &'p Point {
        self.points.point(id)
    }
}

/// A search node apart from its table and subset buffers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Node {
    pub(crate) cursor: usize,
    /// Hypervolume of the accepted subset.
    pub(crate) hv: f64,
    /// Hypervolume of the accepted subset plus every remaining candidate.
    pub(crate) ubound1: f64,
    /// The exclusive contributions in the table are inherited from the parent
    /// and still valid.
    pub(crate) is_new: bool,
}

/// Reusable buffers of one worker.
#[derive(Debug)]
pub(crate) struct Scratch<'p> {
    pub(crate) gather: Vec<&'p Point>,
    pub(crate) values: Vec<f64>,
    /// Indexed by [`PointId`].
    pub(crate) by_id: Vec<f64>,
}

impl Scratch<'_> {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            gather: Vec::with_capacity(n + 1),
            values: Vec::with_capacity(n),
            by_id: vec![0.0; n],
        }
    }
}

struct Workspace<'p> {
    /// Tracks the accepted subset.
    marginal: Option<Box<dyn ContributionTracker<'p> + 'p>>,
    /// Tracks accepted plus remaining, with the accepted points enabled.
    exclusive: Option<Box<dyn ContributionTracker<'p> + 'p>>,
    scratch: Scratch<'p>,
    /// Marginal contributions saved for the exclude branch, one per depth.
    saved: Vec<Vec<f64>>,
}

impl<'p> Workspace<'p> {
    fn new(n: usize) -> Self {
        Self {
            marginal: None,
            exclusive: None,
            scratch: Scratch::new(n),
            saved: Vec::new(),
        }
    }

    /// Builds fresh trackers for a frame rooted at `cursor`.
    fn prepare(
        &mut self,
        problem: &SearchProblem<'p>,
        oracle: &dyn HypervolumeOracle,
        table: &CandidateTable,
        subset: &[PointId],
        cursor: usize,
    ) {
        let dimensions = problem.points.dimensions();
        let capacity = problem.points.len();

        self.marginal = oracle.tracker(dimensions, capacity).map(|mut tracker| {
            for &id in subset {
                tracker.insert(problem.point(id));
            }
            tracker
        });

        self.exclusive = if problem.maintains_exclusive {
            oracle.tracker(dimensions, capacity).map(|mut tracker| {
                for &id in subset {
                    tracker.insert(problem.point(id));
                    tracker.enable(id);
                }
                for &id in &table.ids()[cursor..] {
                    tracker.insert(problem.point(id));
                }
                tracker
            })
        } else {
            None
        };
    }

    fn release(&mut self) {
        self.marginal = None;
        self.exclusive = None;
    }

    fn take_saved(&mut self, depth: usize) -> Vec<f64> {
        if self.saved.len() <= depth {
            self.saved.resize_with(depth + 1, Vec::new);
        }
        let mut buffer = std::mem::take(&mut self.saved[depth]);
        buffer.clear();
        buffer
    }

    #[inline]
    fn return_saved(&mut self, depth: usize, buffer: Vec<f64>) {
        self.saved[depth] = buffer;
    }
}

/// Runs the search for one worker.
pub(crate) struct BranchEngine<'a, 'p> {
    problem: &'a SearchProblem<'p>,
    oracle: &'a dyn HypervolumeOracle,
    context: &'a SearchContext,
    bounds: &'a [Box<dyn BoundProvider>],
    dispatcher: &'a dyn BranchDispatcher,
    worker: usize,
    workspace: Workspace<'p>,
}

impl<'a, 'p> BranchEngine<'a, 'p> {
    pub(crate) fn new(
        problem: &'a SearchProblem<'p>,
        oracle: &'a dyn HypervolumeOracle,
        context: &'a SearchContext,
        bounds: &'a [Box<dyn BoundProvider>],
        dispatcher: &'a dyn BranchDispatcher,
        worker: usize,
    ) -> Self {
        Self {
            problem,
            oracle,
            context,
            bounds,
            dispatcher,
            worker,
            workspace: Workspace::new(problem.points.len()),
        }
    }

    /// Explores the subtree of `task` with freshly built trackers.
    pub(crate) fn execute(&mut self, task: Task) {
        let Task {
            mut table,
            mut subset,
            node,
        } = task;
        self.workspace
            .prepare(self.problem, self.oracle, &table, &subset, node.cursor);
        self.branch(&mut table, &mut subset, node);
        self.workspace.release();
    }

    fn branch(&mut self, table: &mut CandidateTable, subset: &mut Vec<PointId>, node: Node) {
        let problem = self.problem;
        self.context.on_node_explored(self.worker);

        if problem.validation {
            validation::check_node(problem, self.oracle, self.context, table, subset, &node);
        }

        if subset.len() == problem.k {
            self.context.offer(node.hv, subset, self.worker);
            return;
        }

        let points_left = table.len() - node.cursor;
        if points_left == 0 || subset.len() + points_left < problem.k {
            return;
        }

        let mut ubound1 = node.ubound1;
        if self.prune(table, subset, &node, &mut ubound1) {
            return;
        }

        let cursor = node.cursor;
        let next = cursor + 1;
        let current = table.row(cursor);
        let point = problem.point(current.id);

        let mut excluded = self.workspace.take_saved(cursor);
        excluded.extend_from_slice(&table.marginals()[next..]);

        if let Some(tracker) = self.workspace.marginal.as_deref_mut() {
            tracker.insert(point);
        }
        if let Some(tracker) = self.workspace.exclusive.as_deref_mut() {
            tracker.enable(current.id);
        }

        subset.push(current.id);
        let included_hv = node.hv + current.marginal;
        self.update_marginals(table, subset, next, included_hv);

        let accept = table.argmax_marginal(next);
        let include = Node {
            cursor: next,
            hv: included_hv,
            ubound1,
            is_new: true,
        };
        self.continue_with_front(table, subset, include, accept);

        subset.pop();
        if let Some(tracker) = self.workspace.marginal.as_deref_mut() {
            tracker.remove(current.id);
        }
        if let Some(tracker) = self.workspace.exclusive.as_deref_mut() {
            tracker.remove(current.id);
        }

        table.marginals_mut()[next..].copy_from_slice(&excluded);
        let ignore = argmax(&excluded).map(|offset| next + offset);
        self.workspace.return_saved(cursor, excluded);

        let exclude = Node {
            cursor: next,
            hv: node.hv,
            ubound1: ubound1 - current.exclusive,
            is_new: false,
        };
        self.continue_with_front(table, subset, exclude, ignore);

        if let Some(tracker) = self.workspace.exclusive.as_deref_mut() {
            tracker.insert(point);
        }
    }

    /// Runs the bound chain. Updates `ubound1` where a bound refreshes it.
    fn prune(
        &mut self,
        table: &mut CandidateTable,
        subset: &[PointId],
        node: &Node,
        ubound1: &mut f64,
    ) -> bool {
        let best = self.context.best();
        let Workspace {
            exclusive, scratch, ..
        } = &mut self.workspace;

        let mut input = BoundInput {
            problem: self.problem,
            oracle: self.oracle,
            table,
            cursor: node.cursor,
            subset,
            hv: node.hv,
            ubound1,
            is_new: node.is_new,
            best,
            exclusive_tracker: exclusive.as_deref_mut(),
            scratch,
        };

        for bound in self.bounds {
            if bound.evaluate(&mut input).prunes(best) {
                self.context.on_pruning(bound.kind());
                return true;
            }
        }
        false
    }

    /// Recomputes the marginal contribution of every row from `from` on
    /// against `subset`, whose volume is `hv`.
    fn update_marginals(
        &mut self,
        table: &mut CandidateTable,
        subset: &[PointId],
        from: usize,
        hv: f64,
    ) {
        let points = self.problem.points;

        if let Some(tracker) = self.workspace.marginal.as_deref_mut() {
            for row in from..table.len() {
                let contribution = tracker.contribution_of(points.point(table.id(row)));
                table.set_marginal(row, contribution);
            }
            return;
        }

        let gather = &mut self.workspace.scratch.gather;
        gather.clear();
        gather.extend(subset.iter().map(|&id| points.point(id)));
        for row in from..table.len() {
            gather.push(points.point(table.id(row)));
            let contribution = (self.oracle.volume(gather) - hv).max(0.0);
            gather.pop();
            table.set_marginal(row, contribution);
        }
    }

    /// Moves `front` to the node's cursor, continues, and moves it back.
    fn continue_with_front(
        &mut self,
        table: &mut CandidateTable,
        subset: &mut Vec<PointId>,
        node: Node,
        front: Option<usize>,
    ) {
        if let Some(row) = front {
            table.swap_rows(node.cursor, row);
        }
        self.continue_branch(table, subset, node);
        if let Some(row) = front {
            table.swap_rows(node.cursor, row);
        }
    }

    fn continue_branch(&mut self, table: &mut CandidateTable, subset: &mut Vec<PointId>, node: Node) {
        let pending = PendingBranch {
            table,
            subset,
            node,
            k: self.problem.k,
        };
        if self.dispatcher.offer(self.context, &pending) {
            return;
        }
        self.branch(table, subset, node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bound;
    use crate::config::BoundChain;
    use crate::dispatch::InlineDispatcher;
    use hssp_hv::slicing::SlicingOracle;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn random_points(seed: u64, n: usize, d: usize) -> PointSet {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|_| (0..d).map(|_| rng.random_range(0.5..10.0)).collect())
            .collect();
        PointSet::new(d, rows).unwrap()
    }

    fn brute_force(points: &PointSet, k: usize) -> f64 {
        let oracle = SlicingOracle::new();
        let n = points.len();
        let mut best = 0.0f64;
        for mask in 0u32..(1 << n) {
            if mask.count_ones() as usize != k {
                continue;
            }
            let chosen: Vec<&Point> = points
                .iter()
                .filter(|p| mask & (1 << p.id().get()) != 0)
                .collect();
            best = best.max(oracle.volume(&chosen));
        }
        best
    }

    /// Runs the engine from a root without bootstrap seeding.
    fn search(points: &PointSet, k: usize, config: &SolverConfig) -> (f64, u64) {
        let oracle = SlicingOracle::new();
        let problem = SearchProblem::new(points, k, config);
        let context = SearchContext::new(config);
        let bounds = bound::providers(&config.bounds);

        let all: Vec<&Point> = points.iter().collect();
        let marginal: Vec<f64> = all.iter().map(|&p| oracle.volume(&[p])).collect();
        let mut exclusive = vec![0.0; all.len()];
        oracle.exclusive_contributions(&all, &mut exclusive);
        let mut table = CandidateTable::from_contributions(points, &marginal, &exclusive);
        if let Some(first) = table.argmax_marginal(0) {
            table.swap_rows(0, first);
        }
        let root = Task::root(table, k, oracle.volume(&all));

        let mut engine = BranchEngine::new(&problem, &oracle, &context, &bounds, &InlineDispatcher, 0);
        engine.execute(root);

        (context.best(), context.nodes_explored())
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_finds_optimum_across_dimensions() {
        for (seed, d) in [(1, 2), (2, 3), (3, 4), (4, 5)] {
            let points = random_points(seed, 9, d);
            for k in 2..=6 {
                let config = SolverConfig {
                    validation: true,
                    ..SolverConfig::default()
                };
                let (best, _) = search(&points, k, &config);
                let expected = brute_force(&points, k);
                assert!(approx_eq(best, expected), "d={d} k={k}: {best} vs {expected}");
            }
        }
    }

    #[test]
    fn test_every_bound_chain_finds_the_optimum() {
        let points = random_points(11, 8, 3);
        let expected = brute_force(&points, 3);
        let chains = [
            BoundChain::empty(),
            BoundChain::new([BoundKind::MarginalSum]),
            BoundChain::new([BoundKind::ExclusiveDrop]),
            BoundChain::new([BoundKind::GreedyApproximation]),
            BoundChain::new([BoundKind::SubsetSumDrop]),
            BoundChain::new(BoundKind::ALL),
        ];
        for bounds in chains {
            let config = SolverConfig {
                validation: true,
                bounds: bounds.clone(),
                ..SolverConfig::default()
            };
            let (best, _) = search(&points, 3, &config);
            assert!(approx_eq(best, expected), "chain {bounds}: {best} vs {expected}");
        }
    }

    #[test]
    fn test_pruning_reduces_explored_nodes() {
        let points = random_points(5, 10, 3);
        let unpruned = SolverConfig {
            bounds: BoundChain::empty(),
            ..SolverConfig::default()
        };
        let (best_all, nodes_all) = search(&points, 4, &unpruned);
        let (best, nodes) = search(&points, 4, &SolverConfig::default());
        assert!(approx_eq(best, best_all));
        assert!(nodes < nodes_all, "{nodes} >= {nodes_all}");
    }

    #[test]
    fn test_problem_picks_exclusive_source_by_dimension() {
        let config = SolverConfig::default();
        for (d, source) in [
            (2, ExclusiveSource::RootFallback),
            (3, ExclusiveSource::Exact),
            (4, ExclusiveSource::Exact),
            (5, ExclusiveSource::RootFallback),
        ] {
            let points = random_points(0, 3, d);
            let problem = SearchProblem::new(&points, 2, &config);
            assert_eq!(problem.exclusive_source, source);
            assert_eq!(problem.maintains_exclusive, source == ExclusiveSource::Exact);
        }

        let points = random_points(0, 3, 3);
        let marginal_only = SolverConfig {
            bounds: BoundChain::new([BoundKind::MarginalSum]),
            ..SolverConfig::default()
        };
        assert!(!SearchProblem::new(&points, 2, &marginal_only).maintains_exclusive);
    }
}
