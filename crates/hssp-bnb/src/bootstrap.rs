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

//! Prepares the root of the search: answers the degenerate subset sizes
//! directly, seeds the incumbent with a greedy subset and launches the
//! engine on one or more workers.

use crate::bound::BoundProvider;
use crate::context::SearchContext;
use crate::dispatch::InlineDispatcher;
use crate::engine::{BranchEngine, ExclusiveSource, SearchProblem};
use crate::result::SolveMethod;
use crate::scheduler;
use crate::table::{CandidateTable, argmax, argmin};
use crate::task::Task;
use hssp_hv::oracle::HypervolumeOracle;
use hssp_model::{index::PointId, point::Point};

pub(crate) struct RootBootstrap<'a, 'p> {
    problem: &'a SearchProblem<'p>,
    oracle: &'a dyn HypervolumeOracle,
    context: &'a SearchContext,
    bounds: &'a [Box<dyn BoundProvider>],
}

impl<'a, 'p> RootBootstrap<'a, 'p> {
    pub(crate) fn new(
        problem: &'a SearchProblem<'p>,
        oracle: &'a dyn HypervolumeOracle,
        context: &'a SearchContext,
        bounds: &'a [Box<dyn BoundProvider>],
    ) -> Self {
        Self {
            problem,
            oracle,
            context,
            bounds,
        }
    }

    /// Solves the problem, leaving the optimum in the context's incumbent.
    /// Expects `1 <= k <= n`.
    pub(crate) fn run(&self) -> SolveMethod {
        let points = self.problem.points;
        let k = self.problem.k;
        let n = points.len();
        debug_assert!(k >= 1 && k <= n, "subset size {k} out of range for {n} points");

        let all: Vec<&'p Point> = points.iter().collect();
        let marginal: Vec<f64> = all.iter().map(|&p| self.oracle.volume(&[p])).collect();

        if k == 1 {
            if let Some(best) = argmax(&marginal) {
                self.context.seed(marginal[best], &[PointId::new(best)]);
            }
            return SolveMethod::SingleBest;
        }

        let total = self.oracle.volume(&all);
        let ids: Vec<PointId> = all.iter().map(|p| p.id()).collect();
        if k == n {
            self.context.seed(total, &ids);
            return SolveMethod::FullSet;
        }

        let mut exclusive = vec![0.0; n];
        self.oracle.exclusive_contributions(&all, &mut exclusive);

        if k + 1 == n {
            if let Some(worst) = argmin(&exclusive) {
                let members: Vec<PointId> = ids.iter().copied().filter(|id| id.get() != worst).collect();
                self.context.seed(total - exclusive[worst], &members);
            }
            return SolveMethod::DropOne;
        }

        if self.problem.exclusive_source == ExclusiveSource::Exact {
            self.seed_greedy(&all);
        }

        let mut table = CandidateTable::from_contributions(points, &marginal, &exclusive);
        if let Some(first) = table.argmax_marginal(0) {
            table.swap_rows(0, first);
        }
        let root = Task::root(table, k, total);

        tracing::debug!(
            n,
            k,
            dimensions = points.dimensions(),
            workers = self.context.workers(),
            best = self.context.best(),
            "starting branch and bound"
        );
        if self.context.workers() == 1 {
            let mut engine = BranchEngine::new(
                self.problem,
                self.oracle,
                self.context,
                self.bounds,
                &InlineDispatcher,
                0,
            );
            engine.execute(root);
            self.context.on_task_executed();
        } else {
            scheduler::run_pool(self.problem, self.oracle, self.context, self.bounds, root);
        }
        SolveMethod::BranchAndBound
    }

    /// Decremental greedy: drops the point with the smallest exclusive
    /// contribution until `k` points remain.
    fn seed_greedy(&self, all: &[&'p Point]) {
        let k = self.problem.k;
        let mut working = all.to_vec();
        let mut contributions = vec![0.0; working.len()];

        while working.len() > k {
            contributions.truncate(working.len());
            self.oracle.exclusive_contributions(&working, &mut contributions);
            let Some(worst) = argmin(&contributions) else {
                break;
            };
            working.swap_remove(worst);
        }

        let volume = self.oracle.volume(&working);
        let members: Vec<PointId> = working.iter().map(|p| p.id()).collect();
        if self.context.seed(volume, &members) {
            tracing::debug!(volume, "greedy incumbent installed");
        }
    }
}
