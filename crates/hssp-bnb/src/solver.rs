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

//! The public entry point.
//!
//! ```
//! use hssp_bnb::solver::SolverBuilder;
//! use hssp_model::point::PointSet;
//!
//! let points = PointSet::new(2, vec![vec![1.0, 5.0], vec![5.0, 1.0], vec![3.0, 3.0]]).unwrap();
//! let solver = SolverBuilder::new().workers(1).build();
//! let outcome = solver.solve(&points, 1).unwrap();
//! assert_eq!(outcome.hypervolume(), 9.0);
//! ```

use crate::bootstrap::RootBootstrap;
use crate::bound;
use crate::config::{BoundChain, SolverConfig};
use crate::context::SearchContext;
use crate::engine::SearchProblem;
use crate::result::SolverOutcome;
use crate::stats::SolverStatistics;
use hssp_hv::{oracle::HypervolumeOracle, slicing::SlicingOracle};
use hssp_model::point::PointSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SolveError {
    #[error("cannot select a subset of an empty point set")]
    EmptyInput,
    #[error("subset size {k} is out of range for {n} points (expected 1..={n})")]
    InvalidSubsetSize { k: usize, n: usize },
    #[error("the solver needs at least one worker")]
    ZeroWorkers,
    #[error("the search finished without a solution")]
    NoSolution,
}

/// Exact solver for the hypervolume subset selection problem.
#[derive(Debug, Clone, Default)]
pub struct HsspSolver<O = SlicingOracle> {
    oracle: O,
    config: SolverConfig,
}

impl HsspSolver<SlicingOracle> {
    #[inline]
    pub fn new(config: SolverConfig) -> Self {
        Self::with_oracle(SlicingOracle::new(), config)
    }
}

impl<O> HsspSolver<O>
where
    O: HypervolumeOracle,
{
    #[inline]
    pub fn with_oracle(oracle: O, config: SolverConfig) -> Self {
        Self { oracle, config }
    }

    #[inline]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    #[inline]
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Finds a subset of exactly `k` points with the largest hypervolume.
    pub fn solve(&self, points: &PointSet, k: usize) -> Result<SolverOutcome, SolveError> {
        let n = points.len();
        if n == 0 {
            return Err(SolveError::EmptyInput);
        }
        if k == 0 || k > n {
            return Err(SolveError::InvalidSubsetSize { k, n });
        }
        if self.config.workers == 0 {
            return Err(SolveError::ZeroWorkers);
        }

        tracing::debug!(
            n,
            k,
            dimensions = points.dimensions(),
            oracle = self.oracle.name(),
            config = %self.config,
            "solving"
        );

        let problem = SearchProblem::new(points, k, &self.config);
        let context = SearchContext::new(&self.config);
        let bounds = bound::providers(&self.config.bounds);
        let method = RootBootstrap::new(&problem, &self.oracle, &context, &bounds).run();
        context.finish();

        let statistics = SolverStatistics::collect(&context);
        let solution = context.snapshot().ok_or(SolveError::NoSolution)?;
        tracing::debug!(
            hypervolume = solution.hypervolume(),
            %method,
            nodes = statistics.nodes_explored,
            "solved"
        );
        Ok(SolverOutcome::new(solution, method, statistics))
    }
}

/// By-value builder for [`HsspSolver`].
#[derive(Debug, Clone, Default)]
pub struct SolverBuilder<O = SlicingOracle> {
    oracle: O,
    config: SolverConfig,
}

impl SolverBuilder<SlicingOracle> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<O> SolverBuilder<O>
where
    O: HypervolumeOracle,
{
    /// Sets the number of worker threads.
    #[inline]
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Enables the per-node consistency checks.
    #[inline]
    pub fn validation(mut self, validation: bool) -> Self {
        self.config.validation = validation;
        self
    }

    /// Enables periodic progress pings.
    #[inline]
    pub fn progress(mut self, progress: bool) -> Self {
        self.config.progress = progress;
        self
    }

    /// Logs search events at `info` instead of `debug`.
    #[inline]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Sets the pruning bounds, in evaluation order.
    #[inline]
    pub fn bounds(mut self, bounds: BoundChain) -> Self {
        self.config.bounds = bounds;
        self
    }

    /// Replaces the hypervolume oracle.
    #[inline]
    pub fn oracle<P>(self, oracle: P) -> SolverBuilder<P>
    where
        P: HypervolumeOracle,
    {
        SolverBuilder {
            oracle,
            config: self.config,
        }
    }

    #[inline]
    pub fn build(self) -> HsspSolver<O> {
        HsspSolver::with_oracle(self.oracle, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoundKind;
    use crate::result::SolveMethod;
    use hssp_model::{index::PointId, point::Point};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn triangle() -> PointSet {
        PointSet::new(2, vec![vec![1.0, 5.0], vec![5.0, 1.0], vec![3.0, 3.0]]).unwrap()
    }

    /// Points on a simplex front, so no point dominates another.
    fn random_front(seed: u64, n: usize, d: usize) -> PointSet {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|_| {
                let raw: Vec<f64> = (0..d).map(|_| rng.random_range(0.05..1.0)).collect();
                let sum: f64 = raw.iter().sum();
                raw.iter().map(|x| 10.0 * x / sum).collect()
            })
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

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
            "{actual} != {expected}"
        );
    }

    #[test]
    fn test_rejects_invalid_input() {
        let solver = SolverBuilder::new().build();
        let empty = PointSet::new(2, Vec::<Vec<f64>>::new()).unwrap();
        assert_eq!(solver.solve(&empty, 1).unwrap_err(), SolveError::EmptyInput);
        assert_eq!(
            solver.solve(&triangle(), 0).unwrap_err(),
            SolveError::InvalidSubsetSize { k: 0, n: 3 }
        );
        assert_eq!(
            solver.solve(&triangle(), 4).unwrap_err(),
            SolveError::InvalidSubsetSize { k: 4, n: 3 }
        );
        let idle = SolverBuilder::new().workers(0).build();
        assert_eq!(idle.solve(&triangle(), 2).unwrap_err(), SolveError::ZeroWorkers);
    }

    #[test]
    fn test_degenerate_subset_sizes() {
        let solver = SolverBuilder::new().build();
        let points = triangle();

        let single = solver.solve(&points, 1).unwrap();
        assert_eq!(single.method(), SolveMethod::SingleBest);
        assert_eq!(single.hypervolume(), 9.0);
        assert_eq!(single.solution().membership(3), vec![0, 0, 1]);

        let drop_one = solver.solve(&points, 2).unwrap();
        assert_eq!(drop_one.method(), SolveMethod::DropOne);
        assert_eq!(drop_one.hypervolume(), 11.0);

        let full = solver.solve(&points, 3).unwrap();
        assert_eq!(full.method(), SolveMethod::FullSet);
        assert_eq!(full.hypervolume(), 13.0);
        assert_eq!(full.solution().membership(3), vec![1, 1, 1]);
    }

    #[test]
    fn test_four_points_in_three_dimensions() {
        let points = PointSet::new(
            3,
            vec![
                vec![4.0, 1.0, 1.0],
                vec![1.0, 4.0, 1.0],
                vec![1.0, 1.0, 4.0],
                vec![2.0, 2.0, 2.0],
            ],
        )
        .unwrap();
        let outcome = SolverBuilder::new().validation(true).build().solve(&points, 2).unwrap();
        assert_eq!(outcome.method(), SolveMethod::BranchAndBound);
        assert_close(outcome.hypervolume(), brute_force(&points, 2));
        assert_eq!(outcome.solution().len(), 2);

        let members: Vec<&Point> = outcome
            .solution()
            .members()
            .iter()
            .map(|&id| points.point(id))
            .collect();
        assert_close(SlicingOracle::new().volume(&members), outcome.hypervolume());
    }

    #[test]
    fn test_matches_brute_force_on_random_fronts() {
        for (seed, d, n) in [(1, 2, 12), (2, 3, 12), (3, 4, 10), (4, 5, 9)] {
            let points = random_front(seed, n, d);
            for k in [2, n / 2, n - 2] {
                let outcome = SolverBuilder::new()
                    .validation(true)
                    .build()
                    .solve(&points, k)
                    .unwrap();
                assert_close(outcome.hypervolume(), brute_force(&points, k));
                assert_eq!(outcome.solution().len(), k);
            }
        }
    }

    #[test]
    fn test_worker_count_does_not_change_the_optimum() {
        for (seed, d) in [(7, 2), (8, 3), (9, 5)] {
            let points = random_front(seed, 14, d);
            let expected = brute_force(&points, 6);
            for workers in [1, 2, 4, 8] {
                let outcome = SolverBuilder::new()
                    .workers(workers)
                    .build()
                    .solve(&points, 6)
                    .unwrap();
                assert_close(outcome.hypervolume(), expected);
                assert_eq!(outcome.statistics().used_workers, workers);
                assert_eq!(outcome.statistics().nodes_per_worker.len(), workers);
            }
        }
    }

    #[test]
    fn test_parallel_validation_sees_every_subset_once() {
        let points = random_front(21, 12, 3);
        let outcome = SolverBuilder::new()
            .workers(4)
            .validation(true)
            .build()
            .solve(&points, 5)
            .unwrap();
        assert_close(outcome.hypervolume(), brute_force(&points, 5));
    }

    #[test]
    fn test_every_bound_chain_agrees() {
        let points = random_front(5, 11, 3);
        let expected = brute_force(&points, 4);
        let mut chains = vec![BoundChain::empty(), BoundChain::new(BoundKind::ALL)];
        chains.extend(BoundKind::ALL.map(|kind| BoundChain::new([kind])));
        for bounds in chains {
            let outcome = SolverBuilder::new()
                .workers(2)
                .bounds(bounds.clone())
                .build()
                .solve(&points, 4)
                .unwrap();
            assert_close(outcome.hypervolume(), expected);
        }
    }

    #[test]
    fn test_statistics_are_consistent() {
        let points = random_front(3, 12, 3);
        let outcome = SolverBuilder::new().workers(3).build().solve(&points, 5).unwrap();
        let stats = outcome.statistics();
        assert_eq!(stats.nodes_per_worker.iter().sum::<u64>(), stats.nodes_explored);
        assert!(stats.tasks_executed >= 1);
        assert!(stats.incumbent_updates >= 1);
        assert!(stats.nodes_explored > 0);
    }

    #[test]
    fn test_dominated_points_are_never_needed() {
        // Point 3 is dominated by point 2 and adds nothing.
        let points = PointSet::new(
            2,
            vec![vec![1.0, 5.0], vec![5.0, 1.0], vec![3.0, 3.0], vec![2.0, 2.0], vec![4.0, 2.5]],
        )
        .unwrap();
        let outcome = SolverBuilder::new().build().solve(&points, 3).unwrap();
        assert_close(outcome.hypervolume(), brute_force(&points, 3));
        assert!(!outcome.solution().contains(PointId::new(3)));
    }

    #[test]
    fn test_builder_sets_config() {
        let solver = SolverBuilder::new()
            .workers(4)
            .validation(true)
            .progress(true)
            .verbose(true)
            .bounds(BoundChain::new([BoundKind::SubsetSumDrop]))
            .build();
        let config = solver.config();
        assert_eq!(config.workers, 4);
        assert!(config.validation && config.progress && config.verbose);
        assert_eq!(config.bounds.kinds(), &[BoundKind::SubsetSumDrop]);
        assert_eq!(solver.oracle().name(), SlicingOracle::new().name());
    }
}
