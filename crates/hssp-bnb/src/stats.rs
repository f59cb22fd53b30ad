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

use crate::config::BoundKind;
use crate::context::SearchContext;
use std::time::Duration;

/// Statistics collected during one solve call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SolverStatistics {
    /// Total nodes visited over all workers.
    pub nodes_explored: u64,
    /// Nodes visited by each worker, indexed by worker.
    pub nodes_per_worker: Vec<u64>,
    /// Tasks executed by the worker pool, including the root task.
    pub tasks_executed: u64,
    /// Nodes pruned by each bound, indexed by [`BoundKind::index`].
    pub prunings: [u64; BoundKind::COUNT],
    /// Improvements of the incumbent, including the initial one.
    pub incumbent_updates: u64,
    pub used_workers: usize,
    pub time_total: Duration,
}

impl SolverStatistics {
    pub(crate) fn collect(context: &SearchContext) -> Self {
        Self {
            nodes_explored: context.nodes_explored(),
            nodes_per_worker: context.nodes_per_worker(),
            tasks_executed: context.tasks_executed(),
            prunings: BoundKind::ALL.map(|kind| context.prunings(kind)),
            incumbent_updates: context.incumbent_updates(),
            used_workers: context.workers(),
            time_total: context.elapsed(),
        }
    }

    #[inline]
    pub fn prunings(&self, kind: BoundKind) -> u64 {
        self.prunings[kind.index()]
    }

    #[inline]
    pub fn total_prunings(&self) -> u64 {
        self.prunings.iter().sum()
    }

    /// Nodes per second over the whole solve call; zero for an instant one.
    pub fn nodes_per_second(&self) -> f64 {
        let seconds = self.time_total.as_secs_f64();
        if seconds > 0.0 {
            self.nodes_explored as f64 / seconds
        } else {
            0.0
        }
    }
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "HSSP Solver Statistics:")?;
        writeln!(f, "  Nodes explored:       {}", self.nodes_explored)?;
        writeln!(f, "  Nodes per second:     {:.0}", self.nodes_per_second())?;
        writeln!(f, "  Tasks executed:       {}", self.tasks_executed)?;
        for kind in BoundKind::ALL {
            writeln!(f, "  Prunings ({:<22} {}", format!("{kind}):"), self.prunings(kind))?;
        }
        writeln!(f, "  Incumbent updates:    {}", self.incumbent_updates)?;
        writeln!(f, "  Workers:              {}", self.used_workers)?;
        for (worker, nodes) in self.nodes_per_worker.iter().enumerate() {
            writeln!(f, "    Worker {worker:<3} nodes:    {nodes}")?;
        }
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use hssp_model::index::PointId;

    #[test]
    fn test_collect_reads_every_counter() {
        let context = SearchContext::new(&SolverConfig {
            workers: 2,
            ..SolverConfig::default()
        });
        context.on_node_explored(0);
        context.on_node_explored(1);
        context.on_node_explored(1);
        context.on_task_executed();
        context.on_pruning(BoundKind::ExclusiveDrop);
        context.on_pruning(BoundKind::ExclusiveDrop);
        context.on_pruning(BoundKind::MarginalSum);
        context.seed(4.0, &[PointId::new(0)]);
        context.offer(5.0, &[PointId::new(1)], 1);

        let stats = SolverStatistics::collect(&context);
        assert_eq!(stats.nodes_explored, 3);
        assert_eq!(stats.nodes_per_worker, vec![1, 2]);
        assert_eq!(stats.tasks_executed, 1);
        assert_eq!(stats.prunings(BoundKind::ExclusiveDrop), 2);
        assert_eq!(stats.prunings(BoundKind::MarginalSum), 1);
        assert_eq!(stats.prunings(BoundKind::SubsetSumDrop), 0);
        assert_eq!(stats.total_prunings(), 3);
        assert_eq!(stats.incumbent_updates, 2);
        assert_eq!(stats.used_workers, 2);
    }

    #[test]
    fn test_display_lists_every_bound() {
        let stats = SolverStatistics {
            nodes_explored: 42,
            nodes_per_worker: vec![42],
            used_workers: 1,
            ..SolverStatistics::default()
        };
        let text = stats.to_string();
        assert!(text.starts_with("HSSP Solver Statistics:"));
        assert!(text.contains("Nodes explored:       42"));
        for kind in BoundKind::ALL {
            assert!(text.contains(kind.name()), "missing {kind}");
        }
    }

    #[test]
    fn test_nodes_per_second_of_instant_run_is_zero() {
        assert_eq!(SolverStatistics::default().nodes_per_second(), 0.0);
    }
}
