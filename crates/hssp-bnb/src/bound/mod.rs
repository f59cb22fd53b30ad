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

//! # Pruning Bounds
//!
//! Each provider computes an upper bound on the best hypervolume any
//! completion of the current node can reach. A node is pruned as soon as one
//! provider in the chain proves it cannot beat the incumbent.
//!
//! Providers answer with a [`BoundOutcome`]:
//!
//! - `Value(v)`: every completion is worth at most `v`; prune iff `v <= best`.
//! - `Prune`: the provider proved directly that no completion beats `best`.
//! - `Inconclusive`: the provider could not decide; never prunes.

mod exclusive;
mod greedy;
mod marginal;
mod subset_sum;

pub(crate) use exclusive::ExclusiveDropBound;
pub(crate) use greedy::GreedyApproximationBound;
pub(crate) use marginal::MarginalSumBound;
pub(crate) use subset_sum::SubsetSumDropBound;

use crate::config::{BoundChain, BoundKind};
use crate::engine::{ExclusiveSource, Scratch, SearchProblem};
use crate::table::CandidateTable;
use hssp_hv::oracle::{ContributionTracker, HypervolumeOracle};
use hssp_model::index::PointId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum BoundOutcome {
    Value(f64),
    Prune,
    Inconclusive,
}

impl BoundOutcome {
    #[inline]
    pub(crate) fn prunes(self, best: f64) -> bool {
        match self {
            BoundOutcome::Value(bound) => bound <= best,
            BoundOutcome::Prune => true,
            BoundOutcome::Inconclusive => false,
        }
    }
}

/// The state of a live node as seen by the bound providers.
pub(crate) struct BoundInput<'a, 'p> {
    pub(crate) problem: &'a SearchProblem<'p>,
    pub(crate) oracle: &'a dyn HypervolumeOracle,
    pub(crate) table: &'a mut CandidateTable,
    pub(crate) cursor: usize,
    pub(crate) subset: &'a [PointId],
    pub(crate) hv: f64,
    /// Volume of the accepted subset plus every remaining candidate.
    pub(crate) ubound1: &'a mut f64,
    pub(crate) is_new: bool,
    pub(crate) best: f64,
    pub(crate) exclusive_tracker: Option<&'a mut (dyn ContributionTracker<'p> + 'p)>,
    pub(crate) scratch: &'a mut Scratch<'p>,
}

impl<'a, 'p> BoundInput<'a, 'p> {
    /// Points still needed to complete the subset.
    #[inline]
    pub(crate) fn missing(&self) -> usize {
        self.problem.k - self.subset.len()
    }

    #[inline]
    pub(crate) fn points_left(&self) -> usize {
        self.table.len() - self.cursor
    }

    /// Fills the gather buffer with the accepted subset followed by every
    /// remaining candidate in row order.
    pub(crate) fn gather_subset_and_remaining(&mut self) {
        let points = self.problem.points;
        let gather = &mut self.scratch.gather;
        gather.clear();
        gather.extend(self.subset.iter().map(|&id| points.point(id)));
        gather.extend(
            self.table.ids()[self.cursor..]
                .iter()
                .map(|&id| points.point(id)),
        );
    }

    /// Recomputes the exclusive contribution of every remaining candidate
    /// within the accepted subset plus the remaining candidates.
    pub(crate) fn refresh_exclusive(&mut self) {
        debug_assert_eq!(self.problem.exclusive_source, ExclusiveSource::Exact);

        if let Some(tracker) = &mut self.exclusive_tracker {
            let by_id = &mut self.scratch.by_id;
            tracker.exclusive_contributions(by_id);
            for row in self.cursor..self.table.len() {
                let id = self.table.id(row);
                self.table.set_exclusive(row, by_id[id.get()]);
            }
            return;
        }

        self.gather_subset_and_remaining();
        let offset = self.subset.len();
        let values = &mut self.scratch.values;
        values.clear();
        values.resize(self.scratch.gather.len(), 0.0);
        self.oracle
            .exclusive_contributions(&self.scratch.gather, values);
        for row in self.cursor..self.table.len() {
            self.table
                .set_exclusive(row, values[offset + row - self.cursor]);
        }
    }
}

pub(crate) trait BoundProvider: Send + Sync {
    fn kind(&self) -> BoundKind;

    fn evaluate(&self, input: &mut BoundInput<'_, '_>) -> BoundOutcome;
}

/// Instantiates the providers of `chain` in evaluation order.
pub(crate) fn providers(chain: &BoundChain) -> Vec<Box<dyn BoundProvider>> {
    chain
        .kinds()
        .iter()
        .map(|&kind| -> Box<dyn BoundProvider> {
            match kind {
                BoundKind::MarginalSum => Box::new(MarginalSumBound),
                BoundKind::ExclusiveDrop => Box::new(ExclusiveDropBound),
                BoundKind::GreedyApproximation => Box::new(GreedyApproximationBound),
                BoundKind::SubsetSumDrop => Box::new(SubsetSumDropBound),
            }
        })
        .collect()
}

/// Sum of the `count` largest values. Reorders `values`.
pub(crate) fn sum_of_largest(values: &mut [f64], count: usize) -> f64 {
    let count = count.min(values.len());
    if count == 0 {
        return 0.0;
    }
    if count < values.len() {
        values.select_nth_unstable_by(count - 1, |a, b| b.total_cmp(a));
    }
    values[..count].iter().sum()
}

/// Sum of the `count` smallest values. Reorders `values`.
pub(crate) fn sum_of_smallest(values: &mut [f64], count: usize) -> f64 {
    let count = count.min(values.len());
    if count == 0 {
        return 0.0;
    }
    if count < values.len() {
        values.select_nth_unstable_by(count - 1, |a, b| a.total_cmp(b));
    }
    values[..count].iter().sum()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_of_largest_and_smallest() {
        let mut v = vec![3.0, 9.0, 1.0, 7.0, 5.0];
        assert_eq!(sum_of_largest(&mut v, 2), 16.0);
        assert_eq!(sum_of_smallest(&mut v, 2), 4.0);
        assert_eq!(sum_of_largest(&mut v, 5), 25.0);
        assert_eq!(sum_of_smallest(&mut v, 0), 0.0);
        assert_eq!(sum_of_largest(&mut v, 9), 25.0);
    }

    #[test]
    fn test_outcome_prunes() {
        assert!(BoundOutcome::Value(3.0).prunes(3.0));
        assert!(!BoundOutcome::Value(3.5).prunes(3.0));
        assert!(BoundOutcome::Prune.prunes(f64::NEG_INFINITY));
        assert!(!BoundOutcome::Inconclusive.prunes(f64::INFINITY));
    }

    #[test]
    fn test_providers_follow_chain_order() {
        let chain = BoundChain::new([BoundKind::ExclusiveDrop, BoundKind::GreedyApproximation]);
        let kinds: Vec<BoundKind> = providers(&chain).iter().map(|p| p.kind()).collect();
        assert_eq!(kinds, vec![BoundKind::ExclusiveDrop, BoundKind::GreedyApproximation]);
    }
}
