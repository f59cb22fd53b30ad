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

//! Tight bound: start from the volume of the accepted subset plus every
//! remaining candidate and drop the `excess = points_left - missing`
//! smallest exclusive contributions, the least any completion has to lose.
//!
//! For 3- and 4-dimensional instances the exclusive contributions are exact
//! for the current node. Otherwise the root-level contributions stand in;
//! those are never larger than the node-level ones, so the bound stays valid
//! and only gets looser. In that regime the combined volume is recomputed at
//! every node because no cached value is maintained for it.

use super::{BoundInput, BoundOutcome, BoundProvider, sum_of_smallest};
use crate::config::BoundKind;
use crate::engine::ExclusiveSource;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ExclusiveDropBound;

impl BoundProvider for ExclusiveDropBound {
    #[inline]
    fn kind(&self) -> BoundKind {
        BoundKind::ExclusiveDrop
    }

    fn evaluate(&self, input: &mut BoundInput<'_, '_>) -> BoundOutcome {
        let source = input.problem.exclusive_source;
        if source == ExclusiveSource::RootFallback {
            input.gather_subset_and_remaining();
            *input.ubound1 = input.oracle.volume(&input.scratch.gather);
        }

        let combined = *input.ubound1;
        if combined <= input.best {
            return BoundOutcome::Value(combined);
        }

        // Children inherit `Ce`, so it is refreshed even when nothing is dropped.
        if source == ExclusiveSource::Exact && !input.is_new {
            input.refresh_exclusive();
        }

        let excess = input.points_left() - input.missing();
        if excess == 0 {
            return BoundOutcome::Value(combined);
        }

        let column = match source {
            ExclusiveSource::Exact => input.table.exclusives(),
            ExclusiveSource::RootFallback => input.table.root_exclusives(),
        };
        let values = &mut input.scratch.values;
        values.clear();
        values.extend_from_slice(&column[input.cursor..]);
        BoundOutcome::Value(combined - sum_of_smallest(values, excess))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bound::testing::{NodeFixture, best_completion, sample_points};
    use crate::config::SolverConfig;
    use hssp_model::point::PointSet;

    #[test]
    fn test_prunes_on_combined_volume_alone() {
        let points = sample_points();
        let config = SolverConfig::default();
        let mut fixture = NodeFixture::new(&points, 3, &config, &[0], &[1, 2, 3]);
        let combined = fixture.ubound1;
        assert_eq!(
            fixture.evaluate(&ExclusiveDropBound, combined + 1.0),
            BoundOutcome::Value(combined)
        );
    }

    #[test]
    fn test_no_excess_returns_combined_volume() {
        let points = sample_points();
        let config = SolverConfig::default();
        let mut fixture = NodeFixture::new(&points, 3, &config, &[0], &[1, 2]);
        let combined = fixture.ubound1;
        assert_eq!(
            fixture.evaluate(&ExclusiveDropBound, 0.0),
            BoundOutcome::Value(combined)
        );
    }

    #[test]
    fn test_exact_bound_never_underestimates_in_three_dimensions() {
        let points = sample_points();
        let config = SolverConfig::default();
        let cases: &[(usize, &[usize], &[usize])] = &[
            (2, &[], &[0, 1, 2, 3, 4, 5]),
            (3, &[3], &[0, 1, 2, 4, 5]),
            (4, &[0, 1], &[2, 3, 4, 5]),
        ];
        for &(k, subset, remaining) in cases {
            let mut fixture = NodeFixture::new(&points, k, &config, subset, remaining);
            let truth = best_completion(&points, k, subset, remaining);
            let BoundOutcome::Value(bound) = fixture.evaluate(&ExclusiveDropBound, 0.0) else {
                panic!("expected a value");
            };
            assert!(bound >= truth - 1e-9, "k={k}: bound {bound} < truth {truth}");
            assert!(bound <= fixture.ubound1 + 1e-9);
        }
    }

    #[test]
    fn test_root_fallback_recomputes_combined_volume() {
        let points = PointSet::new(
            2,
            vec![
                vec![1.0, 5.0],
                vec![5.0, 1.0],
                vec![3.0, 3.0],
                vec![2.0, 4.0],
                vec![4.0, 2.0],
            ],
        )
        .unwrap();
        let config = SolverConfig::default();
        let mut fixture = NodeFixture::new(&points, 3, &config, &[2], &[0, 1, 3, 4]);
        let exact = fixture.ubound1;
        fixture.ubound1 = 1e9;

        let truth = best_completion(&points, 3, &[2], &[0, 1, 3, 4]);
        let BoundOutcome::Value(bound) = fixture.evaluate(&ExclusiveDropBound, 0.0) else {
            panic!("expected a value");
        };
        assert_eq!(fixture.ubound1, exact);
        assert!(bound >= truth - 1e-9);
        assert!(bound <= exact);
    }
}
