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

//! Exact worst-case drop bound. Completions are enumerated in descending
//! order of their marginal-sum estimate and evaluated exactly. Once the
//! estimate of the next completion falls to the incumbent, every completion
//! not yet evaluated is bounded by it, and every evaluated one was no better,
//! so the branch is pruned. A completion that beats the incumbent, or an
//! enumeration that runs out before the estimates drop far enough, leaves the
//! branch undecided.

use super::{BoundInput, BoundOutcome, BoundProvider};
use crate::config::BoundKind;
use crate::subset_sum::SubsetSumEnumerator;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SubsetSumDropBound;

impl BoundProvider for SubsetSumDropBound {
    #[inline]
    fn kind(&self) -> BoundKind {
        BoundKind::SubsetSumDrop
    }

    fn evaluate(&self, input: &mut BoundInput<'_, '_>) -> BoundOutcome {
        let points = input.problem.points;
        let missing = input.missing();
        let requests = input.points_left();
        let marginals = &input.table.marginals()[input.cursor..];
        let remaining = &input.table.ids()[input.cursor..];

        let completions: Vec<_> = SubsetSumEnumerator::new(marginals, missing)
            .take(requests)
            .collect();
        let Some(last) = completions.last() else {
            return BoundOutcome::Inconclusive;
        };
        if input.hv + last.sum() >= input.best {
            return BoundOutcome::Inconclusive;
        }

        let gather = &mut input.scratch.gather;
        for completion in &completions {
            gather.clear();
            gather.extend(input.subset.iter().map(|&id| points.point(id)));
            gather.extend(
                completion
                    .positions()
                    .iter()
                    .map(|&position| points.point(remaining[position])),
            );
            if input.oracle.volume(gather) > input.best {
                return BoundOutcome::Inconclusive;
            }
            if input.hv + completion.sum() <= input.best {
                return BoundOutcome::Prune;
            }
        }

        BoundOutcome::Inconclusive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bound::testing::{NodeFixture, best_completion, sample_points};
    use crate::config::SolverConfig;

    #[test]
    fn test_prunes_only_when_no_completion_beats_best() {
        let points = sample_points();
        let config = SolverConfig::default();
        let cases: &[(usize, &[usize], &[usize])] = &[
            (2, &[0], &[1, 2, 3, 4, 5]),
            (3, &[3], &[0, 1, 2, 4, 5]),
            (4, &[0, 1], &[2, 3, 4, 5]),
        ];
        for &(k, subset, remaining) in cases {
            let truth = best_completion(&points, k, subset, remaining);
            for best in [truth * 0.5, truth * 0.95, truth, truth * 1.05, truth * 2.0] {
                let mut fixture = NodeFixture::new(&points, k, &config, subset, remaining);
                let outcome = fixture.evaluate(&SubsetSumDropBound, best);
                if truth > best {
                    assert!(!outcome.prunes(best), "k={k} best={best}: pruned a better branch");
                }
            }
        }
    }

    #[test]
    fn test_prunes_hopeless_branch() {
        let points = sample_points();
        let config = SolverConfig::default();
        let mut fixture = NodeFixture::new(&points, 2, &config, &[0], &[1, 2, 3]);
        let truth = best_completion(&points, 2, &[0], &[1, 2, 3]);
        let best = fixture.hv + fixture.table.marginals().iter().copied().fold(0.0, f64::max) + 1.0;
        assert!(best > truth);
        // Even the largest estimate is below `best`: the first completion decides.
        assert_eq!(
            fixture.evaluate(&SubsetSumDropBound, best),
            BoundOutcome::Prune
        );
    }

    #[test]
    fn test_undecided_when_estimates_stay_high() {
        let points = sample_points();
        let config = SolverConfig::default();
        let mut fixture = NodeFixture::new(&points, 2, &config, &[0], &[1, 2, 3]);
        assert_eq!(
            fixture.evaluate(&SubsetSumDropBound, 0.0),
            BoundOutcome::Inconclusive
        );
    }
}
