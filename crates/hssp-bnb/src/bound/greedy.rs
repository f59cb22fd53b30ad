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

//! Greedy completion bound. Hypervolume is monotone submodular, so greedily
//! completing the subset reaches at least `1 - 1/e` of the best completion;
//! dividing the greedy value by that ratio bounds every completion from above.

use super::{BoundInput, BoundOutcome, BoundProvider};
use crate::config::BoundKind;
use crate::table::argmax;
use fixedbitset::FixedBitSet;

const APPROXIMATION_RATIO: f64 = 1.0 - 1.0 / std::f64::consts::E;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct GreedyApproximationBound;

impl BoundProvider for GreedyApproximationBound {
    #[inline]
    fn kind(&self) -> BoundKind {
        BoundKind::GreedyApproximation
    }

    fn evaluate(&self, input: &mut BoundInput<'_, '_>) -> BoundOutcome {
        let points = input.problem.points;
        let missing = input.missing();
        let remaining = &input.table.ids()[input.cursor..];

        let gains = &mut input.scratch.values;
        gains.clear();
        gains.extend_from_slice(&input.table.marginals()[input.cursor..]);

        let gather = &mut input.scratch.gather;
        gather.clear();
        gather.extend(input.subset.iter().map(|&id| points.point(id)));

        let mut taken = FixedBitSet::with_capacity(remaining.len());
        let mut value = input.hv;
        for step in 0..missing {
            let Some(pick) = argmax(gains) else {
                break;
            };
            value += gains[pick];
            taken.insert(pick);
            gains[pick] = f64::NEG_INFINITY;
            gather.push(points.point(remaining[pick]));

            if step + 1 == missing {
                break;
            }
            for (i, &id) in remaining.iter().enumerate() {
                if taken.contains(i) {
                    continue;
                }
                gather.push(points.point(id));
                gains[i] = (input.oracle.volume(gather) - value).max(0.0);
                gather.pop();
            }
        }

        BoundOutcome::Value(value / APPROXIMATION_RATIO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bound::testing::{NodeFixture, best_completion, sample_points};
    use crate::config::SolverConfig;

    #[test]
    fn test_greedy_bound_never_underestimates() {
        let points = sample_points();
        let config = SolverConfig::default();
        let cases: &[(usize, &[usize], &[usize])] = &[
            (2, &[], &[0, 1, 2, 3, 4, 5]),
            (3, &[3], &[0, 1, 2, 4, 5]),
            (4, &[0, 1], &[2, 3, 4, 5]),
            (5, &[4], &[0, 1, 2, 3, 5]),
        ];
        for &(k, subset, remaining) in cases {
            let mut fixture = NodeFixture::new(&points, k, &config, subset, remaining);
            let truth = best_completion(&points, k, subset, remaining);
            let BoundOutcome::Value(bound) = fixture.evaluate(&GreedyApproximationBound, 0.0)
            else {
                panic!("expected a value");
            };
            assert!(bound >= truth - 1e-9, "k={k}: bound {bound} < truth {truth}");
        }
    }

    #[test]
    fn test_greedy_value_is_a_feasible_completion() {
        let points = sample_points();
        let config = SolverConfig::default();
        let mut fixture = NodeFixture::new(&points, 3, &config, &[0], &[1, 2, 3, 4, 5]);
        let truth = best_completion(&points, 3, &[0], &[1, 2, 3, 4, 5]);
        let BoundOutcome::Value(bound) = fixture.evaluate(&GreedyApproximationBound, 0.0) else {
            panic!("expected a value");
        };
        assert!(bound * APPROXIMATION_RATIO <= truth + 1e-9);
    }
}
