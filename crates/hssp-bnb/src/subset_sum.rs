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

//! # Largest Subset Sums
//!
//! Enumerates the `k`-element subsets of a weight vector in descending order
//! of their sums without materializing all `C(n, k)` of them.
//!
//! Weights are ranked once in descending order and subsets are handled as
//! ascending lists of ranks. The best subset is the first `k` ranks. Popping
//! a subset from the max-heap emits it and queues its successors: with `next`
//! the rank after the last chosen one, each successor replaces one member of
//! the trailing run of consecutive ranks by `next`. Every subset other than
//! the first has exactly one predecessor under this rule (drop its last rank
//! and add back the largest rank below it that it does not contain), so every
//! subset is queued once and successors never outweigh their predecessor.
//!
//! ```rust
//! use hssp_bnb::subset_sum::SubsetSumEnumerator;
//!
//! let sums: Vec<f64> = SubsetSumEnumerator::new(&[1.0, 4.0, 2.0], 2)
//!     .map(|s| s.sum())
//!     .collect();
//! assert_eq!(sums, vec![6.0, 5.0, 3.0]);
//! ```

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// One enumerated subset.
#[derive(Debug, Clone, PartialEq)]
pub struct SubsetSum {
    sum: f64,
    positions: Vec<usize>,
}

impl SubsetSum {
    #[inline]
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Positions of the chosen weights in the input, ascending.
    #[inline]
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }
}

#[derive(Debug)]
struct Candidate {
    sum: f64,
    ranks: Vec<usize>,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sum
            .total_cmp(&other.sum)
            .then_with(|| other.ranks.cmp(&self.ranks))
    }
}

/// Iterator over the `k`-subsets of `weights` by descending sum.
///
/// Yields nothing when `k` is zero or exceeds the number of weights.
#[derive(Debug)]
pub struct SubsetSumEnumerator<'w> {
    weights: &'w [f64],
    /// `order[rank]` is the input position of the `rank`-th largest weight.
    order: Vec<usize>,
    heap: BinaryHeap<Candidate>,
    k: usize,
}

impl<'w> SubsetSumEnumerator<'w> {
    pub fn new(weights: &'w [f64], k: usize) -> Self {
        let mut order: Vec<usize> = (0..weights.len()).collect();
        order.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]));

        let mut heap = BinaryHeap::new();
        if k > 0 && k <= weights.len() {
            let ranks: Vec<usize> = (0..k).collect();
            let sum = ranks.iter().map(|&r| weights[order[r]]).sum();
            heap.push(Candidate { sum, ranks });
        }

        Self {
            weights,
            order,
            heap,
            k,
        }
    }

    #[inline]
    fn weight(&self, rank: usize) -> f64 {
        self.weights[self.order[rank]]
    }

    fn push_successors(&mut self, candidate: &Candidate) {
        let k = self.k;
        let next = candidate.ranks[k - 1] + 1;
        if next >= self.weights.len() {
            return;
        }

        let mut start = k - 1;
        while start > 0 && candidate.ranks[start] == candidate.ranks[start - 1] + 1 {
            start -= 1;
        }

        for replaced in start..k {
            let mut ranks = Vec::with_capacity(k);
            ranks.extend_from_slice(&candidate.ranks[..replaced]);
            ranks.extend_from_slice(&candidate.ranks[replaced + 1..]);
            ranks.push(next);
            // The delta is never positive, so the sum never grows.
            let delta = self.weight(next) - self.weight(candidate.ranks[replaced]);
            self.heap.push(Candidate {
                sum: candidate.sum + delta,
                ranks,
            });
        }
    }
}

impl Iterator for SubsetSumEnumerator<'_> {
    type Item = SubsetSum;

    fn next(&mut self) -> Option<Self::Item> {
        let candidate = self.heap.pop()?;
        self.push_successors(&candidate);

        let mut positions: Vec<usize> = candidate.ranks.iter().map(|&r| self.order[r]).collect();
        positions.sort_unstable();
        Some(SubsetSum {
            sum: candidate.sum,
            positions,
        })
    }
}

/// The `m` largest `k`-subset sums of `weights`; fewer only if `C(n, k) < m`.
pub fn largest_subset_sums(weights: &[f64], k: usize, m: usize) -> Vec<SubsetSum> {
    SubsetSumEnumerator::new(weights, k).take(m).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn binomial(n: usize, k: usize) -> usize {
        if k > n {
            return 0;
        }
        let k = k.min(n - k);
        let mut c = 1usize;
        for i in 0..k {
            c = c * (n - i) / (i + 1);
        }
        c
    }

    fn brute_force_sums(weights: &[f64], k: usize) -> Vec<f64> {
        let n = weights.len();
        let mut sums: Vec<f64> = (0u32..(1 << n))
            .filter(|mask| mask.count_ones() as usize == k)
            .map(|mask| {
                (0..n)
                    .filter(|i| mask & (1 << i) != 0)
                    .map(|i| weights[i])
                    .sum()
            })
            .collect();
        sums.sort_by(|a, b| b.total_cmp(a));
        sums
    }

    #[test]
    fn test_small_example() {
        let out = largest_subset_sums(&[1.0, 4.0, 2.0], 2, 10);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].positions(), &[1, 2]);
        assert_eq!(out[1].positions(), &[0, 1]);
        assert_eq!(out[2].positions(), &[0, 2]);
        assert_eq!(out[2].sum(), 3.0);
    }

    #[test]
    fn test_degenerate_sizes() {
        assert!(largest_subset_sums(&[1.0, 2.0], 0, 5).is_empty());
        assert!(largest_subset_sums(&[1.0, 2.0], 3, 5).is_empty());
        assert!(largest_subset_sums(&[1.0, 2.0], 1, 0).is_empty());
        assert!(largest_subset_sums(&[], 1, 5).is_empty());

        let all = largest_subset_sums(&[1.0, 2.0, 3.0], 3, 5);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].sum(), 6.0);
    }

    #[test]
    fn test_ties_are_enumerated_once() {
        let out = largest_subset_sums(&[1.0, 1.0, 1.0, 1.0], 2, 100);
        assert_eq!(out.len(), 6);
        let distinct: HashSet<Vec<usize>> = out.iter().map(|s| s.positions().to_vec()).collect();
        assert_eq!(distinct.len(), 6);
    }

    #[test]
    fn test_properties_on_random_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for n in 1..=9 {
            let weights: Vec<f64> = (0..n).map(|_| rng.random_range(0.0..100.0)).collect();
            for k in 1..=n {
                let total = binomial(n, k);
                for m in [1, 3, total, total + 4] {
                    let out = largest_subset_sums(&weights, k, m);
                    assert_eq!(out.len(), m.min(total), "n={n} k={k} m={m}");

                    for pair in out.windows(2) {
                        assert!(pair[0].sum() >= pair[1].sum(), "n={n} k={k}: sums increase");
                    }

                    let distinct: HashSet<Vec<usize>> =
                        out.iter().map(|s| s.positions().to_vec()).collect();
                    assert_eq!(distinct.len(), out.len(), "n={n} k={k}: duplicate subset");

                    let expected = brute_force_sums(&weights, k);
                    for (s, e) in out.iter().zip(expected.iter()) {
                        assert!((s.sum() - e).abs() < 1e-9, "n={n} k={k}: {} vs {}", s.sum(), e);
                        let direct: f64 = s.positions().iter().map(|&p| weights[p]).sum();
                        assert!((s.sum() - direct).abs() < 1e-9);
                        assert_eq!(s.positions().len(), k);
                    }
                }
            }
        }
    }
}
