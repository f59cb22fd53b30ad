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

//! # Candidate Table
//!
//! Position-aligned columns over the candidates of a search frame:
//!
//! - `ids`: the point identity,
//! - `marginal` (`C`): contribution to the accepted subset,
//! - `exclusive` (`Ce`): exclusive contribution within accepted plus remaining,
//! - `root_exclusive` (`Cr`): exclusive contribution within the whole input.
//!
//! All reordering goes through [`CandidateTable::swap_rows`], which permutes
//! every column together. Rows before the frame's cursor belong to ancestors
//! and are never touched by descendants.

use hssp_model::{index::PointId, point::PointSet};

/// One row of a [`CandidateTable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateRow {
    pub id: PointId,
    pub marginal: f64,
    pub exclusive: f64,
    pub root_exclusive: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateTable {
    ids: Vec<PointId>,
    marginal: Vec<f64>,
    exclusive: Vec<f64>,
    root_exclusive: Vec<f64>,
}

impl CandidateTable {
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: Vec::with_capacity(capacity),
            marginal: Vec::with_capacity(capacity),
            exclusive: Vec::with_capacity(capacity),
            root_exclusive: Vec::with_capacity(capacity),
        }
    }

    /// Builds the root table in input order. `exclusive` seeds both the
    /// exclusive and the root-exclusive column.
    pub fn from_contributions(points: &PointSet, marginal: &[f64], exclusive: &[f64]) -> Self {
        debug_assert_eq!(points.len(), marginal.len());
        debug_assert_eq!(points.len(), exclusive.len());

        let mut table = Self::with_capacity(points.len());
        for ((point, &c), &ce) in points.iter().zip(marginal).zip(exclusive) {
            table.push(CandidateRow {
                id: point.id(),
                marginal: c,
                exclusive: ce,
                root_exclusive: ce,
            });
        }
        table
    }

    #[inline]
    pub fn push(&mut self, row: CandidateRow) {
        self.ids.push(row.id);
        self.marginal.push(row.marginal);
        self.exclusive.push(row.exclusive);
        self.root_exclusive.push(row.root_exclusive);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[inline]
    pub fn row(&self, row: usize) -> CandidateRow {
        CandidateRow {
            id: self.id(row),
            marginal: self.marginal[row],
            exclusive: self.exclusive[row],
            root_exclusive: self.root_exclusive[row],
        }
    }

    #[inline]
    pub fn id(&self, row: usize) -> PointId {
        debug_assert!(
            row < self.ids.len(),
            "called `CandidateTable::id` with row out of bounds: the len is {} but the index is {}",
            self.ids.len(),
            row
        );
        self.ids[row]
    }

    #[inline]
    pub fn ids(&self) -> &[PointId] {
        &self.ids
    }

    #[inline]
    pub fn marginal(&self, row: usize) -> f64 {
        self.marginal[row]
    }

    #[inline]
    pub fn marginals(&self) -> &[f64] {
        &self.marginal
    }

    #[inline]
    pub fn marginals_mut(&mut self) -> &mut [f64] {
        &mut self.marginal
    }

    #[inline]
    pub fn set_marginal(&mut self, row: usize, value: f64) {
        self.marginal[row] = value;
    }

    #[inline]
    pub fn exclusives(&self) -> &[f64] {
        &self.exclusive
    }

    #[inline]
    pub fn set_exclusive(&mut self, row: usize, value: f64) {
        self.exclusive[row] = value;
    }

    #[inline]
    pub fn root_exclusives(&self) -> &[f64] {
        &self.root_exclusive
    }

    /// Swaps two rows across every column.
    #[inline]
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        debug_assert!(
            a < self.len() && b < self.len(),
            "called `CandidateTable::swap_rows` with rows out of bounds: the len is {} but the rows are {} and {}",
            self.len(),
            a,
            b
        );
        if a == b {
            return;
        }
        self.ids.swap(a, b);
        self.marginal.swap(a, b);
        self.exclusive.swap(a, b);
        self.root_exclusive.swap(a, b);
    }

    /// Row of the first maximal marginal contribution at or after `from`.
    pub fn argmax_marginal(&self, from: usize) -> Option<usize> {
        argmax(self.marginal.get(from..)?).map(|offset| from + offset)
    }

    /// An owned copy of the rows starting at `from`.
    pub fn tail(&self, from: usize) -> Self {
        Self {
            ids: self.ids[from..].to_vec(),
            marginal: self.marginal[from..].to_vec(),
            exclusive: self.exclusive[from..].to_vec(),
            root_exclusive: self.root_exclusive[from..].to_vec(),
        }
    }
}

/// Index of the first maximum; `None` for an empty slice.
pub(crate) fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Index of the first minimum; `None` for an empty slice.
pub(crate) fn argmin(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v >= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(i: usize) -> PointId {
        PointId::new(i)
    }

    fn table() -> CandidateTable {
        let mut t = CandidateTable::with_capacity(3);
        for (i, c) in [2.0, 7.0, 7.0].into_iter().enumerate() {
            t.push(CandidateRow {
                id: pid(i),
                marginal: c,
                exclusive: c / 2.0,
                root_exclusive: c / 4.0,
            });
        }
        t
    }

    #[test]
    fn test_swap_rows_moves_every_column() {
        let mut t = table();
        let before = (t.row(0), t.row(2));
        t.swap_rows(0, 2);
        assert_eq!(t.row(0), before.1);
        assert_eq!(t.row(2), before.0);
        t.swap_rows(0, 2);
        assert_eq!(t, table());
    }

    #[test]
    fn test_exclusive_column_follows_row_swaps() {
        let mut t = table();
        t.set_exclusive(1, 7.0);
        t.swap_rows(1, 2);
        assert_eq!(t.exclusives()[2], 7.0);
        assert_eq!(t.row(2).exclusive, 7.0);
        assert_eq!(t.exclusives()[1], t.row(1).exclusive);
    }

    #[test]
    fn test_swap_same_row_is_noop() {
        let mut t = table();
        t.swap_rows(1, 1);
        assert_eq!(t, table());
    }

    #[test]
    fn test_argmax_marginal_takes_first_maximum() {
        let t = table();
        assert_eq!(t.argmax_marginal(0), Some(1));
        assert_eq!(t.argmax_marginal(2), Some(2));
        assert_eq!(t.argmax_marginal(3), None);
        assert_eq!(t.argmax_marginal(7), None);
    }

    #[test]
    fn test_argmin_takes_first_minimum() {
        assert_eq!(argmin(&[3.0, 1.0, 1.0, 2.0]), Some(1));
        assert_eq!(argmin(&[]), None);
        assert_eq!(argmax(&[1.0, 4.0, 4.0]), Some(1));
    }

    #[test]
    fn test_tail_copies_rows_from_cursor() {
        let t = table();
        let tail = t.tail(1);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail.row(0), t.row(1));
        assert_eq!(tail.ids(), &[pid(1), pid(2)]);
        assert!(t.tail(3).is_empty());
    }
}
