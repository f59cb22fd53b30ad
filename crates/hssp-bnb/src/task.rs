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

//! A branch packaged for execution on another worker.

use crate::engine::Node;
use crate::table::CandidateTable;
use hssp_model::index::PointId;
use std::cmp::Ordering;

/// An owned snapshot of a node: the accepted subset and the candidate rows
/// from the node's cursor on. The dispatching worker keeps mutating its own
/// buffers for the sibling branch, so nothing here is shared.
#[derive(Debug, Clone)]
pub(crate) struct Task {
    pub(crate) table: CandidateTable,
    pub(crate) subset: Vec<PointId>,
    pub(crate) node: Node,
}

impl Task {
    /// The root of the search over `table`.
    pub(crate) fn root(table: CandidateTable, k: usize, ubound1: f64) -> Self {
        Self {
            table,
            subset: Vec::with_capacity(k),
            node: Node {
                cursor: 0,
                hv: 0.0,
                ubound1,
                is_new: false,
            },
        }
    }

    /// Copies the tail of a node so it can run independently.
    pub(crate) fn snapshot(table: &CandidateTable, subset: &[PointId], node: Node, k: usize) -> Self {
        let mut owned = Vec::with_capacity(k);
        owned.extend_from_slice(subset);
        Self {
            table: table.tail(node.cursor),
            subset: owned,
            node: Node { cursor: 0, ..node },
        }
    }

    #[inline]
    pub(crate) fn priority(&self) -> f64 {
        self.node.hv
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Task {}

impl PartialOrd for Task {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Tasks order by the volume already accepted; the queue pops the largest.
impl Ord for Task {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().total_cmp(&other.priority())
    }
}
