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

//! Decides whether a branch runs in place or is handed to another worker.

use crate::context::SearchContext;
use crate::engine::Node;
use crate::table::CandidateTable;
use crate::task::Task;
use hssp_model::index::PointId;

/// A branch about to be explored, borrowed from the engine's buffers.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PendingBranch<'b> {
    pub(crate) table: &'b CandidateTable,
    pub(crate) subset: &'b [PointId],
    pub(crate) node: Node,
    pub(crate) k: usize,
}

impl PendingBranch<'_> {
    #[inline]
    pub(crate) fn to_task(&self) -> Task {
        Task::snapshot(self.table, self.subset, self.node, self.k)
    }
}

pub(crate) trait BranchDispatcher: Sync {
    /// Takes ownership of a copy of `branch` if it should run elsewhere.
    /// Returns `false` when the caller has to explore it in place.
    fn offer(&self, context: &SearchContext, branch: &PendingBranch<'_>) -> bool;
}

/// Explores every branch on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct InlineDispatcher;

impl BranchDispatcher for InlineDispatcher {
    #[inline]
    fn offer(&self, _context: &SearchContext, _branch: &PendingBranch<'_>) -> bool {
        false
    }
}
