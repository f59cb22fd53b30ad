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

//! Per-node consistency checks, enabled with `SolverConfig::validation`.
//!
//! Every check recomputes from scratch what the engine maintains
//! incrementally. A failed check means the search state is corrupt; the
//! process is aborted after logging the violation.

use crate::context::SearchContext;
use crate::engine::{Node, SearchProblem};
use crate::table::CandidateTable;
use hssp_hv::oracle::HypervolumeOracle;
use hssp_model::{index::PointId, point::Point};
use rustc_hash::FxHashSet;
use std::fmt;

const RELATIVE_TOLERANCE: f64 = 1e-9;

#[inline]
pub(crate) fn approx_eq(a: f64, b: f64, scale: f64) -> bool {
    (a - b).abs() <= RELATIVE_TOLERANCE * scale.abs().max(1.0)
}

#[cold]
#[inline(never)]
fn violated(node: &Node, subset: &[PointId], message: fmt::Arguments<'_>) -> ! {
    tracing::error!(
        cursor = node.cursor,
        hv = node.hv,
        ubound1 = node.ubound1,
        is_new = node.is_new,
        subset = ?subset,
        "search invariant violated: {message}"
    );
    std::process::abort()
}

pub(crate) fn check_node(
    problem: &SearchProblem<'_>,
    oracle: &dyn HypervolumeOracle,
    context: &SearchContext,
    table: &CandidateTable,
    subset: &[PointId],
    node: &Node,
) {
    let remaining = &table.ids()[node.cursor..];

    let mut seen: FxHashSet<PointId> = FxHashSet::default();
    for &id in subset.iter().chain(remaining) {
        if !seen.insert(id) {
            violated(node, subset, format_args!("{id} appears twice in the node"));
        }
    }

    if node.is_new && !context.register_signature(subset) {
        violated(node, subset, format_args!("subset explored twice"));
    }

    let mut gather: Vec<&Point> = subset.iter().map(|&id| problem.point(id)).collect();
    let hv = oracle.volume(&gather);
    if !approx_eq(node.hv, hv, hv) {
        violated(node, subset, format_args!("accepted volume {} differs from {hv}", node.hv));
    }

    if problem.maintains_exclusive {
        gather.extend(remaining.iter().map(|&id| problem.point(id)));
        let combined = oracle.volume(&gather);
        if !approx_eq(node.ubound1, combined, combined) {
            violated(
                node,
                subset,
                format_args!("combined volume {} differs from {combined}", node.ubound1),
            );
        }
        gather.truncate(subset.len());
    }

    for row in node.cursor..table.len() {
        gather.push(problem.point(table.id(row)));
        let fresh = (oracle.volume(&gather) - hv).max(0.0);
        gather.pop();
        if !approx_eq(table.marginal(row), fresh, hv + fresh) {
            violated(
                node,
                subset,
                format_args!(
                    "marginal contribution of {} is {} instead of {fresh}",
                    table.id(row),
                    table.marginal(row)
                ),
            );
        }
    }

    if let Some(&front) = table.marginals().get(node.cursor) {
        if table.marginals()[node.cursor..].iter().any(|&c| c > front) {
            violated(node, subset, format_args!("candidate at the cursor is not the best one"));
        }
    }
}
