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

//! Cheap bound: the accepted volume plus the `missing` largest current
//! marginal contributions among the remaining candidates. Marginal
//! contributions only shrink as the subset grows, so summing them ignores
//! overlap between the picked candidates and over-estimates every completion.

use super::{BoundInput, BoundOutcome, BoundProvider, sum_of_largest};
use crate::config::BoundKind;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MarginalSumBound;

impl BoundProvider for MarginalSumBound {
    #[inline]
    fn kind(&self) -> BoundKind {
        BoundKind::MarginalSum
    }

    fn evaluate(&self, input: &mut BoundInput<'_, '_>) -> BoundOutcome {
        let missing = input.missing();
        let values = &mut input.scratch.values;
        values.clear();
        values.extend_from_slice(&input.table.marginals()[input.cursor..]);
        BoundOutcome::Value(input.hv + sum_of_largest(values, missing))
    }
}
