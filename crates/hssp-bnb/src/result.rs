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

use crate::stats::SolverStatistics;
use hssp_model::solution::Solution;

/// How the returned subset was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveMethod {
    /// `k == 1`: the point with the largest box volume.
    SingleBest,
    /// `k == n`: every point.
    FullSet,
    /// `k == n - 1`: every point but the one with the smallest exclusive
    /// contribution.
    DropOne,
    /// The branch-and-bound search.
    BranchAndBound,
}

impl std::fmt::Display for SolveMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SolveMethod::SingleBest => "single best",
            SolveMethod::FullSet => "full set",
            SolveMethod::DropOne => "drop one",
            SolveMethod::BranchAndBound => "branch and bound",
        };
        write!(f, "{name}")
    }
}

/// Result of the solver after termination. The solution is optimal.
#[derive(Debug, Clone)]
pub struct SolverOutcome {
    solution: Solution,
    method: SolveMethod,
    statistics: SolverStatistics,
}

impl SolverOutcome {
    #[inline]
    pub fn new(solution: Solution, method: SolveMethod, statistics: SolverStatistics) -> Self {
        Self {
            solution,
            method,
            statistics,
        }
    }

    #[inline]
    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    #[inline]
    pub fn into_solution(self) -> Solution {
        self.solution
    }

    #[inline]
    pub fn hypervolume(&self) -> f64 {
        self.solution.hypervolume()
    }

    #[inline]
    pub fn method(&self) -> SolveMethod {
        self.method
    }

    #[inline]
    pub fn statistics(&self) -> &SolverStatistics {
        &self.statistics
    }
}

impl std::fmt::Display for SolverOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SolverOutcome({}, method: {})", self.solution, self.method)
    }
}
