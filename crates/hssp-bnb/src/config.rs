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

//! Solver configuration.
//!
//! The pruning chain is an ordered list of [`BoundKind`]s evaluated cheapest
//! first. The default chain is `[MarginalSum, ExclusiveDrop]`; the greedy and
//! subset-sum bounds are valid but usually too expensive to pay off.

/// The pruning bounds available to the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BoundKind {
    /// Accepted volume plus the largest marginal contributions of the
    /// candidates still missing.
    MarginalSum,
    /// Volume of the accepted subset plus every remaining candidate, minus the
    /// smallest exclusive contributions of the candidates that must be dropped.
    ExclusiveDrop,
    /// Greedy completion divided by the `1 - 1/e` approximation ratio.
    GreedyApproximation,
    /// Walks completions in descending marginal-sum order and evaluates them
    /// exactly until the branch is decided.
    SubsetSumDrop,
}

impl BoundKind {
    pub const COUNT: usize = 4;

    pub const ALL: [BoundKind; Self::COUNT] = [
        BoundKind::MarginalSum,
        BoundKind::ExclusiveDrop,
        BoundKind::GreedyApproximation,
        BoundKind::SubsetSumDrop,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            BoundKind::MarginalSum => 0,
            BoundKind::ExclusiveDrop => 1,
            BoundKind::GreedyApproximation => 2,
            BoundKind::SubsetSumDrop => 3,
        }
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            BoundKind::MarginalSum => "marginal-sum",
            BoundKind::ExclusiveDrop => "exclusive-drop",
            BoundKind::GreedyApproximation => "greedy-approximation",
            BoundKind::SubsetSumDrop => "subset-sum-drop",
        }
    }
}

impl std::fmt::Display for BoundKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered, duplicate-free sequence of bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundChain {
    kinds: Vec<BoundKind>,
}

impl Default for BoundChain {
    fn default() -> Self {
        Self {
            kinds: vec![BoundKind::MarginalSum, BoundKind::ExclusiveDrop],
        }
    }
}

impl BoundChain {
    /// Builds a chain evaluated in the given order. Repeated kinds are kept
    /// only at their first position.
    pub fn new<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = BoundKind>,
    {
        let mut chain: Vec<BoundKind> = Vec::with_capacity(BoundKind::COUNT);
        for kind in kinds {
            if !chain.contains(&kind) {
                chain.push(kind);
            }
        }
        Self { kinds: chain }
    }

    /// A chain that never prunes. Only useful for testing.
    #[inline]
    pub fn empty() -> Self {
        Self { kinds: Vec::new() }
    }

    #[inline]
    pub fn kinds(&self) -> &[BoundKind] {
        &self.kinds
    }

    #[inline]
    pub fn contains(&self, kind: BoundKind) -> bool {
        self.kinds.contains(&kind)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl std::fmt::Display for BoundChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, kind) in self.kinds.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", kind)?;
        }
        write!(f, "]")
    }
}

/// Settings of a single solve call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    /// Number of worker threads; `1` searches on the calling thread.
    pub workers: usize,
    /// Runs the debug invariant checks at every node. Violations abort.
    pub validation: bool,
    /// Emits periodic progress pings with a doubling interval.
    pub progress: bool,
    /// Logs search events at `info` instead of `debug`.
    pub verbose: bool,
    /// The pruning chain.
    pub bounds: BoundChain,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            validation: false,
            progress: false,
            verbose: false,
            bounds: BoundChain::default(),
        }
    }
}

impl std::fmt::Display for SolverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolverConfig(workers: {}, validation: {}, progress: {}, verbose: {}, bounds: {})",
            self.workers, self.validation, self.progress, self.verbose, self.bounds
        )
    }
}
