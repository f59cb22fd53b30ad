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

//! HSSP-BnB: exact hypervolume subset selection
//!
//! Finds a subset of exactly `k` points with the largest hypervolume by an
//! include/exclude branch-and-bound over the candidate points, optionally on
//! a pool of worker threads sharing one incumbent.
//!
//! Core flow
//! - Load or build a `hssp_model::point::PointSet`.
//! - Configure a `solver::HsspSolver` through `solver::SolverBuilder`.
//! - Call `solve(&points, k)` and read the `result::SolverOutcome`.
//!
//! Design highlights
//! - Best-first branching: the candidate with the largest marginal
//!   contribution is always decided next.
//! - Bounds run as an ordered chain (`config::BoundChain`); each one either
//!   proves a node cannot beat the incumbent or lets the next one try.
//! - Contributions are maintained incrementally through the oracle's
//!   `ContributionTracker` where one is available.
//! - Work sharing: a branch is handed to another worker only while some
//!   worker is idle; otherwise it is explored in place.
//!
//! Module map
//! - `solver`: entry point and builder.
//! - `config`: solver configuration and bound selection.
//! - `context`: state shared by all workers of one solve call.
//! - `incumbent`: the lock-free readable best solution.
//! - `table`: per-branch candidate rows with contribution columns.
//! - `subset_sum`: enumeration of the largest `m`-element subset sums.
//! - `result`, `stats`: solver outcome and counters.

mod bootstrap;
mod bound;
pub mod config;
pub mod context;
mod dispatch;
mod engine;
pub mod incumbent;
mod progress;
pub mod result;
mod scheduler;
pub mod solver;
pub mod stats;
pub mod subset_sum;
pub mod table;
mod task;
mod validation;

pub use progress::SearchEvent;
