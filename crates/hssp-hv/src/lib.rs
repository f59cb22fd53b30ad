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

//! # HSSP Hypervolume
//!
//! Volume computations consumed by the subset selection search.
//!
//! ## Modules
//!
//! - `oracle`: the [`oracle::HypervolumeOracle`] contract (set volume and
//!   exclusive contributions) and the [`oracle::ContributionTracker`] contract
//!   for incremental per-point contributions.
//! - `slicing`: [`slicing::SlicingOracle`], an exact dimension-sweep oracle
//!   for any dimensionality.
//! - `tracker`: [`tracker::SetTracker`], the incremental tracker handed out by
//!   the slicing oracle for 3- and 4-dimensional instances.
//!
//! All volumes are measured against the origin: a normalized point `p`
//! dominates the box `[0, p]`.

pub mod oracle;
pub mod slicing;
pub mod tracker;
