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

use clap::{Parser, ValueEnum};
use hssp_bnb::config::{BoundChain, BoundKind};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    name = "hssp",
    author,
    version,
    about = "Exact hypervolume subset selection by parallel branch and bound.",
    long_about = "Reads one point per line (whitespace separated coordinates, '#' comments) and \
                  prints the largest hypervolume of a k-point subset on the first line and the \
                  0/1 membership of every input point on the second.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    /// Instance file with one point per line.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Number of points to select. Defaults to half of the input.
    #[arg(short = 'k', long, value_name = "K")]
    pub subset_size: Option<usize>,

    /// Reference point. Defaults to the origin.
    #[arg(short, long, value_name = "R", num_args = 1.., allow_negative_numbers = true)]
    pub reference: Option<Vec<f64>>,

    /// Objectives are maximized instead of minimized.
    #[arg(short = 'a', long)]
    pub maximize: bool,

    /// Number of worker threads.
    #[arg(short = 'j', long, value_name = "N", default_value_t = 1)]
    pub workers: usize,

    /// Increase verbosity (-v logs search events, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log a progress ping at growing intervals (shown from -v on).
    #[arg(long)]
    pub ping: bool,

    /// Check the search invariants at every node (slow).
    #[arg(long, visible_alias = "devmode")]
    pub validate: bool,

    /// Pruning bounds in evaluation order.
    #[arg(long, value_enum, value_delimiter = ',', value_name = "BOUND")]
    pub bounds: Option<Vec<BoundArg>>,

    /// Print the normalized points and exit.
    #[arg(long)]
    pub points: bool,

    /// Print solver statistics to stderr.
    #[arg(long)]
    pub stats: bool,

    /// Write logs to a file in addition to stderr.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn bound_chain(&self) -> BoundChain {
        match &self.bounds {
            Some(bounds) => BoundChain::new(bounds.iter().map(|&b| BoundKind::from(b))),
            None => BoundChain::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BoundArg {
    MarginalSum,
    ExclusiveDrop,
    GreedyApproximation,
    SubsetSumDrop,
}

impl From<BoundArg> for BoundKind {
    fn from(value: BoundArg) -> Self {
        match value {
            BoundArg::MarginalSum => BoundKind::MarginalSum,
            BoundArg::ExclusiveDrop => BoundKind::ExclusiveDrop,
            BoundArg::GreedyApproximation => BoundKind::GreedyApproximation,
            BoundArg::SubsetSumDrop => BoundKind::SubsetSumDrop,
        }
    }
}
