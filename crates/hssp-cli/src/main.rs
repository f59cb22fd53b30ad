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

mod cli;
mod error;
mod logging;
mod output;

use crate::cli::Cli;
use crate::error::{CliError, Result};
use clap::Parser;
use hssp_bnb::solver::SolverBuilder;
use hssp_model::loading::PointSetLoader;
use std::io::Write;
use tracing::{debug, error, info};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref()) {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }

    let stdout = std::io::stdout();
    if let Err(e) = run(&cli, &mut stdout.lock()) {
        error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    debug!("Full CLI arguments parsed: {:?}", cli);

    let mut loader = PointSetLoader::new().with_maximize(cli.maximize);
    if let Some(reference) = &cli.reference {
        loader = loader.with_reference(reference.clone());
    }
    let points = loader.from_path(&cli.file).map_err(|source| CliError::Load {
        path: cli.file.clone(),
        source,
    })?;
    info!(
        points = points.len(),
        dimensions = points.dimensions(),
        "loaded {}",
        cli.file.display()
    );

    if cli.points {
        output::write_points(out, &points)?;
        return Ok(());
    }

    let k = cli.subset_size.unwrap_or_else(|| (points.len() / 2).max(1));
    let solver = SolverBuilder::new()
        .workers(cli.workers)
        .validation(cli.validate)
        .progress(cli.ping)
        .verbose(cli.verbose > 0)
        .bounds(cli.bound_chain())
        .build();

    let outcome = solver.solve(&points, k)?;
    info!(
        hypervolume = outcome.hypervolume(),
        method = %outcome.method(),
        "solved"
    );

    output::write_solution(out, outcome.solution(), points.len())?;
    if cli.stats {
        eprint!("{}", outcome.statistics());
    }
    Ok(())
}
