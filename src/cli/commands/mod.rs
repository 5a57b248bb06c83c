//! Command implementations

pub mod completions;
pub mod materials;
pub mod report;
pub mod weights;

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::diagnostics::Diagnostics;
use crate::core::model::TakeoffModel;
use crate::ingest::{run_pipeline, Estimate};

/// The two exports every command reads
#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// Takeoff Geometry Detail export (CSV)
    pub geometry: PathBuf,

    /// Item Cost by Type export (CSV)
    pub cost: PathBuf,

    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// JSON dump of a finished run
#[derive(Serialize)]
pub(crate) struct ModelDump<'a> {
    pub model: &'a TakeoffModel,
    pub diagnostics: &'a Diagnostics,
}

/// Load config and run both ingestion passes plus multing
pub(crate) fn load_estimate(input: &InputArgs, global: &GlobalOpts) -> Result<(Estimate, Config)> {
    let config = Config::load_with(global.config.as_deref()).map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        eprintln!(
            "{} Reading {} and {}",
            style("→").blue(),
            input.geometry.display(),
            input.cost.display()
        );
    }

    let estimate = run_pipeline(&input.geometry, &input.cost, &config)?;

    if global.verbose {
        let g = &estimate.geometry;
        eprintln!(
            "{} Geometry: {} lines, {} takeoffs, {} repeated keys, {} stubs, {} lengths",
            style("→").blue(),
            g.lines_read,
            g.takeoffs_created,
            g.duplicates,
            g.stubs,
            g.lengths
        );
        let c = &estimate.cost;
        eprintln!(
            "{} Cost: {} rows, {} matched, {} cost-only",
            style("→").blue(),
            c.rows_read,
            c.matched,
            c.cost_only
        );
        eprintln!(
            "{} {} materials, {:.1} lb drop",
            style("→").blue(),
            estimate.model.materials().len(),
            estimate.model.total_drop_weight()
        );
    }

    Ok((estimate, config))
}

/// Notices to stderr, for commands whose stdout is pure data
pub(crate) fn print_diagnostics(diagnostics: &Diagnostics, global: &GlobalOpts) {
    if global.quiet {
        return;
    }
    for notice in diagnostics {
        eprintln!("{} {}", style("!").yellow(), notice);
    }
}

pub(crate) fn write_output(content: &str, output_path: Option<PathBuf>) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(&path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            eprintln!("{} Written to {}", style("✓").green(), path.display());
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
