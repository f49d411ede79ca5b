//! `tsr validate` command - check a structure file for inconsistent revisions

use console::style;
use miette::{bail, Result};
use std::path::PathBuf;

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::load_catalog;
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Structure files to validate
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Show summary only, don't show individual problems
    #[arg(long)]
    pub summary: bool,
}

/// Validation statistics
#[derive(Default)]
struct ValidationStats {
    files_checked: usize,
    files_failed: usize,
    total_problems: usize,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let mut stats = ValidationStats::default();

    for path in &args.paths {
        stats.files_checked += 1;

        // Parse errors abort: they carry their own source diagnostics
        let catalog = load_catalog(path, global, config)?;
        let problems = catalog.validate();

        if problems.is_empty() {
            if !args.summary {
                println!(
                    "{} {} ({} part(s))",
                    style("✓").green(),
                    path.display(),
                    catalog.part_count()
                );
            }
            continue;
        }

        stats.files_failed += 1;
        stats.total_problems += problems.len();
        if !args.summary {
            println!("{} {}", style("✗").red(), path.display());
            for problem in &problems {
                println!("    {}", problem);
            }
        }
    }

    println!();
    println!(
        "{} {} file(s) checked, {} with problems, {} problem(s)",
        style("Summary").bold(),
        stats.files_checked,
        stats.files_failed,
        stats.total_problems
    );

    if stats.files_failed > 0 {
        bail!("Validation failed for {} file(s)", stats.files_failed);
    }
    Ok(())
}
