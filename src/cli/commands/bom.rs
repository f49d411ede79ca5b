//! `tsr bom` command - flattened bill of materials

use console::style;
use miette::{miette, IntoDiagnostic, Result};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::args::{GlobalOpts, OutputFormat, PolicyArgs, StructureArgs};
use crate::cli::helpers::{build_spec, depth_limit, load_catalog, truncate_str, Target};
use crate::cli::output::{effective_format, format_amount, print_serialized};
use crate::core::callbacks::StrictCallbacks;
use crate::core::lookup::PartMasterLookup;
use crate::core::resolver::StructureResolver;
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct BomArgs {
    #[command(flatten)]
    pub structure: StructureArgs,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

/// One line of the flattened BOM
#[derive(Debug, Serialize)]
pub struct BomLine {
    pub part: String,
    pub name: String,
    pub quantity: f64,
}

#[derive(Tabled)]
struct BomRow {
    #[tabled(rename = "PART")]
    part: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "QTY")]
    quantity: String,
}

pub fn run(args: BomArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let catalog = load_catalog(&args.structure.structure, global, config)?;
    let target = Target::select(&args.structure, &catalog)?;
    let mut spec = build_spec(&args.policy, &catalog, &target, config)?;

    let root = StructureResolver::new(&catalog)
        .resolve(
            catalog.workspace_id(),
            spec.as_mut(),
            &target.root,
            depth_limit(args.policy.depth, config),
            &mut StrictCallbacks,
        )
        .into_diagnostic()?
        .ok_or_else(|| {
            miette!(
                "Part {} has no iteration under the {} policy",
                target.root,
                spec.kind()
            )
        })?;

    let lines: Vec<BomLine> = root
        .flatten()
        .into_iter()
        .map(|(part, quantity)| {
            let name = catalog
                .part_master(catalog.workspace_id(), &part)
                .ok()
                .and_then(|m| m.name.clone())
                .unwrap_or_default();
            BomLine {
                part,
                name,
                quantity,
            }
        })
        .collect();

    match effective_format(global.output, true) {
        OutputFormat::Tree => {
            println!(
                "{} BOM for {} ({} policy)",
                style("Flattened").bold(),
                style(&target.root).yellow(),
                spec.kind()
            );
            for line in &lines {
                println!(
                    "  {:>8}  {:<20} {}",
                    format_amount(line.quantity),
                    style(&line.part).cyan(),
                    style(truncate_str(&line.name, 40)).dim()
                );
            }
        }
        OutputFormat::Tsv | OutputFormat::Auto => {
            println!("part\tname\tquantity");
            for line in &lines {
                println!("{}\t{}\t{}", line.part, line.name, format_amount(line.quantity));
            }
        }
        OutputFormat::Table => {
            let rows: Vec<BomRow> = lines
                .iter()
                .map(|line| BomRow {
                    part: line.part.clone(),
                    name: line.name.clone(),
                    quantity: format_amount(line.quantity),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::sharp()));
        }
        other => print_serialized(&lines, other)?,
    }
    Ok(())
}
