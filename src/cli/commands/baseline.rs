//! `tsr baseline` command - create and replay product baselines

use clap::Subcommand;
use console::style;
use miette::{bail, miette, IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::args::{GlobalOpts, OutputFormat, StructureArgs};
use crate::cli::helpers::{
    depth_limit, link_retention, load_catalog, parse_pick, product_configuration, Target,
};
use crate::cli::output::print_structure;
use crate::core::baseline::BaselineAssembler;
use crate::core::callbacks::StrictCallbacks;
use crate::core::resolver::StructureResolver;
use crate::core::spec::{BaselineCreationSpec, ConfigSpec, ResolvedCollectionSpec};
use crate::core::Config;
use crate::entities::baseline::{BaselineType, ProductBaseline};
use crate::yaml::parse_yaml_file;

#[derive(Subcommand, Debug)]
pub enum BaselineCommands {
    /// Resolve a structure and freeze it into a baseline
    Create(CreateArgs),

    /// Resolve a structure exactly as a baseline froze it
    Replay(ReplayArgs),
}

#[derive(clap::Args, Debug)]
pub struct CreateArgs {
    #[command(flatten)]
    pub structure: StructureArgs,

    /// Baseline name
    #[arg(long, short = 'n')]
    pub name: String,

    /// Policy for parts not picked explicitly: released or latest
    #[arg(long = "type", short = 't', default_value = "released")]
    pub baseline_type: BaselineType,

    /// Description stored with the baseline
    #[arg(long)]
    pub description: Option<String>,

    /// Explicit iteration as NUMBER@VERSION.ITERATION (repeatable)
    #[arg(long = "pick", value_name = "PICK")]
    pub picks: Vec<String>,

    /// Retain an optional link by path key (repeatable)
    #[arg(long = "optional", value_name = "KEY")]
    pub optional_links: Vec<String>,

    /// Use a substitute link by path key (repeatable)
    #[arg(long = "substitute", value_name = "KEY")]
    pub substitute_links: Vec<String>,

    /// Product configuration declaring retained optional and substitute links
    #[arg(long)]
    pub product_config: Option<String>,

    /// Write the baseline to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ReplayArgs {
    /// YAML structure file
    pub structure: PathBuf,

    /// Baseline file written by `tsr baseline create`
    #[arg(long, short = 'b')]
    pub baseline: PathBuf,

    /// Root part number (defaults to the baseline's configuration item product)
    #[arg(long, short = 'r')]
    pub root: Option<String>,

    /// Fail unless the replay retains exactly what the baseline froze
    #[arg(long)]
    pub verify: bool,

    /// Levels below the root to walk; -1 walks everything
    #[arg(long, short = 'd', allow_hyphen_values = true)]
    pub depth: Option<i64>,
}

pub fn run(cmd: BaselineCommands, global: &GlobalOpts, config: &Config) -> Result<()> {
    match cmd {
        BaselineCommands::Create(args) => run_create(args, global, config),
        BaselineCommands::Replay(args) => run_replay(args, global, config),
    }
}

fn run_create(args: CreateArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let catalog = load_catalog(&args.structure.structure, global, config)?;
    let target = Target::select(&args.structure, &catalog)?;

    let picks = args
        .picks
        .iter()
        .map(|pick| parse_pick(pick, catalog.workspace_id()))
        .collect::<Result<Vec<_>>>()?;
    let product_config = product_configuration(args.product_config.as_deref(), &catalog)?;
    let links = link_retention(product_config, &args.optional_links, &args.substitute_links);
    let mut spec = BaselineCreationSpec::new(args.baseline_type, picks, links);

    let resolved = StructureResolver::new(&catalog)
        .resolve(
            catalog.workspace_id(),
            &mut spec,
            &target.root,
            None,
            &mut StrictCallbacks,
        )
        .into_diagnostic()?;
    if resolved.is_none() {
        bail!(
            "Part {} has no {} iteration to baseline",
            target.root,
            args.baseline_type
        );
    }

    let configuration_item = target
        .configuration_item
        .clone()
        .or_else(|| product_config.map(|pc| pc.configuration_item.clone()));
    let baseline = BaselineAssembler::new(&catalog, &catalog)
        .assemble(
            args.name,
            args.baseline_type,
            args.description,
            configuration_item,
            spec.retained(),
        )
        .into_diagnostic()?;

    let content = match global.output {
        OutputFormat::Json => serde_json::to_string_pretty(&baseline).into_diagnostic()?,
        _ => serde_yml::to_string(&baseline).into_diagnostic()?,
    };

    match args.output {
        Some(path) => {
            fs::write(&path, content).into_diagnostic()?;
            println!(
                "{} Created baseline {} ({}) with {} part(s) in {}",
                style("✓").green(),
                style(&baseline.name).cyan(),
                baseline.collection_id,
                baseline.snapshot.parts.len(),
                style(path.display()).yellow()
            );
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn run_replay(args: ReplayArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let catalog = load_catalog(&args.structure, global, config)?;
    let baseline: ProductBaseline = parse_yaml_file(&args.baseline)?;

    let root = match (&args.root, &baseline.configuration_item) {
        (Some(root), _) => root.clone(),
        (None, Some(ci)) => catalog
            .configuration_item(&ci.id)
            .map(|item| item.designated_product.clone())
            .ok_or_else(|| miette!("No configuration item '{}' in the structure", ci.id))?,
        (None, None) => {
            bail!("Baseline {} has no configuration item; pass --root", baseline.name)
        }
    };

    let mut spec = ResolvedCollectionSpec::from_baseline(&baseline);
    let component = StructureResolver::new(&catalog)
        .resolve(
            catalog.workspace_id(),
            &mut spec,
            &root,
            depth_limit(args.depth, config),
            &mut StrictCallbacks,
        )
        .into_diagnostic()?
        .ok_or_else(|| miette!("Part {} is not part of baseline {}", root, baseline.name))?;

    if args.verify {
        let snapshot = BaselineAssembler::new(&catalog, &catalog)
            .snapshot(spec.retained())
            .into_diagnostic()?;
        if snapshot.parts != baseline.snapshot.parts
            || snapshot.substitute_links != baseline.snapshot.substitute_links
            || snapshot.optional_usage_links != baseline.snapshot.optional_usage_links
        {
            bail!(
                "Replay of baseline {} does not reproduce its collection {}",
                baseline.name,
                spec.collection_id()
            );
        }
    }

    print_structure(&component, global.output)?;

    if args.verify {
        eprintln!(
            "{} Replay reproduces baseline {} ({} part(s))",
            style("✓").green(),
            style(&baseline.name).cyan(),
            baseline.snapshot.parts.len()
        );
    }
    Ok(())
}
