//! `tsr choices` command - list the decisions a structure leaves open

use console::style;
use miette::{bail, IntoDiagnostic, Result};

use crate::cli::args::{GlobalOpts, OutputFormat, StructureArgs};
use crate::cli::helpers::{depth_limit, load_catalog, Target};
use crate::cli::output::print_choices;
use crate::core::callbacks::ChoiceCollector;
use crate::core::resolver::StructureResolver;
use crate::core::spec::{ConfigSpec, LatestCheckedInSpec, PolicyKind, ReleasedSpec};
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct ChoicesArgs {
    #[command(flatten)]
    pub structure: StructureArgs,

    /// Policy whose eligible iterations are offered: latest or released
    #[arg(long, short = 'p')]
    pub policy: Option<PolicyKind>,

    /// Levels below the root to walk; -1 walks everything
    #[arg(long, short = 'd', allow_hyphen_values = true)]
    pub depth: Option<i64>,
}

pub fn run(args: ChoicesArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let catalog = load_catalog(&args.structure.structure, global, config)?;
    let target = Target::select(&args.structure, &catalog)?;

    let policy = args.policy.or(config.default_policy).unwrap_or_default();
    let mut spec: Box<dyn ConfigSpec> = match policy {
        PolicyKind::Latest => Box::new(LatestCheckedInSpec::diverging()),
        PolicyKind::Released => Box::new(ReleasedSpec::diverging()),
        other => bail!(
            "Choices can only be listed for the latest or released policy, not {}",
            other
        ),
    };

    let mut collector = ChoiceCollector::new();
    StructureResolver::new(&catalog)
        .resolve(
            catalog.workspace_id(),
            spec.as_mut(),
            &target.root,
            depth_limit(args.depth, config),
            &mut collector,
        )
        .into_diagnostic()?;

    let choices = collector.into_choices();
    if choices.is_empty() && matches!(global.output, OutputFormat::Auto | OutputFormat::Tree) {
        println!(
            "{} No open decisions below {}",
            style("✓").green(),
            style(&target.root).cyan()
        );
        return Ok(());
    }
    print_choices(&choices, global.output)
}
