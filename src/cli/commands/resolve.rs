//! `tsr resolve` command - resolve a product structure under a policy

use miette::{miette, IntoDiagnostic, Result};

use crate::cli::args::{GlobalOpts, PolicyArgs, StructureArgs};
use crate::cli::helpers::{build_spec, depth_limit, load_catalog, Target};
use crate::cli::output::{print_structure, warn_choices};
use crate::core::callbacks::{ChoiceCollector, StrictCallbacks};
use crate::core::resolver::StructureResolver;
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub structure: StructureArgs,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Keep walking past ambiguities and report them instead of failing
    #[arg(long)]
    pub lenient: bool,
}

pub fn run(args: ResolveArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let catalog = load_catalog(&args.structure.structure, global, config)?;
    let target = Target::select(&args.structure, &catalog)?;
    let mut spec = build_spec(&args.policy, &catalog, &target, config)?;
    let depth = depth_limit(args.policy.depth, config);

    let resolver = StructureResolver::new(&catalog);
    let mut collector = ChoiceCollector::new();
    let component = if args.lenient {
        resolver.resolve(
            catalog.workspace_id(),
            spec.as_mut(),
            &target.root,
            depth,
            &mut collector,
        )
    } else {
        resolver.resolve(
            catalog.workspace_id(),
            spec.as_mut(),
            &target.root,
            depth,
            &mut StrictCallbacks,
        )
    }
    .into_diagnostic()?;

    let component = component.ok_or_else(|| {
        miette!(
            "Part {} has no iteration under the {} policy",
            target.root,
            spec.kind()
        )
    })?;

    print_structure(&component, global.output)?;
    warn_choices(collector.choices());
    Ok(())
}
