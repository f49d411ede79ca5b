use clap::Parser;
use miette::{IntoDiagnostic, Result};
use tsr::cli::{Cli, Commands};
use tsr::core::{init_tracing, Config};

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let mut cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let config = Config::load().into_diagnostic()?;
    cli.global.apply_config(&config);
    let global = &cli.global;

    match cli.command {
        Commands::Resolve(args) => tsr::cli::commands::resolve::run(args, global, &config),
        Commands::Choices(args) => tsr::cli::commands::choices::run(args, global, &config),
        Commands::Baseline(cmd) => tsr::cli::commands::baseline::run(cmd, global, &config),
        Commands::Bom(args) => tsr::cli::commands::bom::run(args, global, &config),
        Commands::Validate(args) => tsr::cli::commands::validate::run(args, global, &config),
        Commands::Completions(args) => tsr::cli::commands::completions::run(args),
    }
}
