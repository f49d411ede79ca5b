//! Command-line argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::baseline::BaselineCommands;
use crate::cli::commands::bom::BomArgs;
use crate::cli::commands::choices::ChoicesArgs;
use crate::cli::commands::completions::CompletionsArgs;
use crate::cli::commands::resolve::ResolveArgs;
use crate::cli::commands::validate::ValidateArgs;
use crate::core::spec::PolicyKind;
use crate::core::Config;

#[derive(Parser, Debug)]
#[command(name = "tsr")]
#[command(author, version, about = "Resolve product structures and capture baselines")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Output format
    #[arg(id = "format", long = "format", short = 'f', global = true, value_enum, default_value_t)]
    pub output: OutputFormat,

    /// Log resolution details to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Workspace to resolve in (overrides the structure file)
    #[arg(long, short = 'w', global = true, env = "TSR_WORKSPACE")]
    pub workspace: Option<String>,
}

impl GlobalOpts {
    /// Take the output format from config when `--format` was left at auto
    pub fn apply_config(&mut self, config: &Config) {
        if self.output != OutputFormat::Auto {
            return;
        }
        if let Some(name) = config.output.as_deref() {
            match OutputFormat::from_str(name, true) {
                Ok(format) => self.output = format,
                Err(_) => {
                    tracing::warn!(output = name, "ignoring unknown output format in config")
                }
            }
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a product structure under a configuration policy
    Resolve(ResolveArgs),

    /// List the decisions a structure leaves open
    Choices(ChoicesArgs),

    /// Create and replay product baselines
    #[command(subcommand)]
    Baseline(BaselineCommands),

    /// Flattened bill of materials with rolled-up quantities
    Bom(BomArgs),

    /// Check a structure file for inconsistent revisions
    Validate(ValidateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tree for structures, TSV for lists
    #[default]
    Auto,
    Tree,
    Yaml,
    Json,
    Tsv,
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Auto => write!(f, "auto"),
            OutputFormat::Tree => write!(f, "tree"),
            OutputFormat::Yaml => write!(f, "yaml"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Tsv => write!(f, "tsv"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}

/// The structure file and the part to start from
#[derive(clap::Args, Debug, Clone)]
pub struct StructureArgs {
    /// YAML structure file
    pub structure: PathBuf,

    /// Root part number (defaults to the configuration item's product)
    #[arg(long, short = 'r')]
    pub root: Option<String>,

    /// Configuration item id
    #[arg(long)]
    pub ci: Option<String>,
}

/// Policy selection for commands that resolve a structure
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PolicyArgs {
    /// Configuration policy: latest, released, date, serial or lot
    #[arg(long, short = 'p')]
    pub policy: Option<PolicyKind>,

    /// Effectivity value: a date (YYYY-MM-DD), serial number or lot
    #[arg(long)]
    pub at: Option<String>,

    /// Product configuration declaring retained optional and substitute links
    #[arg(long)]
    pub product_config: Option<String>,

    /// Retain an optional link by path key (repeatable)
    #[arg(long = "optional", value_name = "KEY")]
    pub optional_links: Vec<String>,

    /// Use a substitute link by path key (repeatable)
    #[arg(long = "substitute", value_name = "KEY")]
    pub substitute_links: Vec<String>,

    /// Levels below the root to walk; -1 walks everything
    #[arg(long, short = 'd', allow_hyphen_values = true)]
    pub depth: Option<i64>,
}
