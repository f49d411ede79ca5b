//! Shared helper functions for CLI commands
//!
//! Loading structure files, picking the root part and configuration item,
//! and turning policy flags into a configuration spec.

use chrono::NaiveDate;
use miette::{bail, miette, Result};
use std::path::Path;

use crate::cli::args::{GlobalOpts, PolicyArgs, StructureArgs};
use crate::core::catalog::Catalog;
use crate::core::spec::{
    ConfigSpec, EffectivitySpec, LatestCheckedInSpec, LinkRetention, PolicyKind, ReleasedSpec,
};
use crate::core::Config;
use crate::entities::configuration::{ConfigurationItemKey, ProductConfiguration};
use crate::entities::part::PartIterationKey;

/// Workspace used when neither the command line, the file nor config names one
pub const DEFAULT_WORKSPACE: &str = "default";

/// Load a structure file into a catalog
///
/// The workspace comes from `--workspace`, then the file, then config.
pub fn load_catalog(path: &Path, global: &GlobalOpts, config: &Config) -> Result<Catalog> {
    let fallback = config.workspace.as_deref().unwrap_or(DEFAULT_WORKSPACE);
    Ok(Catalog::load(path, global.workspace.as_deref(), fallback)?)
}

/// Root part and configuration item a command works on
#[derive(Debug, Clone)]
pub struct Target {
    pub root: String,
    pub configuration_item: Option<ConfigurationItemKey>,
}

impl Target {
    /// `--root` wins; otherwise the product designated by `--ci`
    pub fn select(args: &StructureArgs, catalog: &Catalog) -> Result<Self> {
        let item = match &args.ci {
            Some(id) => Some(
                catalog
                    .configuration_item(id)
                    .ok_or_else(|| miette!("No configuration item '{}'", id))?,
            ),
            None => args
                .root
                .as_deref()
                .and_then(|root| catalog.configuration_item_for(root)),
        };

        let root = match (&args.root, item) {
            (Some(root), _) => root.clone(),
            (None, Some(ci)) => ci.designated_product.clone(),
            (None, None) => {
                bail!("Specify a root part with --root or a configuration item with --ci")
            }
        };

        Ok(Self {
            root,
            configuration_item: item.map(|ci| ci.key()),
        })
    }
}

/// Effective depth limit; a negative value walks everything
pub fn depth_limit(depth: Option<i64>, config: &Config) -> Option<usize> {
    match depth {
        Some(d) if d < 0 => None,
        Some(d) => Some(d as usize),
        None => config.depth_limit,
    }
}

/// Look up `--product-config` if given
pub fn product_configuration<'c>(
    name: Option<&str>,
    catalog: &'c Catalog,
) -> Result<Option<&'c ProductConfiguration>> {
    match name {
        Some(name) => catalog
            .product_configuration(name)
            .map(Some)
            .ok_or_else(|| miette!("No product configuration named '{}'", name)),
        None => Ok(None),
    }
}

/// Link retention from a product configuration plus command-line keys
pub fn link_retention(
    product_config: Option<&ProductConfiguration>,
    optional_links: &[String],
    substitute_links: &[String],
) -> LinkRetention {
    let mut optional: Vec<String> = optional_links.to_vec();
    let mut substitutes: Vec<String> = substitute_links.to_vec();
    if let Some(pc) = product_config {
        optional.extend(pc.optional_usage_links.iter().cloned());
        substitutes.extend(pc.substitute_links.iter().cloned());
    }
    LinkRetention::new(optional, substitutes)
}

/// Build the configuration spec named by the policy flags, falling back to config
pub fn build_spec(
    policy: &PolicyArgs,
    catalog: &Catalog,
    target: &Target,
    config: &Config,
) -> Result<Box<dyn ConfigSpec>> {
    let kind = policy.policy.or(config.default_policy).unwrap_or_default();
    let product_config = product_configuration(policy.product_config.as_deref(), catalog)?;
    let links = link_retention(
        product_config,
        &policy.optional_links,
        &policy.substitute_links,
    );

    match kind {
        PolicyKind::Latest => Ok(Box::new(LatestCheckedInSpec::new(links))),
        PolicyKind::Released => Ok(Box::new(ReleasedSpec::new(links))),
        PolicyKind::Date | PolicyKind::Serial | PolicyKind::Lot => {
            let ci = target
                .configuration_item
                .clone()
                .or_else(|| product_config.map(|pc| pc.configuration_item.clone()))
                .ok_or_else(|| {
                    miette!("The {} policy needs a configuration item (--ci)", kind)
                })?;
            let Some(value) = policy.at.as_deref() else {
                bail!("The {} policy needs an effectivity value (--at)", kind);
            };

            let spec = match kind {
                PolicyKind::Date => {
                    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
                        .map_err(|e| miette!("Invalid date '{}': {}", value, e))?;
                    EffectivitySpec::at_date(ci, date, product_config)
                }
                PolicyKind::Serial => EffectivitySpec::for_serial_number(ci, value, product_config),
                _ => EffectivitySpec::for_lot(ci, value, product_config),
            };
            Ok(Box::new(spec.with_links(links)))
        }
    }
}

/// Parse an explicit iteration pick: `NUMBER@VERSION.ITERATION`
pub fn parse_pick(input: &str, workspace_id: &str) -> Result<PartIterationKey> {
    let (number, revision) = input
        .rsplit_once('@')
        .ok_or_else(|| miette!("Invalid pick '{}'. Use NUMBER@VERSION.ITERATION", input))?;
    let (version, iteration) = revision
        .rsplit_once('.')
        .ok_or_else(|| miette!("Invalid pick '{}'. Use NUMBER@VERSION.ITERATION", input))?;
    let iteration: u32 = iteration
        .parse()
        .map_err(|_| miette!("Invalid iteration '{}' in pick '{}'", iteration, input))?;

    if number.is_empty() || version.is_empty() {
        bail!("Invalid pick '{}'. Use NUMBER@VERSION.ITERATION", input);
    }
    Ok(PartIterationKey::new(workspace_id, number, version, iteration))
}

/// Truncate a string to max_len, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
