//! Configuration specs - pluggable policies choosing iterations and links
//!
//! A spec answers two questions while a structure is walked: which iteration
//! of a part to use, and which alternative of a BOM position to follow. Every
//! spec instance owns the sets of what it retained so far, which a baseline
//! is later assembled from.

pub mod baseline;
pub mod collection;
pub mod effectivity;
pub mod latest;
pub mod released;

pub use baseline::BaselineCreationSpec;
pub use collection::ResolvedCollectionSpec;
pub use effectivity::EffectivitySpec;
pub use latest::LatestCheckedInSpec;
pub use released::ReleasedSpec;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::path::{alternative_keys, LinkChoice, PathStep};
use crate::entities::configuration::ProductConfiguration;
use crate::entities::part::{IterationRef, PartIterationKey, PartMaster};

/// Named policy families selectable from config and the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    #[default]
    Latest,
    Released,
    Date,
    Serial,
    Lot,
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyKind::Latest => write!(f, "latest"),
            PolicyKind::Released => write!(f, "released"),
            PolicyKind::Date => write!(f, "date"),
            PolicyKind::Serial => write!(f, "serial"),
            PolicyKind::Lot => write!(f, "lot"),
        }
    }
}

impl std::str::FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "latest" => Ok(PolicyKind::Latest),
            "released" => Ok(PolicyKind::Released),
            "date" => Ok(PolicyKind::Date),
            "serial" | "serial-number" => Ok(PolicyKind::Serial),
            "lot" => Ok(PolicyKind::Lot),
            _ => Err(format!("Invalid policy: {}", s)),
        }
    }
}

impl PolicyKind {
    /// Whether the policy is driven by an effectivity context
    pub fn is_effectivity(&self) -> bool {
        matches!(self, PolicyKind::Date | PolicyKind::Serial | PolicyKind::Lot)
    }
}

/// Outcome of choosing an iteration for a part
#[derive(Debug, Clone)]
pub enum IterationSelection<'m> {
    Resolved(IterationRef<'m>),
    /// Several equally valid candidates, in revision order
    Indeterminate(Vec<IterationRef<'m>>),
    Unresolved,
}

impl<'m> IterationSelection<'m> {
    /// Collapse a candidate list: none, one, or several
    pub fn from_candidates(mut candidates: Vec<IterationRef<'m>>) -> Self {
        match candidates.len() {
            0 => IterationSelection::Unresolved,
            1 => IterationSelection::Resolved(candidates.remove(0)),
            _ => IterationSelection::Indeterminate(candidates),
        }
    }
}

impl<'m> From<Option<IterationRef<'m>>> for IterationSelection<'m> {
    fn from(value: Option<IterationRef<'m>>) -> Self {
        match value {
            Some(found) => IterationSelection::Resolved(found),
            None => IterationSelection::Unresolved,
        }
    }
}

/// Outcome of choosing the link followed at a BOM position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkSelection {
    Selected(LinkChoice),
    /// Nothing is followed; not an error for optional positions
    Pruned,
    /// Several alternatives are valid, in declared order
    Candidates(Vec<LinkChoice>),
}

/// What a spec retained while a structure was walked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetainedSets {
    pub part_iterations: BTreeSet<PartIterationKey>,
    pub substitute_links: BTreeSet<String>,
    pub optional_usage_links: BTreeSet<String>,
}

impl RetainedSets {
    pub fn retain_iteration(&mut self, key: PartIterationKey) {
        self.part_iterations.insert(key);
    }

    /// Record the iteration of a resolved selection
    pub fn retain_selection(&mut self, selection: &IterationSelection<'_>) {
        if let IterationSelection::Resolved(found) = selection {
            self.retain_iteration(found.key());
        }
    }
}

/// A configuration policy
pub trait ConfigSpec {
    /// Short policy name for logs and output
    fn kind(&self) -> &'static str;

    /// Choose the iteration of `master` to use
    fn filter_part_iteration<'m>(&mut self, master: &'m PartMaster) -> IterationSelection<'m>;

    /// Choose the alternative followed at the last position of `path`
    ///
    /// Earlier steps of `path` carry the alternatives already followed.
    fn filter_part_link(&mut self, path: &[PathStep]) -> LinkSelection;

    fn retained(&self) -> &RetainedSets;

    fn retained_mut(&mut self) -> &mut RetainedSets;
}

/// Declared optional positions and substitutes, as path keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkRetention {
    optional_usage_links: BTreeSet<String>,
    substitute_links: BTreeSet<String>,
}

impl LinkRetention {
    pub fn new(
        optional_usage_links: impl IntoIterator<Item = String>,
        substitute_links: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            optional_usage_links: optional_usage_links.into_iter().collect(),
            substitute_links: substitute_links.into_iter().collect(),
        }
    }

    pub fn from_product_configuration(config: &ProductConfiguration) -> Self {
        Self {
            optional_usage_links: config.optional_usage_links.clone(),
            substitute_links: config.substitute_links.clone(),
        }
    }

    /// Choose the alternative at the last position of `path`
    ///
    /// An optional position missing from the optional set is pruned.
    /// Otherwise the first substitute whose key is declared wins, falling
    /// back to the nominal link.
    pub fn select(&self, path: &[PathStep], retained: &mut RetainedSets) -> LinkSelection {
        let Some(last) = path.last() else {
            return LinkSelection::Pruned;
        };
        let alternatives = alternative_keys(path);
        let nominal_key = &alternatives[0].1;

        if last.link.optional {
            if !self.optional_usage_links.contains(nominal_key) {
                return LinkSelection::Pruned;
            }
            retained.optional_usage_links.insert(nominal_key.clone());
        }

        for (choice, key) in &alternatives[1..] {
            if self.substitute_links.contains(key) {
                retained.substitute_links.insert(key.clone());
                return LinkSelection::Selected(*choice);
            }
        }

        LinkSelection::Selected(LinkChoice::Nominal)
    }
}

/// Offer every alternative of the last position of `path`
///
/// Used by specs listing available choices: optional positions are kept and
/// positions with substitutes yield all of them.
pub(crate) fn diverge_select(path: &[PathStep]) -> LinkSelection {
    let Some(last) = path.last() else {
        return LinkSelection::Pruned;
    };
    if last.link.substitutes.is_empty() {
        return LinkSelection::Selected(LinkChoice::Nominal);
    }
    let mut choices = vec![LinkChoice::Nominal];
    choices.extend((0..last.link.substitutes.len()).map(LinkChoice::Substitute));
    LinkSelection::Candidates(choices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::part::PartLink;

    fn retention(optional: &[&str], substitutes: &[&str]) -> LinkRetention {
        LinkRetention::new(
            optional.iter().map(|s| s.to_string()),
            substitutes.iter().map(|s| s.to_string()),
        )
    }

    fn path_to(link: PartLink) -> Vec<PathStep> {
        vec![
            PathStep::nominal(PartLink::new(1, "SUB-ASM", 1.0)),
            PathStep::nominal(link),
        ]
    }

    #[test]
    fn test_unretained_optional_link_is_pruned() {
        let mut retained = RetainedSets::default();
        let path = path_to(PartLink::new(2, "OPT", 1.0).optional());

        let selection = retention(&[], &[]).select(&path, &mut retained);

        assert_eq!(selection, LinkSelection::Pruned);
        assert!(retained.optional_usage_links.is_empty());
    }

    #[test]
    fn test_retained_optional_link_with_selected_substitute() {
        let mut retained = RetainedSets::default();
        let path = path_to(
            PartLink::new(2, "OPT", 1.0)
                .optional()
                .with_substitute(20, "ALT-1", 1.0)
                .with_substitute(21, "ALT-2", 1.0),
        );

        let selection = retention(&["u1-u2"], &["u1-s21"]).select(&path, &mut retained);

        assert_eq!(selection, LinkSelection::Selected(LinkChoice::Substitute(1)));
        assert!(retained.optional_usage_links.contains("u1-u2"));
        assert!(retained.substitute_links.contains("u1-s21"));
    }

    #[test]
    fn test_retained_optional_link_without_substitute_is_nominal() {
        let mut retained = RetainedSets::default();
        let path = path_to(
            PartLink::new(2, "OPT", 1.0)
                .optional()
                .with_substitute(20, "ALT-1", 1.0),
        );

        let selection = retention(&["u1-u2"], &["u9-s20"]).select(&path, &mut retained);

        assert_eq!(selection, LinkSelection::Selected(LinkChoice::Nominal));
        assert!(retained.substitute_links.is_empty());
    }

    #[test]
    fn test_substitute_on_mandatory_link() {
        let mut retained = RetainedSets::default();
        let path = path_to(PartLink::new(2, "NOM", 1.0).with_substitute(20, "ALT", 1.0));

        let selection = retention(&[], &["u1-s20"]).select(&path, &mut retained);

        assert_eq!(selection, LinkSelection::Selected(LinkChoice::Substitute(0)));
    }

    #[test]
    fn test_policy_kind_parse() {
        assert_eq!("Released".parse::<PolicyKind>(), Ok(PolicyKind::Released));
        assert_eq!("serial-number".parse::<PolicyKind>(), Ok(PolicyKind::Serial));
        assert!("newest".parse::<PolicyKind>().is_err());
        assert!(PolicyKind::Lot.is_effectivity());
        assert!(!PolicyKind::Latest.is_effectivity());
    }

    #[test]
    fn test_diverge_offers_all_alternatives() {
        let path = path_to(PartLink::new(2, "NOM", 1.0).with_substitute(20, "ALT", 1.0));
        assert_eq!(
            diverge_select(&path),
            LinkSelection::Candidates(vec![LinkChoice::Nominal, LinkChoice::Substitute(0)])
        );
        let plain = path_to(PartLink::new(3, "OPT", 1.0).optional());
        assert_eq!(
            diverge_select(&plain),
            LinkSelection::Selected(LinkChoice::Nominal)
        );
    }
}
