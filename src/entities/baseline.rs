//! Product baseline - a frozen, replayable resolution of a product structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::entities::configuration::ConfigurationItemKey;
use crate::entities::document::{DocumentIterationKey, DocumentRevisionKey};
use crate::entities::part::PartIterationKey;

/// Policy used for parts the baseline author did not pick explicitly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum BaselineType {
    #[default]
    Released,
    Latest,
}

impl std::fmt::Display for BaselineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BaselineType::Released => write!(f, "released"),
            BaselineType::Latest => write!(f, "latest"),
        }
    }
}

impl std::str::FromStr for BaselineType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "released" => Ok(BaselineType::Released),
            "latest" => Ok(BaselineType::Latest),
            _ => Err(format!(
                "Invalid baseline type: {}. Use 'released' or 'latest'",
                s
            )),
        }
    }
}

/// Deterministic content of a baseline
///
/// Two snapshots built from the same retained sets compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineSnapshot {
    /// Part number to the iteration frozen for it
    #[serde(default)]
    pub parts: BTreeMap<String, PartIterationKey>,

    /// Documents linked from the frozen iterations, one iteration per revision
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub documents: BTreeSet<DocumentIterationKey>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub substitute_links: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub optional_usage_links: BTreeSet<String>,
}

impl BaselineSnapshot {
    /// Iteration captured for a linked document revision
    pub fn document(&self, revision: &DocumentRevisionKey) -> Option<&DocumentIterationKey> {
        self.documents.iter().find(|key| key.revision() == *revision)
    }
}

/// A named baseline as handed to the storage layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductBaseline {
    /// Identifier of the frozen part collection
    pub collection_id: String,

    pub name: String,

    #[serde(rename = "type")]
    pub baseline_type: BaselineType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub created: DateTime<Utc>,

    /// Configuration item the baseline was taken for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration_item: Option<ConfigurationItemKey>,

    #[serde(flatten)]
    pub snapshot: BaselineSnapshot,
}
