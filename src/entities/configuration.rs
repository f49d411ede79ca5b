//! Configuration items and product configurations

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identity of a configuration item
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConfigurationItemKey {
    #[serde(default)]
    pub workspace_id: String,
    pub id: String,
}

impl ConfigurationItemKey {
    pub fn new(workspace_id: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            id: id.into(),
        }
    }
}

impl std::fmt::Display for ConfigurationItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.workspace_id, self.id)
    }
}

/// The "product" a resolution is driven by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationItem {
    #[serde(default)]
    pub workspace_id: String,

    pub id: String,

    /// Number of the root part of the product
    pub designated_product: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ConfigurationItem {
    pub fn key(&self) -> ConfigurationItemKey {
        ConfigurationItemKey::new(&self.workspace_id, &self.id)
    }
}

/// Caller-declared link retention for a configuration item
///
/// Lists the optional positions to keep and the substitutes to use, both as
/// path keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductConfiguration {
    pub name: String,

    /// Configuration item this product configuration belongs to
    pub configuration_item: ConfigurationItemKey,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub optional_usage_links: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub substitute_links: BTreeSet<String>,
}
