//! In-memory catalog of one workspace's parts and documents
//!
//! Loaded from a YAML structure file; serves as the part and document lookup
//! for the CLI and tests.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::core::error::LookupError;
use crate::core::lookup::{DocumentLookup, PartMasterLookup};
use crate::entities::configuration::{ConfigurationItem, ProductConfiguration};
use crate::entities::document::{DocumentRevision, DocumentRevisionKey};
use crate::entities::part::PartMaster;
use crate::yaml::{parse_yaml_file, YamlError};

/// On-disk layout of a structure file
///
/// Workspace ids omitted inside the document default to `workspace`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructureFile {
    #[serde(default)]
    pub workspace: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub configuration_items: Vec<ConfigurationItem>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub product_configurations: Vec<ProductConfiguration>,

    #[serde(default)]
    pub parts: Vec<PartMaster>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<DocumentRevision>,
}

/// Parts, documents and configuration items of one workspace
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    workspace_id: String,
    parts: HashMap<String, Arc<PartMaster>>,
    documents: HashMap<DocumentRevisionKey, Arc<DocumentRevision>>,
    configuration_items: Vec<ConfigurationItem>,
    product_configurations: Vec<ProductConfiguration>,
}

impl Catalog {
    pub fn new(workspace_id: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            ..Self::default()
        }
    }

    /// Load a structure file
    ///
    /// `workspace` replaces the file's workspace; `fallback` applies only
    /// when the file names none.
    pub fn load(path: &Path, workspace: Option<&str>, fallback: &str) -> Result<Self, YamlError> {
        let mut file: StructureFile = parse_yaml_file(path)?;
        match workspace {
            Some(ws) => file.workspace = ws.to_string(),
            None => fill(&mut file.workspace, fallback),
        }
        let catalog = Self::from_structure(file);
        debug!(
            file = %path.display(),
            parts = catalog.parts.len(),
            documents = catalog.documents.len(),
            workspace = %catalog.workspace_id,
            "loaded structure file"
        );
        Ok(catalog)
    }

    pub fn from_structure(file: StructureFile) -> Self {
        let mut catalog = Self::new(file.workspace);
        for mut item in file.configuration_items {
            fill(&mut item.workspace_id, &catalog.workspace_id);
            catalog.configuration_items.push(item);
        }
        for mut config in file.product_configurations {
            fill(&mut config.configuration_item.workspace_id, &catalog.workspace_id);
            catalog.product_configurations.push(config);
        }
        for part in file.parts {
            catalog.insert_part(part);
        }
        for document in file.documents {
            catalog.insert_document(document);
        }
        catalog
    }

    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    /// Add a part, defaulting every omitted workspace id to the catalog's
    pub fn insert_part(&mut self, mut part: PartMaster) {
        let ws = self.workspace_id.clone();
        fill(&mut part.workspace_id, &ws);
        for revision in &mut part.revisions {
            for effectivity in &mut revision.effectivities {
                fill(&mut effectivity.configuration_item.workspace_id, &ws);
            }
            for iteration in &mut revision.iterations {
                for link in &mut iteration.linked_documents {
                    fill(&mut link.target.workspace_id, &ws);
                }
            }
        }
        self.parts.insert(part.number.clone(), Arc::new(part));
    }

    pub fn insert_document(&mut self, mut document: DocumentRevision) {
        fill(&mut document.workspace_id, &self.workspace_id);
        self.documents.insert(document.key(), Arc::new(document));
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn configuration_item(&self, id: &str) -> Option<&ConfigurationItem> {
        self.configuration_items.iter().find(|ci| ci.id == id)
    }

    /// The configuration item whose designated product is `number`, if any
    pub fn configuration_item_for(&self, number: &str) -> Option<&ConfigurationItem> {
        self.configuration_items
            .iter()
            .find(|ci| ci.designated_product == number)
    }

    pub fn product_configuration(&self, name: &str) -> Option<&ProductConfiguration> {
        self.product_configurations.iter().find(|pc| pc.name == name)
    }

    /// Structural problems of every part, sorted by part number
    pub fn validate(&self) -> Vec<String> {
        let mut numbers: Vec<&String> = self.parts.keys().collect();
        numbers.sort();
        numbers
            .into_iter()
            .flat_map(|n| self.parts[n].validate())
            .collect()
    }
}

fn fill(target: &mut String, default: &str) {
    if target.is_empty() {
        *target = default.to_string();
    }
}

impl PartMasterLookup for Catalog {
    fn part_master(
        &self,
        workspace_id: &str,
        number: &str,
    ) -> Result<Arc<PartMaster>, LookupError> {
        if workspace_id != self.workspace_id {
            return Err(LookupError::PartNotFound {
                workspace_id: workspace_id.to_string(),
                number: number.to_string(),
            });
        }
        self.parts
            .get(number)
            .cloned()
            .ok_or_else(|| LookupError::PartNotFound {
                workspace_id: workspace_id.to_string(),
                number: number.to_string(),
            })
    }
}

impl DocumentLookup for Catalog {
    fn document_revision(
        &self,
        key: &DocumentRevisionKey,
    ) -> Result<Arc<DocumentRevision>, LookupError> {
        self.documents
            .get(key)
            .cloned()
            .ok_or_else(|| LookupError::DocumentNotFound { key: key.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::parse_yaml;

    const STRUCTURE: &str = r#"
workspace: acme
configuration_items:
  - id: BIKE
    designated_product: FRAME
parts:
  - number: FRAME
    revisions:
      - version: A
        status: released
        iterations:
          - iteration: 1
            checkin_date: 2024-03-01T10:00:00Z
            linked_documents:
              - target: { id: DRW-1, version: A }
        effectivities:
          - name: launch
            configuration_item: { id: BIKE }
            kind: date
            start: 2024-01-01
documents:
  - id: DRW-1
    version: A
    iterations:
      - iteration: 1
        checkin_date: 2024-02-01T10:00:00Z
"#;

    fn catalog() -> Catalog {
        Catalog::from_structure(parse_yaml(STRUCTURE, "structure.yaml").unwrap())
    }

    #[test]
    fn test_omitted_workspace_ids_are_filled() {
        let catalog = catalog();
        let frame = catalog.part_master("acme", "FRAME").unwrap();

        assert_eq!(frame.workspace_id, "acme");
        let revision = &frame.revisions[0];
        assert_eq!(revision.effectivities[0].configuration_item.workspace_id, "acme");
        assert_eq!(
            revision.iterations[0].linked_documents[0].target.workspace_id,
            "acme"
        );
        assert_eq!(catalog.configuration_item("BIKE").unwrap().workspace_id, "acme");
    }

    #[test]
    fn test_lookup_failures() {
        let catalog = catalog();
        assert!(matches!(
            catalog.part_master("acme", "WHEEL"),
            Err(LookupError::PartNotFound { .. })
        ));
        assert!(catalog.part_master("other", "FRAME").is_err());
        assert!(catalog
            .document_revision(&DocumentRevisionKey::new("acme", "DRW-1", "A"))
            .is_ok());
    }

    #[test]
    fn test_configuration_item_for_product() {
        let catalog = catalog();
        assert_eq!(
            catalog.configuration_item_for("FRAME").map(|ci| ci.id.as_str()),
            Some("BIKE")
        );
        assert!(catalog.validate().is_empty());
    }

    #[test]
    fn test_load_workspace_precedence() {
        let tmp = tempfile::tempdir().unwrap();
        let named = tmp.path().join("named.yaml");
        let bare = tmp.path().join("bare.yaml");
        std::fs::write(&named, STRUCTURE).unwrap();
        std::fs::write(&bare, STRUCTURE.replace("workspace: acme\n", "")).unwrap();

        assert_eq!(Catalog::load(&named, None, "default").unwrap().workspace_id(), "acme");
        assert_eq!(Catalog::load(&named, Some("lab"), "default").unwrap().workspace_id(), "lab");
        assert_eq!(Catalog::load(&bare, None, "default").unwrap().workspace_id(), "default");

        let lab = Catalog::load(&bare, Some("lab"), "default").unwrap();
        assert!(lab.part_master("lab", "FRAME").is_ok());
    }
}
