//! Baseline assembly - freeze a completed resolution into a replayable snapshot

use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;
use ulid::Ulid;

use crate::core::error::BaselineError;
use crate::core::lookup::{DocumentLookup, PartMasterLookup};
use crate::core::spec::RetainedSets;
use crate::entities::baseline::{BaselineSnapshot, BaselineType, ProductBaseline};
use crate::entities::configuration::ConfigurationItemKey;
use crate::entities::document::DocumentIterationKey;
use crate::entities::part::PartIterationKey;

/// Builds baselines from what a spec retained during a resolve call
pub struct BaselineAssembler<'a, P: ?Sized, D: ?Sized> {
    parts: &'a P,
    documents: &'a D,
}

impl<'a, P, D> BaselineAssembler<'a, P, D>
where
    P: PartMasterLookup + ?Sized,
    D: DocumentLookup + ?Sized,
{
    pub fn new(parts: &'a P, documents: &'a D) -> Self {
        Self { parts, documents }
    }

    /// Deterministic snapshot of the retained sets
    ///
    /// Linked documents are taken one hop from each retained iteration, at
    /// the last checked-in iteration of each document revision.
    pub fn snapshot(&self, retained: &RetainedSets) -> Result<BaselineSnapshot, BaselineError> {
        let mut parts: BTreeMap<String, PartIterationKey> = BTreeMap::new();
        let mut documents: BTreeSet<DocumentIterationKey> = BTreeSet::new();

        for key in &retained.part_iterations {
            if let Some(first) = parts.get(&key.number) {
                return Err(BaselineError::ConflictingIterations {
                    number: key.number.clone(),
                    first: first.clone(),
                    second: key.clone(),
                });
            }

            let master = self.parts.part_master(&key.workspace_id, &key.number)?;
            let found = master
                .iteration(key)
                .ok_or_else(|| BaselineError::MissingIteration(key.clone()))?;

            for link in &found.iteration.linked_documents {
                let revision = self.documents.document_revision(&link.target)?;
                if let Some(doc_iteration) = revision.last_checked_in_iteration() {
                    documents.insert(doc_iteration);
                }
            }
            parts.insert(key.number.clone(), key.clone());
        }

        Ok(BaselineSnapshot {
            parts,
            documents,
            substitute_links: retained.substitute_links.clone(),
            optional_usage_links: retained.optional_usage_links.clone(),
        })
    }

    /// Snapshot the retained sets under a new collection id
    pub fn assemble(
        &self,
        name: impl Into<String>,
        baseline_type: BaselineType,
        description: Option<String>,
        configuration_item: Option<ConfigurationItemKey>,
        retained: &RetainedSets,
    ) -> Result<ProductBaseline, BaselineError> {
        let snapshot = self.snapshot(retained)?;
        let baseline = ProductBaseline {
            collection_id: Ulid::new().to_string(),
            name: name.into(),
            baseline_type,
            description,
            created: Utc::now(),
            configuration_item,
            snapshot,
        };
        info!(
            baseline = %baseline.name,
            collection = %baseline.collection_id,
            parts = baseline.snapshot.parts.len(),
            documents = baseline.snapshot.documents.len(),
            "assembled baseline"
        );
        Ok(baseline)
    }
}
