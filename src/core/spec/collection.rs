//! Baseline replay policy - reproduce a frozen resolution

use std::collections::HashMap;

use crate::core::path::PathStep;
use crate::core::spec::{ConfigSpec, IterationSelection, LinkRetention, LinkSelection, RetainedSets};
use crate::entities::baseline::ProductBaseline;
use crate::entities::part::{PartIterationKey, PartMaster};

/// Replays the part collection frozen in a baseline
///
/// Iterations are looked up, never chosen: a part missing from the collection
/// is unresolved.
#[derive(Debug, Clone)]
pub struct ResolvedCollectionSpec {
    collection_id: String,
    parts: HashMap<(String, String), PartIterationKey>,
    links: LinkRetention,
    retained: RetainedSets,
}

impl ResolvedCollectionSpec {
    pub fn from_baseline(baseline: &ProductBaseline) -> Self {
        let snapshot = &baseline.snapshot;
        let parts = snapshot
            .parts
            .values()
            .map(|key| ((key.workspace_id.clone(), key.number.clone()), key.clone()))
            .collect();
        Self {
            collection_id: baseline.collection_id.clone(),
            parts,
            links: LinkRetention::new(
                snapshot.optional_usage_links.iter().cloned(),
                snapshot.substitute_links.iter().cloned(),
            ),
            retained: RetainedSets::default(),
        }
    }

    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    /// Iteration frozen for a part of this collection
    pub fn frozen_iteration(&self, workspace_id: &str, number: &str) -> Option<&PartIterationKey> {
        self.parts
            .get(&(workspace_id.to_string(), number.to_string()))
    }
}

impl ConfigSpec for ResolvedCollectionSpec {
    fn kind(&self) -> &'static str {
        "baseline-replay"
    }

    fn filter_part_iteration<'m>(&mut self, master: &'m PartMaster) -> IterationSelection<'m> {
        let selection: IterationSelection<'m> = self
            .frozen_iteration(&master.workspace_id, &master.number)
            .and_then(|key| master.iteration(key))
            .into();
        self.retained.retain_selection(&selection);
        selection
    }

    fn filter_part_link(&mut self, path: &[PathStep]) -> LinkSelection {
        self.links.select(path, &mut self.retained)
    }

    fn retained(&self) -> &RetainedSets {
        &self.retained
    }

    fn retained_mut(&mut self) -> &mut RetainedSets {
        &mut self.retained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::baseline::{BaselineSnapshot, BaselineType};
    use crate::entities::part::{PartIteration, PartLink, PartRevision, RevisionStatus};
    use chrono::Utc;

    fn master() -> PartMaster {
        let iteration = |n| PartIteration {
            iteration: n,
            checkin_date: Some(Utc::now()),
            author: None,
            components: Vec::new(),
            linked_documents: Vec::new(),
        };
        PartMaster {
            workspace_id: "ws".to_string(),
            number: "GEAR".to_string(),
            name: None,
            revisions: vec![
                PartRevision {
                    version: "A".to_string(),
                    status: RevisionStatus::Released,
                    checked_out_by: None,
                    iterations: vec![iteration(1), iteration(2)],
                    effectivities: Vec::new(),
                },
                PartRevision {
                    version: "B".to_string(),
                    status: RevisionStatus::Released,
                    checked_out_by: None,
                    iterations: vec![iteration(1)],
                    effectivities: Vec::new(),
                },
            ],
        }
    }

    fn baseline(parts: &[PartIterationKey]) -> ProductBaseline {
        let mut snapshot = BaselineSnapshot::default();
        for key in parts {
            snapshot.parts.insert(key.number.clone(), key.clone());
        }
        snapshot.substitute_links.insert("u1-s9".to_string());
        ProductBaseline {
            collection_id: "01HZY0000000000000000000AA".to_string(),
            name: "pilot".to_string(),
            baseline_type: BaselineType::Released,
            description: None,
            created: Utc::now(),
            configuration_item: None,
            snapshot,
        }
    }

    #[test]
    fn test_frozen_iteration_wins_over_newer_revisions() {
        let frozen = PartIterationKey::new("ws", "GEAR", "A", 1);
        let mut spec = ResolvedCollectionSpec::from_baseline(&baseline(&[frozen.clone()]));
        let part = master();

        let IterationSelection::Resolved(found) = spec.filter_part_iteration(&part) else {
            panic!("expected the frozen iteration");
        };

        assert_eq!(found.key(), frozen);
        assert!(spec.retained().part_iterations.contains(&frozen));
        assert_eq!(spec.collection_id(), "01HZY0000000000000000000AA");
    }

    #[test]
    fn test_part_outside_collection_is_unresolved() {
        let mut spec = ResolvedCollectionSpec::from_baseline(&baseline(&[]));
        assert!(matches!(
            spec.filter_part_iteration(&master()),
            IterationSelection::Unresolved
        ));
    }

    #[test]
    fn test_links_follow_frozen_substitutes() {
        let mut spec = ResolvedCollectionSpec::from_baseline(&baseline(&[]));
        let path = vec![PathStep::nominal(
            PartLink::new(1, "GEAR", 1.0).with_substitute(9, "GEAR-ALT", 1.0),
        )];

        assert_eq!(
            spec.filter_part_link(&path),
            LinkSelection::Selected(crate::core::path::LinkChoice::Substitute(0))
        );
    }
}
