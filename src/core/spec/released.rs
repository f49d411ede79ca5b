//! Released policy - the last iteration of the last released revision

use crate::core::path::PathStep;
use crate::core::spec::{
    diverge_select, ConfigSpec, IterationSelection, LinkRetention, LinkSelection, RetainedSets,
};
use crate::entities::part::{IterationRef, PartMaster};

/// Last iteration of the last released revision, if any
pub fn last_released_iteration(master: &PartMaster) -> Option<IterationRef<'_>> {
    master
        .revisions
        .iter()
        .rev()
        .filter(|rev| rev.is_released())
        .find_map(|rev| {
            rev.last_iteration()
                .map(|it| IterationRef::new(master, rev, it))
        })
}

/// Last iteration of every released revision, in revision order
fn released_iterations(master: &PartMaster) -> Vec<IterationRef<'_>> {
    master
        .revisions
        .iter()
        .filter(|rev| rev.is_released())
        .filter_map(|rev| {
            rev.last_iteration()
                .map(|it| IterationRef::new(master, rev, it))
        })
        .collect()
}

/// Resolves every part to its last released revision
#[derive(Debug, Clone, Default)]
pub struct ReleasedSpec {
    links: LinkRetention,
    diverge: bool,
    retained: RetainedSets,
}

impl ReleasedSpec {
    pub fn new(links: LinkRetention) -> Self {
        Self {
            links,
            diverge: false,
            retained: RetainedSets::default(),
        }
    }

    /// Offer every released revision and every link alternative as a choice
    pub fn diverging() -> Self {
        Self {
            diverge: true,
            ..Self::default()
        }
    }
}

impl ConfigSpec for ReleasedSpec {
    fn kind(&self) -> &'static str {
        "released"
    }

    fn filter_part_iteration<'m>(&mut self, master: &'m PartMaster) -> IterationSelection<'m> {
        let selection = if self.diverge {
            IterationSelection::from_candidates(released_iterations(master))
        } else {
            last_released_iteration(master).into()
        };
        self.retained.retain_selection(&selection);
        selection
    }

    fn filter_part_link(&mut self, path: &[PathStep]) -> LinkSelection {
        if self.diverge {
            diverge_select(path)
        } else {
            self.links.select(path, &mut self.retained)
        }
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
    use crate::entities::part::{PartIteration, PartIterationKey, PartRevision, RevisionStatus};
    use chrono::Utc;

    fn revision(version: &str, status: RevisionStatus, iterations: u32) -> PartRevision {
        PartRevision {
            version: version.to_string(),
            status,
            checked_out_by: None,
            iterations: (1..=iterations)
                .map(|n| PartIteration {
                    iteration: n,
                    checkin_date: Some(Utc::now()),
                    author: None,
                    components: Vec::new(),
                    linked_documents: Vec::new(),
                })
                .collect(),
            effectivities: Vec::new(),
        }
    }

    fn master(revisions: Vec<PartRevision>) -> PartMaster {
        PartMaster {
            workspace_id: "ws".to_string(),
            number: "P-100".to_string(),
            name: None,
            revisions,
        }
    }

    #[test]
    fn test_picks_last_released_revision() {
        let part = master(vec![
            revision("A", RevisionStatus::Released, 2),
            revision("B", RevisionStatus::Released, 3),
            revision("C", RevisionStatus::Draft, 1),
        ]);
        let mut spec = ReleasedSpec::default();

        let IterationSelection::Resolved(found) = spec.filter_part_iteration(&part) else {
            panic!("expected a resolved iteration");
        };

        assert_eq!(found.key(), PartIterationKey::new("ws", "P-100", "B", 3));
        assert!(spec.retained().part_iterations.contains(&found.key()));
    }

    #[test]
    fn test_no_released_revision_is_unresolved() {
        let part = master(vec![
            revision("A", RevisionStatus::Draft, 1),
            revision("B", RevisionStatus::Obsolete, 1),
        ]);
        let mut spec = ReleasedSpec::default();

        assert!(matches!(
            spec.filter_part_iteration(&part),
            IterationSelection::Unresolved
        ));
        assert!(spec.retained().part_iterations.is_empty());
    }

    #[test]
    fn test_diverging_offers_every_released_revision() {
        let part = master(vec![
            revision("A", RevisionStatus::Released, 1),
            revision("B", RevisionStatus::Released, 2),
        ]);
        let mut spec = ReleasedSpec::diverging();

        let IterationSelection::Indeterminate(candidates) = spec.filter_part_iteration(&part)
        else {
            panic!("expected several candidates");
        };
        let versions: Vec<&str> = candidates
            .iter()
            .map(|c| c.revision.version.as_str())
            .collect();
        assert_eq!(versions, vec!["A", "B"]);
    }
}
