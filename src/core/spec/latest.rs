//! Latest policy - the last checked-in iteration of the last revision

use crate::core::path::PathStep;
use crate::core::spec::{
    diverge_select, ConfigSpec, IterationSelection, LinkRetention, LinkSelection, RetainedSets,
};
use crate::entities::part::{IterationRef, PartMaster};

/// Last checked-in iteration of the last revision
///
/// The last revision may be checked out; its working copy is never returned.
pub fn last_checked_in_iteration(master: &PartMaster) -> Option<IterationRef<'_>> {
    let revision = master.last_revision()?;
    revision
        .last_checked_in_iteration()
        .map(|it| IterationRef::new(master, revision, it))
}

fn checked_in_iterations(master: &PartMaster) -> Vec<IterationRef<'_>> {
    master
        .revisions
        .iter()
        .filter_map(|rev| {
            rev.last_checked_in_iteration()
                .map(|it| IterationRef::new(master, rev, it))
        })
        .collect()
}

/// Resolves every part to its most recent checked-in content
#[derive(Debug, Clone, Default)]
pub struct LatestCheckedInSpec {
    links: LinkRetention,
    diverge: bool,
    retained: RetainedSets,
}

impl LatestCheckedInSpec {
    pub fn new(links: LinkRetention) -> Self {
        Self {
            links,
            diverge: false,
            retained: RetainedSets::default(),
        }
    }

    /// Offer every revision and every link alternative as a choice
    pub fn diverging() -> Self {
        Self {
            diverge: true,
            ..Self::default()
        }
    }
}

impl ConfigSpec for LatestCheckedInSpec {
    fn kind(&self) -> &'static str {
        "latest"
    }

    fn filter_part_iteration<'m>(&mut self, master: &'m PartMaster) -> IterationSelection<'m> {
        let selection = if self.diverge {
            IterationSelection::from_candidates(checked_in_iterations(master))
        } else {
            last_checked_in_iteration(master).into()
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
