//! Baseline creation policy - explicit picks over a released or latest fallback

use std::collections::HashMap;

use tracing::warn;

use crate::core::path::PathStep;
use crate::core::spec::latest::last_checked_in_iteration;
use crate::core::spec::released::last_released_iteration;
use crate::core::spec::{ConfigSpec, IterationSelection, LinkRetention, LinkSelection, RetainedSets};
use crate::entities::baseline::BaselineType;
use crate::entities::part::{PartIterationKey, PartMaster};

/// Resolves parts to the iterations a baseline author picked
///
/// Parts without a pick fall back to the released or latest policy,
/// depending on the baseline type.
#[derive(Debug, Clone)]
pub struct BaselineCreationSpec {
    baseline_type: BaselineType,
    picks: HashMap<(String, String), PartIterationKey>,
    links: LinkRetention,
    retained: RetainedSets,
}

impl BaselineCreationSpec {
    pub fn new(
        baseline_type: BaselineType,
        iterations: impl IntoIterator<Item = PartIterationKey>,
        links: LinkRetention,
    ) -> Self {
        let picks = iterations
            .into_iter()
            .map(|key| ((key.workspace_id.clone(), key.number.clone()), key))
            .collect();
        Self {
            baseline_type,
            picks,
            links,
            retained: RetainedSets::default(),
        }
    }

    pub fn baseline_type(&self) -> BaselineType {
        self.baseline_type
    }
}

impl ConfigSpec for BaselineCreationSpec {
    fn kind(&self) -> &'static str {
        "baseline-creation"
    }

    fn filter_part_iteration<'m>(&mut self, master: &'m PartMaster) -> IterationSelection<'m> {
        let pick = self
            .picks
            .get(&(master.workspace_id.clone(), master.number.clone()));

        let selection: IterationSelection<'m> = match pick {
            Some(key) => {
                let found = master.iteration(key);
                if found.is_none() {
                    warn!(part = %master.number, pick = %key, "picked iteration does not exist");
                }
                found.into()
            }
            None => match self.baseline_type {
                BaselineType::Released => last_released_iteration(master).into(),
                BaselineType::Latest => last_checked_in_iteration(master).into(),
            },
        };
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
