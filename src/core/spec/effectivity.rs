//! Effectivity policies - date, serial number and lot based resolution

use chrono::NaiveDate;
use tracing::debug;

use crate::core::effectivity::is_effective;
use crate::core::path::PathStep;
use crate::core::spec::{ConfigSpec, IterationSelection, LinkRetention, LinkSelection, RetainedSets};
use crate::entities::configuration::{ConfigurationItemKey, ProductConfiguration};
use crate::entities::effectivity::{EffectivityContext, EffectivityValue};
use crate::entities::part::{IterationRef, PartMaster};

/// Resolves every part to the revision effective for a date, serial number or lot
///
/// When several revisions are effective at once, the last created one wins.
/// That tie-break is a product-level convention: the data allows overlapping
/// windows and nothing else orders them.
#[derive(Debug, Clone)]
pub struct EffectivitySpec {
    context: EffectivityContext,
    links: LinkRetention,
    retained: RetainedSets,
}

impl EffectivitySpec {
    /// Link retention comes from the product configuration, if one is given;
    /// without one optional links are dropped and substitutes unused.
    pub fn new(
        context: EffectivityContext,
        product_configuration: Option<&ProductConfiguration>,
    ) -> Self {
        Self {
            context,
            links: product_configuration
                .map(LinkRetention::from_product_configuration)
                .unwrap_or_default(),
            retained: RetainedSets::default(),
        }
    }

    pub fn at_date(
        configuration_item: ConfigurationItemKey,
        date: NaiveDate,
        product_configuration: Option<&ProductConfiguration>,
    ) -> Self {
        Self::new(
            EffectivityContext::new(configuration_item, EffectivityValue::Date(date)),
            product_configuration,
        )
    }

    pub fn for_serial_number(
        configuration_item: ConfigurationItemKey,
        serial_number: impl Into<String>,
        product_configuration: Option<&ProductConfiguration>,
    ) -> Self {
        Self::new(
            EffectivityContext::new(
                configuration_item,
                EffectivityValue::SerialNumber(serial_number.into()),
            ),
            product_configuration,
        )
    }

    pub fn for_lot(
        configuration_item: ConfigurationItemKey,
        lot: impl Into<String>,
        product_configuration: Option<&ProductConfiguration>,
    ) -> Self {
        Self::new(
            EffectivityContext::new(configuration_item, EffectivityValue::Lot(lot.into())),
            product_configuration,
        )
    }

    /// Replace the link retention, e.g. with keys declared on the command line
    pub fn with_links(mut self, links: LinkRetention) -> Self {
        self.links = links;
        self
    }

    pub fn context(&self) -> &EffectivityContext {
        &self.context
    }

    fn effective_iterations<'m>(&self, master: &'m PartMaster) -> Vec<IterationRef<'m>> {
        let kind = self.context.value.kind();
        master
            .revisions
            .iter()
            .filter(|rev| {
                rev.effectivities
                    .iter()
                    .filter(|eff| eff.kind() == kind)
                    .any(|eff| is_effective(eff, &self.context))
            })
            .filter_map(|rev| {
                rev.last_iteration()
                    .map(|it| IterationRef::new(master, rev, it))
            })
            .collect()
    }
}

impl ConfigSpec for EffectivitySpec {
    fn kind(&self) -> &'static str {
        match self.context.value {
            EffectivityValue::Date(_) => "date-effectivity",
            EffectivityValue::SerialNumber(_) => "serial-number-effectivity",
            EffectivityValue::Lot(_) => "lot-effectivity",
        }
    }

    fn filter_part_iteration<'m>(&mut self, master: &'m PartMaster) -> IterationSelection<'m> {
        let mut effective = self.effective_iterations(master);
        if effective.len() > 1 {
            debug!(
                part = %master.number,
                at = %self.context.value,
                revisions = effective.len(),
                "several revisions effective, keeping the last one"
            );
        }
        let selection: IterationSelection<'m> = effective.pop().into();
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
