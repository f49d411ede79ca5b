//! Effectivity policy tests over the lamp fixture

mod common;

use chrono::NaiveDate;
use common::{catalog, LAMP_STRUCTURE};
use tsr::core::callbacks::StrictCallbacks;
use tsr::core::component::Component;
use tsr::core::error::{NotAllowed, ResolveError};
use tsr::core::resolver::StructureResolver;
use tsr::core::spec::EffectivitySpec;
use tsr::entities::configuration::ConfigurationItemKey;

fn lamp() -> ConfigurationItemKey {
    ConfigurationItemKey::new("acme", "LAMP")
}

fn resolve(mut spec: EffectivitySpec) -> Result<Option<Component>, ResolveError> {
    let catalog = catalog(LAMP_STRUCTURE);
    StructureResolver::new(&catalog).resolve("acme", &mut spec, "LAMP-1", None, &mut StrictCallbacks)
}

fn shade_version(spec: EffectivitySpec) -> String {
    let root = resolve(spec).unwrap().unwrap();
    root.children[0].version().to_string()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn test_date_effectivity_picks_window() {
    assert_eq!(shade_version(EffectivitySpec::at_date(lamp(), date("2024-03-01"), None)), "A");
    assert_eq!(shade_version(EffectivitySpec::at_date(lamp(), date("2024-08-01"), None)), "B");
}

#[test]
fn test_date_bounds_are_inclusive() {
    assert_eq!(shade_version(EffectivitySpec::at_date(lamp(), date("2024-06-30"), None)), "A");
    assert_eq!(shade_version(EffectivitySpec::at_date(lamp(), date("2024-07-01"), None)), "B");
}

#[test]
fn test_date_gap_is_unresolved() {
    let err = resolve(EffectivitySpec::at_date(lamp(), date("2023-12-31"), None)).unwrap_err();
    assert!(matches!(
        err,
        ResolveError::NotAllowed(NotAllowed::UnresolvedVersion { ref number }) if number == "SHADE"
    ));
}

#[test]
fn test_serial_numbers_compare_naturally() {
    assert_eq!(shade_version(EffectivitySpec::for_serial_number(lamp(), "99", None)), "A");
    assert_eq!(shade_version(EffectivitySpec::for_serial_number(lamp(), "0099", None)), "A");
    assert_eq!(shade_version(EffectivitySpec::for_serial_number(lamp(), "100", None)), "B");
    assert_eq!(shade_version(EffectivitySpec::for_serial_number(lamp(), "1000", None)), "B");
}

#[test]
fn test_other_configuration_item_is_never_effective() {
    let other = ConfigurationItemKey::new("acme", "OTHER");
    let err = resolve(EffectivitySpec::at_date(other, date("2024-03-01"), None)).unwrap_err();
    assert!(matches!(
        err,
        ResolveError::NotAllowed(NotAllowed::UnresolvedVersion { ref number }) if number == "LAMP-1"
    ));
}

#[test]
fn test_lot_without_lot_effectivities_is_unresolved() {
    let err = resolve(EffectivitySpec::for_lot(lamp(), "L-7", None)).unwrap_err();
    assert!(matches!(err, ResolveError::NotAllowed(_)));
}
