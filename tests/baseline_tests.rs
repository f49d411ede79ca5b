//! Baseline creation and replay tests

mod common;

use common::{catalog, BIKE_STRUCTURE};
use tsr::core::baseline::BaselineAssembler;
use tsr::core::callbacks::StrictCallbacks;
use tsr::core::error::{NotAllowed, ResolveError};
use tsr::core::resolver::StructureResolver;
use tsr::core::spec::{
    BaselineCreationSpec, ConfigSpec, LinkRetention, ResolvedCollectionSpec,
};
use tsr::entities::baseline::{BaselineType, ProductBaseline};
use tsr::entities::document::DocumentRevisionKey;
use tsr::entities::part::PartIterationKey;
use tsr::yaml::parse_yaml;

fn deluxe_links(catalog: &tsr::core::Catalog) -> LinkRetention {
    LinkRetention::from_product_configuration(catalog.product_configuration("deluxe").unwrap())
}

fn create_baseline(catalog: &tsr::core::Catalog) -> (ProductBaseline, BaselineCreationSpec) {
    let mut spec = BaselineCreationSpec::new(
        BaselineType::Latest,
        vec![PartIterationKey::new("acme", "PART-203", "A", 1)],
        deluxe_links(catalog),
    );
    StructureResolver::new(catalog)
        .resolve("acme", &mut spec, "PART-006", None, &mut StrictCallbacks)
        .unwrap()
        .unwrap();

    let ci = catalog.configuration_item("BIKE").map(|ci| ci.key());
    let baseline = BaselineAssembler::new(catalog, catalog)
        .assemble("pilot", BaselineType::Latest, None, ci, spec.retained())
        .unwrap();
    (baseline, spec)
}

#[test]
fn test_baseline_freezes_picks_and_fallbacks() {
    let catalog = catalog(BIKE_STRUCTURE);
    let (baseline, _) = create_baseline(&catalog);

    let parts = &baseline.snapshot.parts;
    assert_eq!(parts["PART-203"], PartIterationKey::new("acme", "PART-203", "A", 1));
    assert_eq!(parts["PART-006"], PartIterationKey::new("acme", "PART-006", "B", 2));
    assert!(parts.contains_key("PART-003-ALT"));
    assert!(parts.contains_key("PART-004"));
    assert!(!parts.contains_key("PART-003"));
    assert_eq!(baseline.configuration_item.as_ref().unwrap().id, "BIKE");
}

#[test]
fn test_baseline_captures_last_checked_in_documents() {
    let catalog = catalog(BIKE_STRUCTURE);
    let (baseline, _) = create_baseline(&catalog);

    let drawing = baseline
        .snapshot
        .document(&DocumentRevisionKey::new("acme", "DOC-1", "A"))
        .unwrap();
    assert_eq!(drawing.iteration, 1);
    assert_eq!(baseline.snapshot.documents.len(), 1);
}

#[test]
fn test_replay_reproduces_retained_sets() {
    let catalog = catalog(BIKE_STRUCTURE);
    let (baseline, creation) = create_baseline(&catalog);

    let mut replay = ResolvedCollectionSpec::from_baseline(&baseline);
    StructureResolver::new(&catalog)
        .resolve("acme", &mut replay, "PART-006", None, &mut StrictCallbacks)
        .unwrap()
        .unwrap();

    assert_eq!(replay.retained(), creation.retained());
}

#[test]
fn test_replay_from_stored_yaml() {
    let catalog = catalog(BIKE_STRUCTURE);
    let (baseline, creation) = create_baseline(&catalog);

    let stored = serde_yml::to_string(&baseline).unwrap();
    let loaded: ProductBaseline = parse_yaml(&stored, "pilot.yaml").unwrap();
    assert_eq!(loaded, baseline);

    let mut replay = ResolvedCollectionSpec::from_baseline(&loaded);
    let root = StructureResolver::new(&catalog)
        .resolve("acme", &mut replay, "PART-006", None, &mut StrictCallbacks)
        .unwrap()
        .unwrap();

    assert_eq!(root.version(), "B");
    assert_eq!(replay.retained(), creation.retained());
}

#[test]
fn test_replay_rejects_parts_outside_collection() {
    let catalog = catalog(BIKE_STRUCTURE);
    let (mut baseline, _) = create_baseline(&catalog);
    baseline.snapshot.parts.remove("PART-202");

    let mut replay = ResolvedCollectionSpec::from_baseline(&baseline);
    let err = StructureResolver::new(&catalog)
        .resolve("acme", &mut replay, "PART-006", None, &mut StrictCallbacks)
        .unwrap_err();

    assert!(matches!(
        err,
        ResolveError::NotAllowed(NotAllowed::UnresolvedVersion { ref number }) if number == "PART-202"
    ));
}

#[test]
fn test_pick_of_missing_iteration_is_unresolved() {
    let catalog = catalog(BIKE_STRUCTURE);
    let mut spec = BaselineCreationSpec::new(
        BaselineType::Released,
        vec![PartIterationKey::new("acme", "PART-001", "Z", 1)],
        LinkRetention::default(),
    );

    let err = StructureResolver::new(&catalog)
        .resolve("acme", &mut spec, "PART-006", None, &mut StrictCallbacks)
        .unwrap_err();

    assert!(matches!(
        err,
        ResolveError::NotAllowed(NotAllowed::UnresolvedVersion { ref number }) if number == "PART-001"
    ));
}
