//! Shared test helpers for integration tests
//!
//! This module provides the fixture structures and command helpers used
//! across all test files.

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

use tsr::core::catalog::{Catalog, StructureFile};
use tsr::yaml::parse_yaml;

/// Helper to get a tsr command isolated from the caller's environment
pub fn tsr() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("tsr"));
    cmd.env_remove("TSR_CONFIG")
        .env_remove("TSR_LOG")
        .env_remove("TSR_WORKSPACE");
    cmd
}

/// Bike structure rooted at PART-006
///
/// Latest checked-in resolution:
/// ```text
/// PART-006 B.2
/// ├── PART-001 A.1        [u1]
/// │   └── PART-101 A.1    [u1-u11]
/// ├── PART-002 A.1        [u2]
/// │   ├── PART-101 A.1    [u2-u21]
/// │   ├── PART-202 A.1    [u2-u22]
/// │   └── PART-203 B.1    [u2-u23]
/// └── PART-003 A.1        [u3, substitute s31 -> PART-003-ALT]
/// ```
/// `u4` (PART-004) is optional and pruned unless retained. PART-007 is
/// checked out with nothing but a working copy.
pub const BIKE_STRUCTURE: &str = r#"
workspace: acme
configuration_items:
  - id: BIKE
    designated_product: PART-006
    description: City bike
product_configurations:
  - name: deluxe
    configuration_item: { id: BIKE }
    optional_usage_links: [u4]
    substitute_links: [s31]
parts:
  - number: PART-006
    name: Bike
    revisions:
      - version: A
        status: released
        iterations:
          - iteration: 1
            checkin_date: 2024-01-10T09:00:00Z
            components:
              - { id: 5, component: PART-001, amount: 1 }
      - version: B
        status: draft
        iterations:
          - iteration: 1
            checkin_date: 2024-02-01T09:00:00Z
            components:
              - { id: 1, component: PART-001, amount: 1 }
          - iteration: 2
            checkin_date: 2024-03-01T09:00:00Z
            linked_documents:
              - target: { id: DOC-1, version: A }
            components:
              - { id: 1, component: PART-001, amount: 1 }
              - { id: 2, component: PART-002, amount: 2 }
              - id: 3
                component: PART-003
                amount: 1
                substitutes:
                  - { id: 31, substitute: PART-003-ALT, amount: 1 }
              - { id: 4, component: PART-004, amount: 1, optional: true }
  - number: PART-001
    name: Frame
    revisions:
      - version: A
        status: released
        iterations:
          - iteration: 1
            checkin_date: 2024-01-05T09:00:00Z
            components:
              - { id: 11, component: PART-101, amount: 2 }
  - number: PART-101
    name: Bolt M6
    revisions:
      - version: A
        status: released
        iterations:
          - { iteration: 1, checkin_date: 2024-01-02T09:00:00Z }
  - number: PART-002
    name: Wheel
    revisions:
      - version: A
        status: released
        iterations:
          - iteration: 1
            checkin_date: 2024-01-06T09:00:00Z
            components:
              - { id: 21, component: PART-101, amount: 1 }
              - { id: 22, component: PART-202, amount: 4 }
              - { id: 23, component: PART-203, amount: 1 }
  - number: PART-202
    name: Spoke
    revisions:
      - version: A
        status: draft
        iterations:
          - { iteration: 1, checkin_date: 2024-01-03T09:00:00Z }
  - number: PART-203
    name: Hub
    revisions:
      - version: A
        status: released
        iterations:
          - { iteration: 1, checkin_date: 2024-01-03T09:00:00Z }
      - version: B
        status: draft
        checked_out_by: alice
        iterations:
          - { iteration: 1, checkin_date: 2024-02-03T09:00:00Z }
          - { iteration: 2 }
  - number: PART-003
    name: Saddle
    revisions:
      - version: A
        status: draft
        iterations:
          - { iteration: 1, checkin_date: 2024-01-04T09:00:00Z }
  - number: PART-003-ALT
    name: Gel saddle
    revisions:
      - version: A
        status: draft
        iterations:
          - { iteration: 1, checkin_date: 2024-01-04T09:00:00Z }
  - number: PART-004
    name: Bell
    revisions:
      - version: A
        status: draft
        iterations:
          - { iteration: 1, checkin_date: 2024-01-04T09:00:00Z }
  - number: PART-007
    name: Prototype
    revisions:
      - version: A
        status: draft
        checked_out_by: bob
        iterations:
          - { iteration: 1 }
documents:
  - id: DOC-1
    version: A
    title: Assembly drawing
    checked_out_by: carol
    iterations:
      - { iteration: 1, checkin_date: 2024-02-15T09:00:00Z }
      - { iteration: 2 }
"#;

/// Lamp whose shade changes with date and serial number
pub const LAMP_STRUCTURE: &str = r#"
workspace: acme
configuration_items:
  - id: LAMP
    designated_product: LAMP-1
  - id: OTHER
    designated_product: LAMP-1
parts:
  - number: LAMP-1
    revisions:
      - version: A
        status: released
        iterations:
          - iteration: 1
            checkin_date: 2024-01-01T09:00:00Z
            components:
              - { id: 1, component: SHADE, amount: 1 }
        effectivities:
          - name: all-dates
            configuration_item: { id: LAMP }
            kind: date
          - name: all-serials
            configuration_item: { id: LAMP }
            kind: serial_number
  - number: SHADE
    revisions:
      - version: A
        status: released
        iterations:
          - { iteration: 1, checkin_date: 2024-01-01T09:00:00Z }
        effectivities:
          - name: first-run
            configuration_item: { id: LAMP }
            kind: date
            start: 2024-01-01
            end: 2024-06-30
          - name: early-serials
            configuration_item: { id: LAMP }
            kind: serial_number
            start: "1"
            end: "99"
      - version: B
        status: released
        iterations:
          - { iteration: 1, checkin_date: 2024-06-01T09:00:00Z }
        effectivities:
          - name: second-run
            configuration_item: { id: LAMP }
            kind: date
            start: 2024-07-01
          - name: later-serials
            configuration_item: { id: LAMP }
            kind: serial_number
            start: "100"
"#;

/// Parse a fixture into a catalog
pub fn catalog(structure: &str) -> Catalog {
    let file: StructureFile = parse_yaml(structure, "fixture.yaml").unwrap();
    Catalog::from_structure(file)
}

/// Write a fixture into a fresh temp directory
pub fn write_structure(structure: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("structure.yaml");
    std::fs::write(&path, structure).unwrap();
    (tmp, path)
}
