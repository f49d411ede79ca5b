//! Effectivity entity types - validity windows attached to part revisions

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entities::configuration::ConfigurationItemKey;

/// Kind of validity window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectivityKind {
    Date,
    SerialNumber,
    Lot,
}

impl std::fmt::Display for EffectivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectivityKind::Date => write!(f, "date"),
            EffectivityKind::SerialNumber => write!(f, "serial_number"),
            EffectivityKind::Lot => write!(f, "lot"),
        }
    }
}

/// Start/end bounds of an effectivity; a missing bound leaves that side open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectivityRange {
    Date {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<NaiveDate>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end: Option<NaiveDate>,
    },
    SerialNumber {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end: Option<String>,
    },
    Lot {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end: Option<String>,
    },
}

impl EffectivityRange {
    pub fn kind(&self) -> EffectivityKind {
        match self {
            EffectivityRange::Date { .. } => EffectivityKind::Date,
            EffectivityRange::SerialNumber { .. } => EffectivityKind::SerialNumber,
            EffectivityRange::Lot { .. } => EffectivityKind::Lot,
        }
    }
}

/// A validity window tying a revision to a configuration item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effectivity {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Configuration item this effectivity applies to
    pub configuration_item: ConfigurationItemKey,

    #[serde(flatten)]
    pub range: EffectivityRange,
}

impl Effectivity {
    pub fn kind(&self) -> EffectivityKind {
        self.range.kind()
    }
}

/// The value a resolution is evaluated at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EffectivityValue {
    Date(NaiveDate),
    SerialNumber(String),
    Lot(String),
}

impl EffectivityValue {
    pub fn kind(&self) -> EffectivityKind {
        match self {
            EffectivityValue::Date(_) => EffectivityKind::Date,
            EffectivityValue::SerialNumber(_) => EffectivityKind::SerialNumber,
            EffectivityValue::Lot(_) => EffectivityKind::Lot,
        }
    }
}

impl std::fmt::Display for EffectivityValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectivityValue::Date(d) => write!(f, "{}", d),
            EffectivityValue::SerialNumber(s) => write!(f, "serial {}", s),
            EffectivityValue::Lot(l) => write!(f, "lot {}", l),
        }
    }
}

/// Resolution context an effectivity is tested against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectivityContext {
    pub configuration_item: ConfigurationItemKey,
    pub value: EffectivityValue,
}

impl EffectivityContext {
    pub fn new(configuration_item: ConfigurationItemKey, value: EffectivityValue) -> Self {
        Self {
            configuration_item,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effectivity_yaml_shape() {
        let yaml = r#"
name: from-2024
configuration_item:
  workspace_id: ws
  id: CI-1
kind: date
start: 2024-01-01
"#;
        let eff: Effectivity = serde_yml::from_str(yaml).unwrap();
        assert_eq!(eff.kind(), EffectivityKind::Date);
        assert_eq!(
            eff.range,
            EffectivityRange::Date {
                start: NaiveDate::from_ymd_opt(2024, 1, 1),
                end: None,
            }
        );
    }

    #[test]
    fn test_serial_range_yaml_shape() {
        let yaml = r#"
name: early-units
configuration_item: { workspace_id: ws, id: CI-1 }
kind: serial_number
start: "1"
end: "100"
"#;
        let eff: Effectivity = serde_yml::from_str(yaml).unwrap();
        assert_eq!(eff.kind(), EffectivityKind::SerialNumber);
    }
}
