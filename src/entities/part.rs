//! Part entity types - masters, revisions, iterations and usage links

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::document::DocumentLink;
use crate::entities::effectivity::Effectivity;

/// Lifecycle status of a part revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum RevisionStatus {
    #[default]
    Draft,
    Released,
    Obsolete,
}

impl std::fmt::Display for RevisionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RevisionStatus::Draft => write!(f, "draft"),
            RevisionStatus::Released => write!(f, "released"),
            RevisionStatus::Obsolete => write!(f, "obsolete"),
        }
    }
}

impl std::str::FromStr for RevisionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(RevisionStatus::Draft),
            "released" => Ok(RevisionStatus::Released),
            "obsolete" => Ok(RevisionStatus::Obsolete),
            _ => Err(format!(
                "Invalid revision status: {}. Use draft, released, or obsolete",
                s
            )),
        }
    }
}

/// Identity of one concrete part iteration
///
/// Ordered by workspace, part number, version and iteration so that sets of
/// keys iterate deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PartIterationKey {
    pub workspace_id: String,
    pub number: String,
    pub version: String,
    pub iteration: u32,
}

impl PartIterationKey {
    pub fn new(
        workspace_id: impl Into<String>,
        number: impl Into<String>,
        version: impl Into<String>,
        iteration: u32,
    ) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            number: number.into(),
            version: version.into(),
            iteration,
        }
    }
}

impl std::fmt::Display for PartIterationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.number, self.version, self.iteration)
    }
}

/// A substitute that may replace the nominal target of a usage link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartSubstituteLink {
    /// Link identifier, unique within the workspace
    pub id: u64,

    /// Number of the substitute part
    pub substitute: String,

    #[serde(default = "default_amount")]
    pub amount: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_description: Option<String>,
}

/// A usage link from an assembly iteration to a component part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartLink {
    /// Link identifier, unique within the workspace
    pub id: u64,

    /// Number of the nominal component part
    pub component: String,

    /// Quantity used at this position
    #[serde(default = "default_amount")]
    pub amount: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Optional positions are only kept when a configuration retains them
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_description: Option<String>,

    /// Alternatives, in declared order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub substitutes: Vec<PartSubstituteLink>,
}

fn default_amount() -> f64 {
    1.0
}

impl PartLink {
    /// Create a mandatory link without substitutes
    pub fn new(id: u64, component: impl Into<String>, amount: f64) -> Self {
        Self {
            id,
            component: component.into(),
            amount,
            unit: None,
            optional: false,
            reference_description: None,
            substitutes: Vec::new(),
        }
    }

    /// Mark the link as optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Append a substitute alternative
    pub fn with_substitute(mut self, id: u64, substitute: impl Into<String>, amount: f64) -> Self {
        self.substitutes.push(PartSubstituteLink {
            id,
            substitute: substitute.into(),
            amount,
            unit: None,
            reference_description: None,
        });
        self
    }
}

/// An immutable snapshot of a part revision's content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartIteration {
    /// Iteration number, starting at 1
    pub iteration: u32,

    /// When the iteration was checked in; absent for a working copy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkin_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Usage links, in declared order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<PartLink>,

    /// Documents referenced by this iteration
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_documents: Vec<DocumentLink>,
}

impl PartIteration {
    pub fn is_working_copy(&self) -> bool {
        self.checkin_date.is_none()
    }
}

/// A revision ("A", "B", ...) of a part master
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRevision {
    pub version: String,

    #[serde(default)]
    pub status: RevisionStatus,

    /// User holding the revision checked out, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_out_by: Option<String>,

    #[serde(default)]
    pub iterations: Vec<PartIteration>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effectivities: Vec<Effectivity>,
}

impl PartRevision {
    pub fn is_checked_out(&self) -> bool {
        self.checked_out_by.is_some()
    }

    pub fn is_released(&self) -> bool {
        self.status == RevisionStatus::Released
    }

    pub fn last_iteration(&self) -> Option<&PartIteration> {
        self.iterations.last()
    }

    /// Last iteration visible to other users
    ///
    /// A checked-out revision's trailing iteration is the holder's working copy
    /// and is skipped.
    pub fn last_checked_in_iteration(&self) -> Option<&PartIteration> {
        let visible = if self.is_checked_out() {
            self.iterations.len().saturating_sub(1)
        } else {
            self.iterations.len()
        };
        self.iterations[..visible]
            .iter()
            .rev()
            .find(|it| !it.is_working_copy())
    }

    pub fn iteration(&self, number: u32) -> Option<&PartIteration> {
        self.iterations.iter().find(|it| it.iteration == number)
    }
}

/// Workspace-scoped part identity owning its revisions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartMaster {
    /// Filled from the enclosing structure file when omitted
    #[serde(default)]
    pub workspace_id: String,

    pub number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Revisions in creation order
    #[serde(default)]
    pub revisions: Vec<PartRevision>,
}

impl PartMaster {
    pub fn last_revision(&self) -> Option<&PartRevision> {
        self.revisions.last()
    }

    pub fn revision(&self, version: &str) -> Option<&PartRevision> {
        self.revisions.iter().find(|r| r.version == version)
    }

    /// Look up the iteration a key points at, if it belongs to this master
    pub fn iteration(&self, key: &PartIterationKey) -> Option<IterationRef<'_>> {
        if key.workspace_id != self.workspace_id || key.number != self.number {
            return None;
        }
        let revision = self.revision(&key.version)?;
        let iteration = revision.iteration(key.iteration)?;
        Some(IterationRef {
            master: self,
            revision,
            iteration,
        })
    }

    /// Check the structural invariants of every revision
    ///
    /// Returns one message per violation.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for revision in &self.revisions {
            for (idx, it) in revision.iterations.iter().enumerate() {
                let expected = idx as u32 + 1;
                if it.iteration != expected {
                    problems.push(format!(
                        "{}-{}: iteration {} found where {} was expected",
                        self.number, revision.version, it.iteration, expected
                    ));
                }
                let is_last = idx + 1 == revision.iterations.len();
                if it.is_working_copy() && !(is_last && revision.is_checked_out()) {
                    problems.push(format!(
                        "{}-{}: iteration {} is not checked in and is not the working copy of a checked-out revision",
                        self.number, revision.version, it.iteration
                    ));
                }
            }
        }
        problems
    }
}

/// Borrowed view of an iteration together with its owners
#[derive(Debug, Clone, Copy)]
pub struct IterationRef<'a> {
    pub master: &'a PartMaster,
    pub revision: &'a PartRevision,
    pub iteration: &'a PartIteration,
}

impl<'a> IterationRef<'a> {
    pub fn new(
        master: &'a PartMaster,
        revision: &'a PartRevision,
        iteration: &'a PartIteration,
    ) -> Self {
        Self {
            master,
            revision,
            iteration,
        }
    }

    pub fn key(&self) -> PartIterationKey {
        PartIterationKey::new(
            &self.master.workspace_id,
            &self.master.number,
            &self.revision.version,
            self.iteration.iteration,
        )
    }
}
