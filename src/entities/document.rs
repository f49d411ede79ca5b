//! Document entity types - only what baselines need to capture linked documents

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a document revision
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentRevisionKey {
    #[serde(default)]
    pub workspace_id: String,
    pub id: String,
    pub version: String,
}

impl DocumentRevisionKey {
    pub fn new(
        workspace_id: impl Into<String>,
        id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            id: id.into(),
            version: version.into(),
        }
    }
}

impl std::fmt::Display for DocumentRevisionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.id, self.version)
    }
}

/// Identity of one concrete document iteration
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentIterationKey {
    pub workspace_id: String,
    pub id: String,
    pub version: String,
    pub iteration: u32,
}

impl DocumentIterationKey {
    pub fn revision(&self) -> DocumentRevisionKey {
        DocumentRevisionKey::new(&self.workspace_id, &self.id, &self.version)
    }
}

impl std::fmt::Display for DocumentIterationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.id, self.version, self.iteration)
    }
}

/// Reference from a part iteration to a document revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLink {
    pub target: DocumentRevisionKey,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentIteration {
    pub iteration: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkin_date: Option<DateTime<Utc>>,
}

/// A document revision and its iterations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRevision {
    #[serde(default)]
    pub workspace_id: String,

    pub id: String,

    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_out_by: Option<String>,

    #[serde(default)]
    pub iterations: Vec<DocumentIteration>,
}

impl DocumentRevision {
    pub fn key(&self) -> DocumentRevisionKey {
        DocumentRevisionKey::new(&self.workspace_id, &self.id, &self.version)
    }

    /// Last iteration that is not the holder's working copy
    pub fn last_checked_in_iteration(&self) -> Option<DocumentIterationKey> {
        let visible = if self.checked_out_by.is_some() {
            self.iterations.len().saturating_sub(1)
        } else {
            self.iterations.len()
        };
        self.iterations[..visible]
            .iter()
            .rev()
            .find(|it| it.checkin_date.is_some())
            .map(|it| DocumentIterationKey {
                workspace_id: self.workspace_id.clone(),
                id: self.id.clone(),
                version: self.version.clone(),
                iteration: it.iteration,
            })
    }
}
