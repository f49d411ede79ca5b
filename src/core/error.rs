//! Error types for structure resolution and baselines

use thiserror::Error;

use crate::entities::document::DocumentRevisionKey;
use crate::entities::part::PartIterationKey;

/// Failures raised by a part or document data source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Part {number} not found in workspace {workspace_id}")]
    PartNotFound {
        workspace_id: String,
        number: String,
    },

    #[error("Document {key} not found in workspace {}", key.workspace_id)]
    DocumentNotFound { key: DocumentRevisionKey },
}

/// A resolution situation a caller refused to accept
///
/// Raised by [`ResolveCallbacks`](crate::core::callbacks::ResolveCallbacks)
/// implementations to abort the walk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotAllowed {
    #[error("Part {number} has several eligible iterations: {}", candidates.join(", "))]
    IndeterminateVersion {
        number: String,
        candidates: Vec<String>,
    },

    #[error("No eligible iteration for part {number}")]
    UnresolvedVersion { number: String },

    #[error("Several links are eligible at path {path}")]
    IndeterminatePath { path: String },

    #[error("No link is eligible at path {path}")]
    UnresolvedPath { path: String },

    #[error("Optional link at path {path} needs a decision")]
    OptionalPath { path: String },
}

/// Errors that can occur while resolving a product structure
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Cyclic structure: part {number} is its own ancestor at path {path}")]
    CyclicStructure { number: String, path: String },

    #[error("{0}")]
    NotAllowed(#[from] NotAllowed),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("Iteration {key} chosen for part {number} does not exist")]
    UnknownIteration {
        number: String,
        key: PartIterationKey,
    },
}

/// Errors that can occur while assembling a baseline
#[derive(Debug, Error)]
pub enum BaselineError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("Retained iteration {0} is not present in the part catalog")]
    MissingIteration(PartIterationKey),

    #[error("Part {number} is retained with two iterations: {first} and {second}")]
    ConflictingIterations {
        number: String,
        first: PartIterationKey,
        second: PartIterationKey,
    },
}
