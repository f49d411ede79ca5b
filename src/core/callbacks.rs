//! Resolution callbacks - how a caller adjudicates ambiguous or unresolved cases
//!
//! The resolver never guesses. Whenever a spec cannot settle a part or a BOM
//! position on its own, the callbacks decide: abort with [`NotAllowed`], pick
//! a value, or record the situation and let the walk continue.

use serde::Serialize;

use crate::core::error::NotAllowed;
use crate::core::path::{alternative_keys, path_key, PathStep};
use crate::entities::part::{IterationRef, PartIterationKey, PartMaster};

/// Hooks invoked by [`StructureResolver`](crate::core::resolver::StructureResolver)
///
/// `parts` arguments list the iterations retained along the path, root first.
pub trait ResolveCallbacks {
    /// Several iterations are eligible; return the one to use, or `None` to
    /// leave the part out.
    fn on_indeterminate_version(
        &mut self,
        master: &PartMaster,
        candidates: &[IterationRef<'_>],
    ) -> Result<Option<PartIterationKey>, NotAllowed>;

    /// No iteration is eligible; return one to use, or `None` to leave the
    /// part out.
    fn on_unresolved_version(
        &mut self,
        master: &PartMaster,
    ) -> Result<Option<PartIterationKey>, NotAllowed>;

    /// Several alternatives are eligible at the end of `path`; all of them
    /// are walked if this returns.
    fn on_indeterminate_path(
        &mut self,
        path: &[PathStep],
        parts: &[PartIterationKey],
    ) -> Result<(), NotAllowed>;

    /// A mandatory position has nothing to follow.
    fn on_unresolved_path(
        &mut self,
        path: &[PathStep],
        parts: &[PartIterationKey],
    ) -> Result<(), NotAllowed>;

    /// An optional position is about to be walked.
    fn on_optional_path(
        &mut self,
        path: &[PathStep],
        parts: &[PartIterationKey],
    ) -> Result<(), NotAllowed>;

    /// A node was reached; `false` stops descent below it.
    fn on_path_walk(
        &mut self,
        path: &[PathStep],
        parts: &[PartIterationKey],
    ) -> Result<bool, NotAllowed>;
}

/// Callbacks that refuse every ambiguous or unresolved case
///
/// Optional positions retained by the configuration spec are accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictCallbacks;

impl ResolveCallbacks for StrictCallbacks {
    fn on_indeterminate_version(
        &mut self,
        master: &PartMaster,
        candidates: &[IterationRef<'_>],
    ) -> Result<Option<PartIterationKey>, NotAllowed> {
        Err(NotAllowed::IndeterminateVersion {
            number: master.number.clone(),
            candidates: candidates.iter().map(|c| c.key().to_string()).collect(),
        })
    }

    fn on_unresolved_version(
        &mut self,
        master: &PartMaster,
    ) -> Result<Option<PartIterationKey>, NotAllowed> {
        Err(NotAllowed::UnresolvedVersion {
            number: master.number.clone(),
        })
    }

    fn on_indeterminate_path(
        &mut self,
        path: &[PathStep],
        _parts: &[PartIterationKey],
    ) -> Result<(), NotAllowed> {
        Err(NotAllowed::IndeterminatePath {
            path: path_key(path),
        })
    }

    fn on_unresolved_path(
        &mut self,
        path: &[PathStep],
        _parts: &[PartIterationKey],
    ) -> Result<(), NotAllowed> {
        Err(NotAllowed::UnresolvedPath {
            path: path_key(path),
        })
    }

    fn on_optional_path(
        &mut self,
        _path: &[PathStep],
        _parts: &[PartIterationKey],
    ) -> Result<(), NotAllowed> {
        Ok(())
    }

    fn on_path_walk(
        &mut self,
        _path: &[PathStep],
        _parts: &[PartIterationKey],
    ) -> Result<bool, NotAllowed> {
        Ok(true)
    }
}

/// Kind of decision a structure leaves open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceKind {
    Version,
    Substitute,
    Optional,
    UnresolvedVersion,
    UnresolvedPath,
}

impl std::fmt::Display for ChoiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChoiceKind::Version => write!(f, "version"),
            ChoiceKind::Substitute => write!(f, "substitute"),
            ChoiceKind::Optional => write!(f, "optional"),
            ChoiceKind::UnresolvedVersion => write!(f, "unresolved-version"),
            ChoiceKind::UnresolvedPath => write!(f, "unresolved-path"),
        }
    }
}

/// One open decision found while walking a structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub kind: ChoiceKind,

    /// Part number for version choices, path key for path choices
    pub subject: String,

    /// Available options: iteration keys or path keys
    pub options: Vec<String>,
}

/// Callbacks that record every open decision and keep walking
///
/// Version ambiguities resolve to the last candidate so the structure below
/// it is still explored.
#[derive(Debug, Default)]
pub struct ChoiceCollector {
    choices: Vec<Choice>,
}

impl ChoiceCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn into_choices(self) -> Vec<Choice> {
        self.choices
    }

    fn record(&mut self, kind: ChoiceKind, subject: String, options: Vec<String>) {
        let choice = Choice {
            kind,
            subject,
            options,
        };
        if !self.choices.contains(&choice) {
            self.choices.push(choice);
        }
    }
}

impl ResolveCallbacks for ChoiceCollector {
    fn on_indeterminate_version(
        &mut self,
        master: &PartMaster,
        candidates: &[IterationRef<'_>],
    ) -> Result<Option<PartIterationKey>, NotAllowed> {
        self.record(
            ChoiceKind::Version,
            master.number.clone(),
            candidates.iter().map(|c| c.key().to_string()).collect(),
        );
        Ok(candidates.last().map(IterationRef::key))
    }

    fn on_unresolved_version(
        &mut self,
        master: &PartMaster,
    ) -> Result<Option<PartIterationKey>, NotAllowed> {
        self.record(ChoiceKind::UnresolvedVersion, master.number.clone(), Vec::new());
        Ok(None)
    }

    fn on_indeterminate_path(
        &mut self,
        path: &[PathStep],
        _parts: &[PartIterationKey],
    ) -> Result<(), NotAllowed> {
        let options = alternative_keys(path)
            .into_iter()
            .map(|(_, key)| key)
            .collect();
        self.record(ChoiceKind::Substitute, path_key(path), options);
        Ok(())
    }

    fn on_unresolved_path(
        &mut self,
        path: &[PathStep],
        _parts: &[PartIterationKey],
    ) -> Result<(), NotAllowed> {
        self.record(ChoiceKind::UnresolvedPath, path_key(path), Vec::new());
        Ok(())
    }

    fn on_optional_path(
        &mut self,
        path: &[PathStep],
        _parts: &[PartIterationKey],
    ) -> Result<(), NotAllowed> {
        self.record(ChoiceKind::Optional, path_key(path), Vec::new());
        Ok(())
    }

    fn on_path_walk(
        &mut self,
        _path: &[PathStep],
        _parts: &[PartIterationKey],
    ) -> Result<bool, NotAllowed> {
        Ok(true)
    }
}
