//! Data source traits the resolver and baseline assembler read from

use std::sync::Arc;

use crate::core::error::LookupError;
use crate::entities::document::{DocumentRevision, DocumentRevisionKey};
use crate::entities::part::PartMaster;

/// Source of part masters, usually backed by the persistence layer
pub trait PartMasterLookup {
    /// Fetch a part master; fails with [`LookupError::PartNotFound`] if absent
    fn part_master(&self, workspace_id: &str, number: &str)
        -> Result<Arc<PartMaster>, LookupError>;
}

/// Source of document revisions
pub trait DocumentLookup {
    fn document_revision(
        &self,
        key: &DocumentRevisionKey,
    ) -> Result<Arc<DocumentRevision>, LookupError>;
}
