//! Entity type definitions

pub mod baseline;
pub mod configuration;
pub mod document;
pub mod effectivity;
pub mod part;

pub use baseline::{BaselineSnapshot, BaselineType, ProductBaseline};
pub use configuration::{ConfigurationItem, ConfigurationItemKey, ProductConfiguration};
pub use document::{DocumentIterationKey, DocumentLink, DocumentRevision, DocumentRevisionKey};
pub use effectivity::{
    Effectivity, EffectivityContext, EffectivityKind, EffectivityRange, EffectivityValue,
};
pub use part::{
    IterationRef, PartIteration, PartIterationKey, PartLink, PartMaster, PartRevision,
    PartSubstituteLink, RevisionStatus,
};
