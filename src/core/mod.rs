//! Core module - resolution engine and supporting services

pub mod baseline;
pub mod callbacks;
pub mod catalog;
pub mod component;
pub mod config;
pub mod effectivity;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod path;
pub mod resolver;
pub mod spec;

pub use baseline::BaselineAssembler;
pub use callbacks::{Choice, ChoiceCollector, ChoiceKind, ResolveCallbacks, StrictCallbacks};
pub use catalog::{Catalog, StructureFile};
pub use component::Component;
pub use config::{Config, ConfigError};
pub use effectivity::{is_effective, natural_cmp};
pub use error::{BaselineError, LookupError, NotAllowed, ResolveError};
pub use logging::init_tracing;
pub use lookup::{DocumentLookup, PartMasterLookup};
pub use path::{path_key, LinkChoice, PathStep};
pub use resolver::StructureResolver;
pub use spec::{
    BaselineCreationSpec, ConfigSpec, EffectivitySpec, IterationSelection, LatestCheckedInSpec,
    LinkRetention, LinkSelection, PolicyKind, ReleasedSpec, ResolvedCollectionSpec, RetainedSets,
};
