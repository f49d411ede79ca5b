//! TSR: Tessera Structure Resolver
//!
//! Resolves product structures against configuration policies (latest,
//! released, effectivity, baseline) and captures the result as a replayable
//! product baseline.

pub mod cli;
pub mod core;
pub mod entities;
pub mod yaml;
