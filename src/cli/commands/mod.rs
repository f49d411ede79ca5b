//! CLI command implementations

pub mod baseline;
pub mod bom;
pub mod choices;
pub mod completions;
pub mod resolve;
pub mod validate;
