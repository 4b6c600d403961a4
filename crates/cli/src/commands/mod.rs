//! CLI command implementations

pub mod analyze;
pub mod predict;
pub mod status;
