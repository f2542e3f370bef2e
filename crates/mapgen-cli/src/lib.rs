//! CLI library components for mapgen.

pub mod logging;
pub mod report;
pub mod script;
