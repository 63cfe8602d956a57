//! CLI command implementations

pub mod config;
pub mod explain;
pub mod search;
pub mod serving;
