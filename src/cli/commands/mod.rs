//! CLI command implementations

pub mod ask;
pub mod batch;
pub mod chat;
pub mod completions;
pub mod config;
pub mod seed;
