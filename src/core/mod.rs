//! Core module - configuration and the batch record store

pub mod config;
pub mod store;

pub use config::Config;
pub use store::{RecordStore, SqliteStore, StoreError};
