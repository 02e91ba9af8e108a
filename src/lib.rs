//! batchbot: pharmaceutical batch tracking assistant
//!
//! Turns plain-language questions about batches into record store lookups
//! and templated answers, with a conversational model for everything else.

pub mod cli;
pub mod core;
pub mod fallback;
pub mod nlu;
pub mod pipeline;
