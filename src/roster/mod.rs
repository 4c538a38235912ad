//! The roster-needs aggregation pipeline.
//!
//! Scans team channels for signup links, resolves them into signup sets,
//! classifies entries into canonical role buckets, and renders the needs
//! artifacts. Discord transport lives in the `discord` module.

pub mod classify;
pub mod gaps;
pub mod pipeline;
pub mod render;
pub mod resolver;
pub mod scanner;

pub use pipeline::{Pipeline, RenderedOutputs, TeamSummary};
pub use scanner::HistorySource;
