//! Discord integration: gateway handler, commands, history reads, and the
//! idempotent publisher.

pub mod bot;
pub mod commands;
pub mod history;
pub mod publisher;

pub use bot::{Handler, Refresher};
