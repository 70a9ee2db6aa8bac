//! Core domain + dispatch logic for banofbot.
//!
//! This crate is intentionally framework-agnostic. Telegram, chat persistence and
//! the vote/ban workflow live behind ports (traits) implemented in adapter crates.

pub mod analytics;
pub mod callback;
pub mod classify;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod messaging;
pub mod ports;
pub mod startup;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::{Error, Result};
