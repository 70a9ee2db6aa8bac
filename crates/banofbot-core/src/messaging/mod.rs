//! Platform-neutral message model and the outbound messaging port.

pub mod port;
pub mod types;
