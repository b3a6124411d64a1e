//! Shared utilities for the ballot workspace.

pub mod logging;
pub mod time;

pub use logging::{init_logging, LogFormat};
pub use time::{format_duration_ms, format_until};
