//! Validation error type shared across crates.

use thiserror::Error;

use crate::time::Timestamp;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BallotError {
    #[error("election must start before it ends (start {start}, end {end})")]
    InvalidSchedule { start: Timestamp, end: Timestamp },

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("not a base-10 integer: {0:?}")]
    InvalidNumber(String),

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("invalid wallet address: {0}")]
    InvalidAddress(String),
}
