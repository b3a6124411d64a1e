use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("{service} returned HTTP {status}")]
    Status { service: &'static str, status: u16 },

    #[error("ledger rejected {operation}: {reason}")]
    Rejected { operation: String, reason: String },

    #[error("invalid {what} response: {reason}")]
    Decode { what: &'static str, reason: String },

    #[error("notification failed: {0}")]
    Notification(String),

    #[error("upload failed: {0}")]
    Upload(String),
}

impl AdapterError {
    pub(crate) fn decode(what: &'static str, e: impl std::fmt::Display) -> Self {
        Self::Decode {
            what,
            reason: e.to_string(),
        }
    }
}
