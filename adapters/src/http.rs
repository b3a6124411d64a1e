//! Shared `reqwest` client construction.

use std::time::Duration;

use crate::error::AdapterError;

pub(crate) fn build_client() -> Result<reqwest::Client, AdapterError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| AdapterError::Transport(format!("failed to create HTTP client: {e}")))
}

pub(crate) fn check_status(
    service: &'static str,
    response: &reqwest::Response,
) -> Result<(), AdapterError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(AdapterError::Status {
            service,
            status: response.status().as_u16(),
        })
    }
}
