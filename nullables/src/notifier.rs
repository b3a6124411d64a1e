//! Nullable notifier: record messages without sending them.

use async_trait::async_trait;
use ballot_adapters::{AdapterError, Notifier, TemplateParams};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// A test notifier that records messages instead of emailing them.
pub struct NullNotifier {
    sent: Mutex<Vec<TemplateParams>>,
    failing: AtomicBool,
}

impl NullNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// A notifier whose every send fails.
    pub fn failing() -> Self {
        let notifier = Self::new();
        notifier.set_failing(true);
        notifier
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Get all delivered messages (for assertions).
    pub fn sent(&self) -> Vec<TemplateParams> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for NullNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for NullNotifier {
    async fn send(&self, params: &TemplateParams) -> Result<(), AdapterError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AdapterError::Notification(format!(
                "null notifier refused delivery to {}",
                params.to_email
            )));
        }
        self.sent.lock().unwrap().push(params.clone());
        Ok(())
    }
}
