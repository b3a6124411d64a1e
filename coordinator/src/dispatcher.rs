//! Emails each resolved voter proof exactly once.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use ballot_adapters::{Notifier, TemplateParams};
use ballot_types::{ElectionId, NationalId, ProofHash};
use tokio::sync::{mpsc, watch};

use crate::events::ProofResolved;
use crate::state::StoreState;
use crate::status::OperationStatus;

type DeliveryKey = (ElectionId, NationalId, ProofHash);

/// Delivery keys remembered before the oldest are forgotten.
pub const DELIVERY_HISTORY_LIMIT: usize = 10_000;

/// Sole consumer of [`ProofResolved`] events.
///
/// Delivery is at-most-once per `(election, national id, proof)`: the key is
/// recorded before the send, so a failed send is reported through
/// `voter_email` and never retried. Only the most recent
/// [`DELIVERY_HISTORY_LIMIT`] keys are remembered; a proof resolved again
/// after its key has been evicted is emailed again.
pub struct NotificationDispatcher {
    receiver: mpsc::UnboundedReceiver<ProofResolved>,
    notifier: Arc<dyn Notifier>,
    state: Arc<watch::Sender<StoreState>>,
    from_name: String,
    /// Outcome of the single attempt made for each key.
    delivered: HashMap<DeliveryKey, OperationStatus>,
    /// Insertion order of `delivered`, oldest first.
    history: VecDeque<DeliveryKey>,
    history_limit: usize,
}

impl NotificationDispatcher {
    pub(crate) fn new(
        receiver: mpsc::UnboundedReceiver<ProofResolved>,
        notifier: Arc<dyn Notifier>,
        state: Arc<watch::Sender<StoreState>>,
        from_name: String,
    ) -> Self {
        Self {
            receiver,
            notifier,
            state,
            from_name,
            delivered: HashMap::new(),
            history: VecDeque::new(),
            history_limit: DELIVERY_HISTORY_LIMIT,
        }
    }

    #[cfg(test)]
    fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    fn remember(&mut self, key: DeliveryKey) {
        self.remember(key.clone());
        self.history.push_back(key);
        while self.history.len() > self.history_limit {
            if let Some(oldest) = self.history.pop_front() {
                self.delivered.remove(&oldest);
            }
        }
    }

    /// Process events until the store is dropped.
    pub async fn run(mut self) {
        tracing::debug!("notification dispatcher started");
        while let Some(event) = self.receiver.recv().await {
            self.dispatch(event).await;
        }
        tracing::debug!("notification dispatcher stopped");
    }

    /// Process every event already queued, without waiting for more.
    /// Returns how many events were taken off the queue.
    pub async fn drain(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(event) = self.receiver.try_recv() {
            self.dispatch(event).await;
            processed += 1;
        }
        processed
    }

    async fn dispatch(&mut self, event: ProofResolved) {
        let key = event.delivery_key();
        if let Some(&previous) = self.delivered.get(&key) {
            tracing::debug!(
                election_id = %event.registration.election_id,
                national_id = %event.registration.national_id,
                "proof already emailed; skipping"
            );
            self.state.send_modify(|s| {
                if s.voter_email.is_pending() {
                    s.voter_email = previous;
                }
            });
            return;
        }
        self.remember(key.clone());

        let params = TemplateParams {
            to_email: event.registration.email.clone(),
            from_name: self.from_name.clone(),
            to_name: event.registration.name.clone(),
            message: event.proof.as_str().to_string(),
        };

        let status = match self.notifier.send(&params).await {
            Ok(()) => {
                tracing::info!(
                    election_id = %event.registration.election_id,
                    to = %params.to_email,
                    "proof emailed to voter"
                );
                OperationStatus::Succeeded
            }
            Err(e) => {
                tracing::warn!(
                    election_id = %event.registration.election_id,
                    to = %params.to_email,
                    error = %e,
                    "failed to email voter proof"
                );
                OperationStatus::Failed
            }
        };
        self.delivered.insert(key, status);
        self.state.send_modify(|s| s.voter_email = status);
    }
}
