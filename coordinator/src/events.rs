//! Events published by the store for its single downstream consumer.

use ballot_types::{ElectionId, NationalId, ProofHash, VoterRegistration};

/// The ledger issued a proof value to a freshly registered voter.
///
/// Published once per successful lookup onto an unbounded channel whose only
/// receiver is the [`crate::NotificationDispatcher`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofResolved {
    pub registration: VoterRegistration,
    pub proof: ProofHash,
}

impl ProofResolved {
    /// Identity used for at-most-once delivery.
    pub fn delivery_key(&self) -> (ElectionId, NationalId, ProofHash) {
        (
            self.registration.election_id,
            self.registration.national_id,
            self.proof.clone(),
        )
    }
}
