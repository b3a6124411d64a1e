//! The coordination store. Sole owner of election, voter, candidate and
//! vote state, and the only component that writes to the ledger.
//!
//! State is published through a `tokio::sync::watch` channel. Every
//! operation runs its remote calls to completion before touching state and
//! absorbs failures into a tagged status plus a `warn!` log.

use std::sync::Arc;

use ballot_adapters::{ElectionContract, LedgerClient, Notifier, ObjectStorage};
use ballot_types::{
    Candidate, CandidateHash, CandidateRegistration, Clock, ElectionId, IndexedElection,
    NewElection, ProofHash, SymbolFile, Timestamp, VoterRegistration,
};
use tokio::sync::{mpsc, watch};

use crate::classifier::classify;
use crate::dispatcher::NotificationDispatcher;
use crate::error::CoordinatorError;
use crate::events::ProofResolved;
use crate::state::StoreState;
use crate::status::{Operation, OperationStatus, VoteStatus};

/// External collaborators the store drives.
#[derive(Clone)]
pub struct Collaborators {
    pub ledger: Arc<dyn LedgerClient>,
    pub notifier: Arc<dyn Notifier>,
    pub storage: Arc<dyn ObjectStorage>,
    pub clock: Arc<dyn Clock>,
}

pub struct ElectionStore {
    contract: ElectionContract,
    storage: Arc<dyn ObjectStorage>,
    clock: Arc<dyn Clock>,
    state: Arc<watch::Sender<StoreState>>,
    proofs: mpsc::UnboundedSender<ProofResolved>,
}

impl ElectionStore {
    /// Build the store and the dispatcher that consumes its proof events.
    ///
    /// `from_name` is the sender name placed in every voter email.
    pub fn new(
        collaborators: Collaborators,
        from_name: impl Into<String>,
    ) -> (Self, NotificationDispatcher) {
        let (state, _) = watch::channel(StoreState::default());
        let state = Arc::new(state);
        let (proofs, proof_rx) = mpsc::unbounded_channel();

        let dispatcher = NotificationDispatcher::new(
            proof_rx,
            collaborators.notifier,
            Arc::clone(&state),
            from_name.into(),
        );
        let store = Self {
            contract: ElectionContract::new(collaborators.ledger),
            storage: collaborators.storage,
            clock: collaborators.clock,
            state,
            proofs,
        };
        (store, dispatcher)
    }

    /// Current published state.
    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    fn update(&self, f: impl FnOnce(&mut StoreState)) {
        self.state.send_modify(f);
    }

    fn finish(
        &self,
        operation: Operation,
        outcome: Result<(), CoordinatorError>,
    ) -> OperationStatus {
        let status = match outcome {
            Ok(()) => {
                tracing::info!(operation = operation.as_str(), "operation succeeded");
                OperationStatus::Succeeded
            }
            Err(e) => {
                tracing::warn!(operation = operation.as_str(), error = %e, "operation failed");
                OperationStatus::Failed
            }
        };
        self.update(|s| s.set_status(operation, status));
        status
    }

    // ── Elections ───────────────────────────────────────────────────────

    /// Re-read the election list and recompute the buckets.
    ///
    /// The loading flag stays set for as long as the read is in flight. A
    /// failed read keeps the previous list.
    pub async fn refresh_elections(&self) {
        self.update(|s| s.elections_loading = true);
        match self.contract.get_elections().await {
            Ok(elections) => {
                let now = self.clock.now();
                let classified = classify(&elections, now);
                tracing::info!(
                    total = elections.len(),
                    previous = classified.previous.len(),
                    ongoing = classified.ongoing.len(),
                    upcoming = classified.upcoming.len(),
                    "election list refreshed"
                );
                self.update(|s| {
                    if let Some(selected) = &s.selected_election {
                        if let Some(fresh) = elections.get(selected.election_id.index()) {
                            s.selected_candidates = fresh.candidates.clone();
                        }
                    }
                    s.elections = elections;
                    s.classified = classified;
                    s.classified_at = now;
                    s.elections_loading = false;
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read election list");
                self.update(|s| s.elections_loading = false);
            }
        }
    }

    /// Recompute the buckets for the current instant without a ledger read.
    pub fn reclassify(&self) {
        let now = self.clock.now();
        self.update(|s| {
            s.classified = classify(&s.elections, now);
            s.classified_at = now;
        });
    }

    /// Create a new election. Submission time is appended from the clock.
    pub async fn initialize_ballot(&self, election: NewElection) -> OperationStatus {
        if let Err(e) = election.validate() {
            return self.finish(Operation::InitializeBallot, Err(e.into()));
        }
        self.update(|s| s.ballot = OperationStatus::Pending);

        let submitted_at = self.clock.now();
        let outcome = self
            .contract
            .create_election(&election, submitted_at)
            .await
            .map(drop)
            .map_err(CoordinatorError::from);
        let status = self.finish(Operation::InitializeBallot, outcome);
        if status == OperationStatus::Succeeded {
            self.refresh_elections().await;
        }
        status
    }

    // ── Voters ──────────────────────────────────────────────────────────

    /// Register a voter, then look up their proof value.
    ///
    /// The email status starts over at `Idle` for each registration. A
    /// resolved proof is handed to the dispatcher for emailing; a failed or
    /// empty lookup never changes the registration status.
    pub async fn register_voter(&self, voter: VoterRegistration) -> OperationStatus {
        if let Err(e) = voter.validate() {
            return self.finish(Operation::RegisterVoter, Err(e.into()));
        }
        self.update(|s| {
            s.voter_registration = OperationStatus::Pending;
            s.voter_email = OperationStatus::Idle;
        });

        let submitted_at = self.clock.now();
        if let Err(e) = self.contract.register_voter(&voter, submitted_at).await {
            return self.finish(Operation::RegisterVoter, Err(e.into()));
        }

        self.update(|s| s.voter_details = Some(voter.clone()));
        let status = self.finish(Operation::RegisterVoter, Ok(()));
        self.resolve_proof(voter).await;
        status
    }

    /// Repeat the proof lookup for the most recently registered voter.
    ///
    /// Useful when the ledger assigns proof values asynchronously. The
    /// dispatcher still delivers each value at most once.
    pub async fn resolve_voter_proof(&self) {
        let details = self.state.borrow().voter_details.clone();
        match details {
            Some(voter) => self.resolve_proof(voter).await,
            None => tracing::debug!("no registered voter to resolve a proof for"),
        }
    }

    async fn resolve_proof(&self, voter: VoterRegistration) {
        match self
            .contract
            .get_voter_hash(voter.election_id, voter.national_id)
            .await
        {
            Ok(Some(proof)) => {
                tracing::info!(
                    election_id = %voter.election_id,
                    national_id = %voter.national_id,
                    "voter proof resolved"
                );
                self.update(|s| s.voter_email = OperationStatus::Pending);
                let event = ProofResolved {
                    registration: voter,
                    proof,
                };
                if self.proofs.send(event).is_err() {
                    tracing::warn!("notification dispatcher is gone; proof email not sent");
                    self.update(|s| s.voter_email = OperationStatus::Failed);
                }
            }
            Ok(None) => {
                tracing::debug!(
                    election_id = %voter.election_id,
                    national_id = %voter.national_id,
                    "ledger has not assigned a proof yet"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "voter proof lookup failed");
                self.update(|s| s.voter_email = OperationStatus::Failed);
            }
        }
    }

    // ── Candidates ──────────────────────────────────────────────────────

    /// Upload the symbol image, then register the candidate with its URI.
    ///
    /// The write is never attempted unless the upload produced a URI.
    pub async fn register_candidate(
        &self,
        candidate: CandidateRegistration,
        symbol: SymbolFile,
    ) -> OperationStatus {
        if let Err(e) = candidate.validate() {
            return self.finish(Operation::RegisterCandidate, Err(e.into()));
        }
        self.update(|s| s.candidate_registration = OperationStatus::Pending);

        let outcome = self.upload_and_register(&candidate, symbol).await;
        let status = self.finish(Operation::RegisterCandidate, outcome);
        if status == OperationStatus::Succeeded {
            self.refresh_elections().await;
        }
        status
    }

    async fn upload_and_register(
        &self,
        candidate: &CandidateRegistration,
        symbol: SymbolFile,
    ) -> Result<(), CoordinatorError> {
        let uris = self.storage.upload(vec![symbol]).await?;
        let symbol_uri = uris.into_iter().next().ok_or(CoordinatorError::EmptyUpload)?;
        tracing::debug!(%symbol_uri, "symbol uploaded");

        let submitted_at = self.clock.now();
        self.contract
            .register_candidate(candidate, &symbol_uri, submitted_at)
            .await?;
        Ok(())
    }

    /// Focus an election for candidate lookup and voting.
    pub fn set_selected_election(&self, election: IndexedElection) {
        tracing::debug!(election_id = %election.election_id, "election selected");
        self.update(|s| s.selected_election = Some(election));
    }

    /// Publish the candidates of the election at position `election_id` in
    /// the loaded list (empty when there is no such election).
    pub fn get_election_candidate(&self, election_id: ElectionId) -> Vec<Candidate> {
        let mut found = Vec::new();
        self.update(|s| {
            found = s
                .elections
                .iter()
                .enumerate()
                .find(|(index, _)| *index == election_id.index())
                .map(|(_, election)| election.candidates.clone())
                .unwrap_or_default();
            s.selected_candidates = found.clone();
        });
        found
    }

    // ── Voting ──────────────────────────────────────────────────────────

    /// Cast a vote.
    ///
    /// A blank proof is refused with `Err(EmptyProof)` and leaves the
    /// published state untouched. An election that is unknown or outside
    /// `[start, end)` settles as `Ok(Failed)`. Neither reaches the ledger.
    pub async fn give_vote(
        &self,
        election_id: ElectionId,
        proof: ProofHash,
        candidate: CandidateHash,
    ) -> Result<VoteStatus, CoordinatorError> {
        if proof.is_blank() {
            tracing::warn!(%election_id, "vote aborted: proof hash is empty");
            return Err(CoordinatorError::EmptyProof);
        }
        let now = self.clock.now();
        if let Err(e) = self.check_vote_window(election_id, now) {
            tracing::warn!(%election_id, error = %e, "vote refused");
            self.update(|s| s.vote = VoteStatus::Failed);
            return Ok(VoteStatus::Failed);
        }

        self.update(|s| s.vote = VoteStatus::InProgress);
        let outcome = self
            .contract
            .give_vote(election_id, &proof, &candidate, now)
            .await;

        let status = match outcome {
            Ok(_) => {
                tracing::info!(%election_id, candidate = %candidate, "vote recorded");
                VoteStatus::Succeeded
            }
            Err(e) => {
                tracing::warn!(%election_id, error = %e, "vote rejected");
                VoteStatus::Failed
            }
        };
        self.update(|s| s.vote = status);
        if status == VoteStatus::Succeeded {
            self.refresh_elections().await;
        }
        Ok(status)
    }

    fn check_vote_window(
        &self,
        election_id: ElectionId,
        now: Timestamp,
    ) -> Result<(), CoordinatorError> {
        let state = self.state.borrow();
        let election = state
            .election(election_id.index())
            .ok_or(CoordinatorError::UnknownElection(election_id))?;
        if !election.is_open(now) {
            return Err(CoordinatorError::VotingClosed { election_id, now });
        }
        Ok(())
    }

    /// Reset a terminal status back to idle. In-flight statuses are left
    /// alone.
    pub fn acknowledge(&self, operation: Operation) {
        self.update(|s| {
            if s.status(operation).is_terminal() {
                s.set_status(operation, OperationStatus::Idle);
            }
        });
    }
}
