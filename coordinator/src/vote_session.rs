//! One voter's path from proof entry to a cast vote.

use ballot_types::{CandidateHash, ElectionId, IndexedElection, ProofHash, Timestamp};
use thiserror::Error;

use crate::state::StoreState;
use crate::status::{Operation, VoteStatus};
use crate::store::ElectionStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VoteSessionError {
    #[error("no election selected")]
    NoElection,

    #[error("election {0} is not accepting votes")]
    VotingClosed(ElectionId),

    #[error("proof hash is empty")]
    EmptyProofHash,

    #[error("no candidate selected")]
    NoCandidate,

    #[error("proof hash has not been verified")]
    NotVerified,

    #[error("election id {0:?} is not a base-10 integer")]
    InvalidElectionId(String),
}

/// Everything `giveVote` needs, validated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteSubmission {
    pub election_id: ElectionId,
    pub proof: ProofHash,
    pub candidate: CandidateHash,
}

impl VoteSubmission {
    /// Build a submission from raw text. The election id must be base-10.
    pub fn parse(election_id: &str, proof: &str, candidate: &str) -> Result<Self, VoteSessionError> {
        let election_id = election_id
            .trim()
            .parse::<ElectionId>()
            .map_err(|_| VoteSessionError::InvalidElectionId(election_id.to_string()))?;
        let proof = ProofHash::new(proof);
        if proof.is_blank() {
            return Err(VoteSessionError::EmptyProofHash);
        }
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return Err(VoteSessionError::NoCandidate);
        }
        Ok(Self {
            election_id,
            proof,
            candidate: CandidateHash::new(candidate),
        })
    }
}

/// Session state for a single voter on a single election.
///
/// Voting availability is recomputed from the supplied `now` on every call
/// and never cached. Failed local checks leave the store untouched.
#[derive(Clone, Debug, Default)]
pub struct VoteSession {
    election: Option<IndexedElection>,
    input_hash: String,
    hash_error: bool,
    dialog_open: bool,
    selected_candidate: Option<CandidateHash>,
}

impl VoteSession {
    pub fn new(election: IndexedElection) -> Self {
        Self {
            election: Some(election),
            ..Self::default()
        }
    }

    pub fn election(&self) -> Option<&IndexedElection> {
        self.election.as_ref()
    }

    pub fn set_input_hash(&mut self, raw: &str) {
        self.input_hash = raw.trim().to_string();
        self.hash_error = false;
    }

    pub fn input_hash(&self) -> &str {
        &self.input_hash
    }

    /// The last verification was refused for a blank proof.
    pub fn hash_error(&self) -> bool {
        self.hash_error
    }

    pub fn dialog_open(&self) -> bool {
        self.dialog_open
    }

    pub fn selected_candidate(&self) -> Option<&CandidateHash> {
        self.selected_candidate.as_ref()
    }

    /// Whether vote entry is enabled: `start_time <= now < end_time`.
    pub fn voting_open(&self, now: Timestamp) -> bool {
        self.election
            .as_ref()
            .is_some_and(|e| e.election.is_open(now))
    }

    fn ensure_open(&self, now: Timestamp) -> Result<ElectionId, VoteSessionError> {
        let election = self.election.as_ref().ok_or(VoteSessionError::NoElection)?;
        if !election.election.is_open(now) {
            return Err(VoteSessionError::VotingClosed(election.election_id));
        }
        Ok(election.election_id)
    }

    /// Check the entered proof locally and open candidate selection.
    pub fn verify(&mut self, now: Timestamp) -> Result<(), VoteSessionError> {
        self.ensure_open(now)?;
        if self.input_hash.is_empty() {
            self.hash_error = true;
            return Err(VoteSessionError::EmptyProofHash);
        }
        self.hash_error = false;
        self.dialog_open = true;
        Ok(())
    }

    /// Select `candidate`, replacing any earlier choice.
    ///
    /// Only possible after a successful [`verify`](Self::verify) and while
    /// the voting window is open.
    pub fn select_candidate(
        &mut self,
        candidate: CandidateHash,
        now: Timestamp,
    ) -> Result<(), VoteSessionError> {
        self.ensure_open(now)?;
        if !self.dialog_open {
            return Err(VoteSessionError::NotVerified);
        }
        self.selected_candidate = Some(candidate);
        Ok(())
    }

    pub fn is_selected(&self, candidate: &CandidateHash) -> bool {
        self.selected_candidate.as_ref() == Some(candidate)
    }

    pub fn close_dialog(&mut self) {
        self.dialog_open = false;
    }

    pub fn submission(&self) -> Result<VoteSubmission, VoteSessionError> {
        let election = self.election.as_ref().ok_or(VoteSessionError::NoElection)?;
        let proof = ProofHash::new(&self.input_hash);
        if proof.is_blank() {
            return Err(VoteSessionError::EmptyProofHash);
        }
        let candidate = self
            .selected_candidate
            .clone()
            .ok_or(VoteSessionError::NoCandidate)?;
        Ok(VoteSubmission {
            election_id: election.election_id,
            proof,
            candidate,
        })
    }

    /// Cast the vote through the store.
    ///
    /// Requires an open window and a verified proof. Local checks run first;
    /// on failure nothing is sent and no store state changes.
    pub async fn submit(
        &mut self,
        store: &ElectionStore,
        now: Timestamp,
    ) -> Result<VoteStatus, VoteSessionError> {
        self.ensure_open(now)?;
        if !self.dialog_open {
            return Err(VoteSessionError::NotVerified);
        }
        let submission = self.submission()?;
        let status = store
            .give_vote(submission.election_id, submission.proof, submission.candidate)
            .await
            .map_err(|_| VoteSessionError::EmptyProofHash)?;
        self.observe(&store.snapshot());
        Ok(status)
    }

    /// React to a published store state.
    pub fn observe(&mut self, state: &StoreState) {
        if state.vote == VoteStatus::Succeeded {
            self.dialog_open = false;
        }
    }

    /// Reset the store's terminal vote status back to idle.
    pub fn acknowledge_result(&self, store: &ElectionStore) {
        store.acknowledge(Operation::GiveVote);
    }

    /// Tallies are shown only after the election has ended.
    pub fn results_visible(&self, now: Timestamp) -> bool {
        self.election
            .as_ref()
            .is_some_and(|e| e.election.has_ended(now))
    }

    /// Notice shown in place of the tallies while they are hidden.
    pub fn pending_result_notice(&self, now: Timestamp) -> Option<String> {
        let election = self.election.as_ref()?;
        if election.election.has_ended(now) {
            return None;
        }
        Some(format!(
            "Results for \"{}\" will be published after voting ends.",
            election.election.name
        ))
    }
}
