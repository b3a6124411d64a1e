//! Snapshot of everything the store publishes.

use ballot_types::{Candidate, Election, IndexedElection, Timestamp, VoterRegistration};

use crate::classifier::ClassifiedElections;
use crate::status::{Operation, OperationStatus, VoteStatus};

/// Published store state.
///
/// Subscribers receive clones; only [`crate::ElectionStore`] can change the
/// published value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StoreState {
    /// Raw election list in ledger order.
    pub elections: Vec<Election>,
    /// Buckets derived from `elections` at `classified_at`.
    pub classified: ClassifiedElections,
    pub classified_at: Timestamp,
    /// An election-list read is in flight.
    pub elections_loading: bool,

    pub ballot: OperationStatus,
    pub voter_registration: OperationStatus,
    pub voter_email: OperationStatus,
    pub candidate_registration: OperationStatus,
    pub vote: VoteStatus,

    /// Election currently focused for candidate lookup and voting.
    pub selected_election: Option<IndexedElection>,
    pub selected_candidates: Vec<Candidate>,
    /// The most recently registered voter.
    pub voter_details: Option<VoterRegistration>,
}

impl StoreState {
    pub fn status(&self, operation: Operation) -> OperationStatus {
        match operation {
            Operation::InitializeBallot => self.ballot,
            Operation::RegisterVoter => self.voter_registration,
            Operation::VoterEmail => self.voter_email,
            Operation::RegisterCandidate => self.candidate_registration,
            Operation::GiveVote => match self.vote {
                VoteStatus::Idle => OperationStatus::Idle,
                VoteStatus::InProgress => OperationStatus::Pending,
                VoteStatus::Succeeded => OperationStatus::Succeeded,
                VoteStatus::Failed => OperationStatus::Failed,
            },
        }
    }

    pub(crate) fn set_status(&mut self, operation: Operation, status: OperationStatus) {
        match operation {
            Operation::InitializeBallot => self.ballot = status,
            Operation::RegisterVoter => self.voter_registration = status,
            Operation::VoterEmail => self.voter_email = status,
            Operation::RegisterCandidate => self.candidate_registration = status,
            Operation::GiveVote => {
                self.vote = match status {
                    OperationStatus::Idle => VoteStatus::Idle,
                    OperationStatus::Pending => VoteStatus::InProgress,
                    OperationStatus::Succeeded => VoteStatus::Succeeded,
                    OperationStatus::Failed => VoteStatus::Failed,
                }
            }
        }
    }

    pub fn election(&self, index: usize) -> Option<&Election> {
        self.elections.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_status_maps_through_operation_status() {
        let mut state = StoreState::default();
        state.set_status(Operation::GiveVote, OperationStatus::Pending);
        assert_eq!(state.vote, VoteStatus::InProgress);
        assert_eq!(state.status(Operation::GiveVote), OperationStatus::Pending);
        state.set_status(Operation::GiveVote, OperationStatus::Failed);
        assert_eq!(state.vote, VoteStatus::Failed);
    }
}
