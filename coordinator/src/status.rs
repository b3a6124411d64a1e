//! Tagged outcome of each store operation.

use serde::{Deserialize, Serialize};

/// Lifecycle of a one-shot authority operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationStatus {
    /// Not attempted since the last acknowledgement.
    #[default]
    Idle,
    /// Remote call in flight.
    Pending,
    Succeeded,
    Failed,
}

impl OperationStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    pub fn from_outcome(succeeded: bool) -> Self {
        if succeeded {
            Self::Succeeded
        } else {
            Self::Failed
        }
    }
}

/// Vote casting: `Idle -> InProgress -> {Succeeded, Failed}`.
///
/// The terminal states stay put until acknowledged back to `Idle`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteStatus {
    #[default]
    Idle,
    InProgress,
    Succeeded,
    Failed,
}

impl VoteStatus {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Store operations whose status can be acknowledged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    InitializeBallot,
    RegisterVoter,
    VoterEmail,
    RegisterCandidate,
    GiveVote,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InitializeBallot => "initialize_ballot",
            Self::RegisterVoter => "register_voter",
            Self::VoterEmail => "voter_email",
            Self::RegisterCandidate => "register_candidate",
            Self::GiveVote => "give_vote",
        }
    }
}
