use ballot_adapters::AdapterError;
use ballot_types::{BallotError, ElectionId, Timestamp};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("invalid input: {0}")]
    Validation(#[from] BallotError),

    #[error("adapter error: {0}")]
    Adapter(#[from] AdapterError),

    #[error("upload returned no content URI")]
    EmptyUpload,

    #[error("election {0} is not in the loaded election list")]
    UnknownElection(ElectionId),

    #[error("election {election_id} is not accepting votes at {now}")]
    VotingClosed { election_id: ElectionId, now: Timestamp },

    #[error("proof hash is empty")]
    EmptyProof,

    #[error("config error: {0}")]
    Config(String),
}
