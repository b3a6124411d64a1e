//! Elections and candidates as the ledger reports them.

use serde::{Deserialize, Serialize};

use crate::error::BallotError;
use crate::ids::{CandidateHash, ElectionId, NationalId};
use crate::time::Timestamp;

/// An election record from the ledger's `getElections` list.
///
/// Elections have no id of their own; they are addressed by their position
/// in the list (see [`IndexedElection`]).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Election {
    pub name: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Opaque ledger-assigned identifier.
    #[serde(default)]
    pub hash: String,
}

impl Election {
    /// Whether votes are accepted at `now`: `start_time <= now < end_time`.
    pub fn is_open(&self, now: Timestamp) -> bool {
        self.start_time <= now && now < self.end_time
    }

    /// Whether the voting window has closed and tallies may be shown.
    pub fn has_ended(&self, now: Timestamp) -> bool {
        now > self.end_time
    }

    pub fn candidate(&self, hash: &CandidateHash) -> Option<&Candidate> {
        self.candidates.iter().find(|c| &c.hash == hash)
    }
}

/// A candidate standing in an election.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    #[serde(rename = "nid", default = "unknown_nid")]
    pub national_id: NationalId,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "electionID", default)]
    pub election_id: Option<ElectionId>,
    #[serde(rename = "symbolName", default)]
    pub symbol_name: String,
    /// Content address of the symbol image in object storage.
    #[serde(rename = "symbolImg", alias = "symbolImageURI", alias = "symbolUrl", default)]
    pub symbol_image_uri: String,
    pub hash: CandidateHash,
    /// Tally owned by the ledger; never incremented locally.
    #[serde(default, deserialize_with = "crate::numeric::deserialize")]
    pub votes: u64,
}

fn unknown_nid() -> NationalId {
    NationalId::new(0)
}

/// Authority input for creating a new election.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewElection {
    pub name: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

impl NewElection {
    pub fn new(name: impl Into<String>, start_time: Timestamp, end_time: Timestamp) -> Self {
        Self {
            name: name.into(),
            start_time,
            end_time,
        }
    }

    /// Reject empty names and schedules where `start_time >= end_time`.
    pub fn validate(&self) -> Result<(), BallotError> {
        if self.name.trim().is_empty() {
            return Err(BallotError::MissingField("name"));
        }
        if self.start_time >= self.end_time {
            return Err(BallotError::InvalidSchedule {
                start: self.start_time,
                end: self.end_time,
            });
        }
        Ok(())
    }
}

/// An election paired with its position in the ledger list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedElection {
    pub election_id: ElectionId,
    pub election: Election,
}

impl IndexedElection {
    pub fn new(election_id: ElectionId, election: Election) -> Self {
        Self {
            election_id,
            election,
        }
    }
}
