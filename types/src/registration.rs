//! Authority-side registration inputs.

use serde::{Deserialize, Serialize};

use crate::error::BallotError;
use crate::ids::{ElectionId, NationalId};

/// A voter being registered for an election.
///
/// The email is kept locally for delivering the proof value; the ledger
/// never sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterRegistration {
    pub election_id: ElectionId,
    pub name: String,
    pub national_id: NationalId,
    pub email: String,
}

impl VoterRegistration {
    pub fn validate(&self) -> Result<(), BallotError> {
        if self.name.trim().is_empty() {
            return Err(BallotError::MissingField("name"));
        }
        if !self.email.contains('@') {
            return Err(BallotError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }
}

/// A candidate being registered for an election.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRegistration {
    pub election_id: ElectionId,
    pub name: String,
    pub national_id: NationalId,
    pub email: String,
    /// Display label for the candidate's symbol.
    pub symbol_name: String,
}

impl CandidateRegistration {
    pub fn validate(&self) -> Result<(), BallotError> {
        if self.name.trim().is_empty() {
            return Err(BallotError::MissingField("name"));
        }
        if self.symbol_name.trim().is_empty() {
            return Err(BallotError::MissingField("symbol_name"));
        }
        Ok(())
    }
}

/// An image file destined for object storage.
#[derive(Clone, PartialEq, Eq)]
pub struct SymbolFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SymbolFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for SymbolFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
