//! Identifier types: election positions, national ids, and opaque ledger hashes.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BallotError;

/// Position of an election in the ledger's election list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ElectionId(u64);

impl ElectionId {
    pub fn new(index: u64) -> Self {
        Self(index)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The election's index into a locally held election list.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Base-10 only; identifiers typed by people never arrive as hex.
impl FromStr for ElectionId {
    type Err = BallotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_decimal(s).map(Self)
    }
}

impl fmt::Display for ElectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for ElectionId {
    fn from(index: usize) -> Self {
        Self(index as u64)
    }
}

impl<'de> Deserialize<'de> for ElectionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        crate::numeric::deserialize(deserializer).map(Self)
    }
}

/// A person's national identification number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NationalId(u64);

impl NationalId {
    pub fn new(nid: u64) -> Self {
        Self(nid)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl FromStr for NationalId {
    type Err = BallotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_decimal(s).map(Self)
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for NationalId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        crate::numeric::deserialize(deserializer).map(Self)
    }
}

fn parse_decimal(s: &str) -> Result<u64, BallotError> {
    let trimmed = s.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BallotError::InvalidNumber(s.to_string()));
    }
    trimmed
        .parse::<u64>()
        .map_err(|_| BallotError::InvalidNumber(s.to_string()))
}

/// The proof value the ledger issues to a registered voter.
///
/// Opaque: it is mailed out verbatim and submitted back verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProofHash(String);

impl ProofHash {
    /// Wrap a raw proof value, trimming surrounding whitespace.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ProofHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ledger-assigned identifier of a candidate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateHash(String);

impl CandidateHash {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CandidateHash {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
