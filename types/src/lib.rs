//! Fundamental types for the ballot coordination layer.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! elections, candidates, registrations, identifiers, wallet addresses, and timestamps.

pub mod address;
pub mod election;
pub mod error;
pub mod ids;
pub mod numeric;
pub mod registration;
pub mod time;

pub use address::WalletAddress;
pub use election::{Candidate, Election, IndexedElection, NewElection};
pub use error::BallotError;
pub use ids::{CandidateHash, ElectionId, NationalId, ProofHash};
pub use registration::{CandidateRegistration, SymbolFile, VoterRegistration};
pub use time::{Clock, SystemClock, Timestamp};
