//! Election/vote coordination for the ballot front end.
//!
//! - [`classify`] buckets elections into previous / ongoing / upcoming.
//! - [`ElectionStore`] owns all election, voter, candidate and vote state and
//!   is the only component that writes to the ledger.
//! - [`NotificationDispatcher`] consumes proof-resolved events and emails
//!   each voter their proof value at most once.
//! - [`VoteSession`] gates a single voter's hash entry, candidate choice and
//!   submission.
//!
//! Every store operation absorbs its failures into a tagged status
//! ([`OperationStatus`] / [`VoteStatus`]); nothing propagates to the caller.

pub mod classifier;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod state;
pub mod status;
pub mod store;
pub mod vote_session;
pub mod wallet;

pub use classifier::{classify, ClassifiedElections, ElectionBucket};
pub use config::{AppConfig, LedgerConfig, NotificationConfig, StorageConfig};
pub use dispatcher::{NotificationDispatcher, DELIVERY_HISTORY_LIMIT};
pub use error::CoordinatorError;
pub use events::ProofResolved;
pub use state::StoreState;
pub use status::{Operation, OperationStatus, VoteStatus};
pub use store::{Collaborators, ElectionStore};
pub use vote_session::{VoteSession, VoteSessionError, VoteSubmission};
pub use wallet::{ConnectionStatus, WalletConnection};
