//! External collaborators of the ballot coordinator.
//!
//! Each collaborator is a trait so the coordinator can be driven by the real
//! HTTP clients in production and by `ballot-nullables` in tests:
//! - [`LedgerClient`]: read queries and write transactions against the election contract
//! - [`Notifier`]: templated email delivery of voter proof values
//! - [`ObjectStorage`]: content-addressed upload of candidate symbol images

pub mod error;
mod http;
pub mod ledger;
pub mod notification;
pub mod storage;

pub use error::AdapterError;
pub use ledger::{ElectionContract, JsonRpcLedgerClient, LedgerClient, LedgerOperation};
pub use notification::{EmailJsNotifier, EmailJsSettings, Notifier, TemplateParams};
pub use storage::{HttpObjectStorage, ObjectStorage};
