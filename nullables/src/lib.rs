//! In-memory stand-ins for the ballot coordinator's collaborators.
//!
//! Each nullable implements the same trait as its production adapter
//! (`Clock`, `LedgerClient`, `Notifier`, `ObjectStorage`), records what it
//! was asked to do, and can be steered from a test: advance time, reject or
//! stall a ledger operation, fail every email or upload. None of them
//! touches the network.

pub mod clock;
pub mod ledger;
pub mod notifier;
pub mod storage;

pub use clock::NullClock;
pub use ledger::{CallKind, LedgerCall, NullLedger};
pub use notifier::NullNotifier;
pub use storage::NullStorage;
