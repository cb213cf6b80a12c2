//! Persistence adapters for the poll repository and notification ledger.
//!
//! The process keeps its state in one [`InMemoryStore`]; both adapters are
//! thin translators over it and carry no business logic. The guarded status
//! transitions serialise on the store's write lock, which is what gives the
//! repository its compare-and-set completion semantics.

mod memory;

pub use memory::{InMemoryNotificationLedger, InMemoryPollRepository, InMemoryStore};
