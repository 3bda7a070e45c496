//! In-memory adapters for tests and local development.

mod catalog;
mod ledger_store;

pub use catalog::{InMemoryCatalog, StaticBundleCatalog};
pub use ledger_store::InMemoryLedgerStore;
