//! PostgreSQL adapters.

mod catalog;
mod ledger_store;

pub use catalog::{PostgresBundleCatalog, PostgresCatalogLookup};
pub use ledger_store::PostgresLedgerStore;
