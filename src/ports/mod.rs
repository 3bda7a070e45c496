//! Ports - trait contracts between the application core and its adapters.

mod bundle_catalog;
mod catalog_lookup;
mod gateway_adapter;
mod ledger_store;

pub use bundle_catalog::BundleCatalog;
pub use catalog_lookup::{CatalogError, CatalogLookup};
pub use gateway_adapter::{
    CallbackNotice, CallbackOutcome, GatewayAdapter, GatewayError, GatewayInitiation,
    GatewayRegistry,
};
pub use ledger_store::{AppliedBatch, LedgerBatch, LedgerStore, PaymentTransition};
