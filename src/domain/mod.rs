//! Domain layer - entities, value objects, and invariants.
//!
//! Nothing in this layer performs I/O. All mutation of wallet balances goes
//! through the `LedgerStore` port; the types here define what a valid
//! mutation looks like.

pub mod catalog;
pub mod entitlement;
pub mod foundation;
pub mod ledger;
pub mod payment;
