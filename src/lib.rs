//! Audiowall - coin ledger and unlock-transaction backend.
//!
//! Users spend a virtual coin balance to unlock paid audio episodes or whole
//! series, and replenish that balance through external payment gateways. The
//! crate guarantees that a user is never charged twice, never goes negative,
//! and never ends up entitled-but-unpaid or paid-but-unentitled.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
