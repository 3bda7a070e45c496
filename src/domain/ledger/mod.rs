//! Coin ledger domain: wallets and their append-only transaction log.
//!
//! # Invariants
//!
//! - A wallet balance is never negative.
//! - Ledger entries are immutable and append-only; replaying a user's
//!   entries in creation order and summing `amount` reproduces the wallet
//!   balance exactly.
//! - Every entry snapshots `balance_after`, the balance immediately after
//!   the entry applied.

mod entry;
mod errors;
mod wallet;

pub use entry::{EntryDraft, EntryKind, LedgerEntry};
pub use errors::{LedgerError, UnlockError};
pub use wallet::Wallet;
