//! Wallet lifecycle and read-side handlers.

mod adjust_balance;
mod get_wallet;
mod provision_wallet;

pub use adjust_balance::{AdjustBalanceCommand, AdjustBalanceHandler};
pub use get_wallet::{GetWalletHandler, GetWalletQuery, WalletView};
pub use provision_wallet::{ProvisionWalletCommand, ProvisionWalletHandler};
