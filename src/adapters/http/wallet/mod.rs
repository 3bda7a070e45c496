//! Wallet endpoints: balance, ledger history, provisioning, adjustments.

mod dto;
mod handlers;
mod routes;

pub use handlers::WalletApiError;
pub use routes::routes;
