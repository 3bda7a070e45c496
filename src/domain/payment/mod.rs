//! Payment domain: external-gateway transactions that buy coins.

mod aggregate;
mod errors;

pub use aggregate::{Payment, PaymentStatus};
pub use errors::PaymentIntakeError;
