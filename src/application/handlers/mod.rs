//! Command/query handlers, grouped by capability.

pub mod payment;
pub mod unlock;
pub mod wallet;
