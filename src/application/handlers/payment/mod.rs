//! Payment intake - bridges external money into coin credits, exactly once
//! per gateway reference.

mod get_bundles;
mod handle_callback;
mod initiate_payment;

pub use get_bundles::{GetBundlesHandler, GetBundlesQuery};
pub use handle_callback::{HandleCallbackCommand, HandleCallbackHandler, HandleCallbackResult};
pub use initiate_payment::{
    InitiatePaymentCommand, InitiatePaymentHandler, InitiatePaymentResult,
};
