//! Payment intake endpoints: bundles, initiation, gateway callbacks.

mod dto;
mod handlers;
mod routes;

pub use handlers::PaymentApiError;
pub use routes::routes;
