//! Episode and series unlock endpoints.

mod dto;
mod handlers;
mod routes;

pub use handlers::EpisodeApiError;
pub use routes::{routes, series_routes};
