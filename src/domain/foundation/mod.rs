//! Shared value objects used across the domain.

mod ids;
mod timestamp;

pub use ids::{BundleId, EntitlementId, EpisodeId, LedgerEntryId, PaymentId, SeriesId, UserId};
pub use timestamp::Timestamp;
