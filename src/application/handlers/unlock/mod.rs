//! Unlock engine - converts paid-access intent into a debit plus
//! entitlements, atomically.

mod get_episode_view;
mod unlock_episode;
mod unlock_series;

pub use get_episode_view::{EpisodeView, GetEpisodeViewHandler, GetEpisodeViewQuery};
pub use unlock_episode::{UnlockEpisodeCommand, UnlockEpisodeHandler, UnlockEpisodeResult};
pub use unlock_series::{UnlockSeriesCommand, UnlockSeriesHandler, UnlockSeriesResult};
