//! AutoZIP core: pure packaging lifecycle state machine, path cache and
//! view-model helpers.
mod cache;
mod effect;
mod msg;
mod path;
mod state;
mod status;
mod update;
mod view_model;

pub use cache::{CacheEntry, CacheKey, CachedValue, Millis, PathCache, CACHE_TTL_MS};
pub use effect::{Effect, CLOSE_DELAY, CLOSE_FALLBACK_DELAY, SUCCESS_BANNER_TTL};
pub use msg::Msg;
pub use path::{PathSource, ResolvedPath};
pub use state::{
    AppState, Banner, BannerId, BannerKind, JobOutcome, Lifecycle, PollGeneration, ShutdownPhase,
};
pub use status::{JobState, JobStatus};
pub use update::update;
pub use view_model::{AppViewModel, StatusClass, CLOSED_NOTICE};
