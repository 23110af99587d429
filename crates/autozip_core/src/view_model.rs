use crate::{Banner, JobOutcome, PathSource, ShutdownPhase};

/// Static text shown when the interface could not close itself.
pub const CLOSED_NOTICE: &str = "The program has shut down; you can close this window";

/// Styling class of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusClass {
    #[default]
    Normal,
    Packing,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub path: String,
    pub placeholder: Option<String>,
    pub path_source: Option<PathSource>,
    /// Start control enablement: false while packing or without a path.
    pub pack_enabled: bool,
    pub packing: bool,
    pub progress: u8,
    pub status_text: String,
    pub status_class: StatusClass,
    pub banner: Option<Banner>,
    pub last_outcome: Option<JobOutcome>,
    pub shutdown: ShutdownPhase,
    pub closed_notice: bool,
    pub dirty: bool,
}
