use crate::{BannerId, JobStatus, PollGeneration, ResolvedPath};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User typed into the path field directly.
    PathInputChanged(String),
    /// Cached path restored at startup.
    PathRestored(ResolvedPath),
    /// User asked to choose an output folder.
    BrowseClicked,
    /// Path resolver produced a new path.
    PathResolved(ResolvedPath),
    /// User clicked the pack button.
    PackClicked,
    /// Absolute-path lookup for a picker folder finished.
    FullPathResolved {
        folder_name: String,
        full_path: Option<String>,
    },
    /// Server accepted the start request.
    PackAccepted,
    /// Server refused the start request.
    PackRejected { message: Option<String> },
    /// Start request could not be sent or its reply could not be read.
    PackTransportFailed { reason: String },
    /// Poller delivered a status snapshot.
    StatusReceived {
        generation: PollGeneration,
        status: JobStatus,
    },
    /// Poller failed to fetch the status and stopped.
    PollFailed {
        generation: PollGeneration,
        reason: String,
    },
    /// Auto-dismiss timer of a banner fired.
    BannerExpired { banner_id: BannerId },
    /// User clicked the shutdown button.
    ShutdownClicked,
    /// User confirmed the shutdown prompt.
    ShutdownConfirmed,
    /// Shutdown request was delivered.
    ShutdownSent,
    ShutdownFailed { reason: String },
    /// Close delay elapsed; the interface should close now.
    CloseRequested,
    /// Interface is still open after the close attempt.
    CloseFallbackElapsed,
    /// Background engine stopped responding.
    EngineUnavailable,
    /// Interface is going away; release timers.
    Teardown,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
