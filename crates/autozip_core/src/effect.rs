use std::time::Duration;

use crate::{BannerId, PollGeneration};

/// Success banners disappear after this long.
pub const SUCCESS_BANNER_TTL: Duration = Duration::from_secs(5);
/// Delay between a completed shutdown request and closing the interface.
pub const CLOSE_DELAY: Duration = Duration::from_secs(1);
/// Delay after a close attempt before the static fallback notice appears.
pub const CLOSE_FALLBACK_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the user for an output path (picker first, manual prompt second).
    ResolvePath { current: String },
    /// Look up, or ask for, the absolute path behind a picker folder name.
    ResolveFullPath { folder_name: String },
    SubmitPack { output_path: String },
    StartPoller { generation: PollGeneration },
    StopPoller,
    ScheduleBannerDismiss { banner_id: BannerId, after: Duration },
    ConfirmShutdown,
    SendShutdown,
    CloseInterface { after: Duration },
    ScheduleCloseFallback { after: Duration },
    Quit,
}
