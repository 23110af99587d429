//! AutoZIP engine: server API client, status polling, path resolution and
//! file persistence.
mod api;
mod engine;
mod paths;
mod persist;
mod poller;
mod types;

pub use api::{ApiSettings, PackApi, ReqwestPackApi, DEFAULT_SERVER_URL};
pub use engine::{EngineConfig, EngineError, EngineHandle};
pub use paths::{
    CachedPromptFullPath, FolderPicker, FullPathResolver, NoFullPath, PathResolver, PickOutcome,
    Prompter, Resolution,
};
pub use persist::{ensure_dir, read_optional, AtomicFileWriter, PersistError};
pub use poller::{ChannelPollSink, PollSink, StatusPoller, DEFAULT_POLL_INTERVAL};
pub use types::{
    ApiError, EngineEvent, FailureKind, PackReply, PackRequest, PollEvent, StatusReply,
    WireJobState,
};
