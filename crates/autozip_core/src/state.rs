use crate::view_model::{AppViewModel, StatusClass};
use crate::{JobState, JobStatus, PathSource, ResolvedPath};

/// Monotonic id of one status-polling run; stale results carry an old id.
pub type PollGeneration = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BannerId(pub u64);

/// Controller lifecycle. A finished job drops back to `Idle`; the outcome is
/// kept separately in [`JobOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Idle,
    /// Start request in flight (or waiting on the full-path lookup).
    Requesting,
    Polling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShutdownPhase {
    #[default]
    Running,
    Requested,
    Closing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub id: BannerId,
    pub kind: BannerKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    path_input: String,
    path_source: Option<PathSource>,
    full_path: Option<String>,
    placeholder: Option<String>,
    lifecycle: Lifecycle,
    last_outcome: Option<JobOutcome>,
    job_path: Option<String>,
    status_text: String,
    status_class: StatusClass,
    progress: u8,
    banner: Option<Banner>,
    last_banner_id: u64,
    poll_generation: PollGeneration,
    poller_active: bool,
    shutdown: ShutdownPhase,
    closed_notice: bool,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            path_input: String::new(),
            path_source: None,
            full_path: None,
            placeholder: None,
            lifecycle: Lifecycle::Idle,
            last_outcome: None,
            job_path: None,
            status_text: "Ready".to_string(),
            status_class: StatusClass::Normal,
            progress: 0,
            banner: None,
            last_banner_id: 0,
            poll_generation: 0,
            poller_active: false,
            shutdown: ShutdownPhase::Running,
            closed_notice: false,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            path: self.path_input.clone(),
            placeholder: self.placeholder.clone(),
            path_source: self.path_source,
            pack_enabled: self.lifecycle == Lifecycle::Idle
                && self.shutdown == ShutdownPhase::Running
                && !self.path_input.trim().is_empty(),
            packing: self.lifecycle != Lifecycle::Idle,
            progress: self.progress,
            status_text: self.status_text.clone(),
            status_class: self.status_class,
            banner: self.banner.clone(),
            last_outcome: self.last_outcome,
            shutdown: self.shutdown,
            closed_notice: self.closed_notice,
            dirty: self.dirty,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn path_input(&self) -> &str {
        &self.path_input
    }

    pub fn poll_generation(&self) -> PollGeneration {
        self.poll_generation
    }

    pub fn poller_active(&self) -> bool {
        self.poller_active
    }

    pub fn shutdown_phase(&self) -> ShutdownPhase {
        self.shutdown
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn path_source(&self) -> Option<PathSource> {
        self.path_source
    }

    pub(crate) fn full_path(&self) -> Option<&str> {
        self.full_path.as_deref()
    }

    pub(crate) fn job_path(&self) -> &str {
        self.job_path.as_deref().unwrap_or(&self.path_input)
    }

    pub(crate) fn set_typed_path(&mut self, text: String) {
        self.path_input = text;
        self.path_source = None;
        self.full_path = None;
        self.mark_dirty();
    }

    pub(crate) fn set_resolved_path(&mut self, resolved: ResolvedPath) {
        self.path_input = resolved.display_name;
        self.path_source = Some(resolved.source);
        self.full_path = resolved.full_path;
        self.mark_dirty();
    }

    pub(crate) fn set_placeholder(&mut self, text: String) {
        self.placeholder = Some(text);
        self.mark_dirty();
    }

    pub(crate) fn set_full_path(&mut self, full_path: String) {
        self.full_path = Some(full_path);
    }

    pub(crate) fn begin_request(&mut self, job_path: String) {
        self.lifecycle = Lifecycle::Requesting;
        self.job_path = Some(job_path);
        self.banner = None;
        self.set_status("Preparing to pack...", StatusClass::Packing, 0);
    }

    /// Moves to `Polling` and returns the generation of the new poll run.
    pub(crate) fn begin_polling(&mut self) -> PollGeneration {
        self.lifecycle = Lifecycle::Polling;
        self.poll_generation += 1;
        self.poller_active = true;
        self.mark_dirty();
        self.poll_generation
    }

    /// Returns to `Idle`. Reports whether a poller was running and must be
    /// stopped.
    pub(crate) fn finish(&mut self, outcome: Option<JobOutcome>) -> bool {
        self.lifecycle = Lifecycle::Idle;
        if outcome.is_some() {
            self.last_outcome = outcome;
        }
        self.mark_dirty();
        std::mem::take(&mut self.poller_active)
    }

    pub(crate) fn apply_status(&mut self, status: &JobStatus) {
        let class = match status.state {
            JobState::Error => StatusClass::Error,
            JobState::Packing => StatusClass::Packing,
            JobState::Idle | JobState::Success => StatusClass::Normal,
        };
        self.set_status(status.message.clone(), class, status.progress);
    }

    pub(crate) fn set_status(&mut self, text: impl Into<String>, class: StatusClass, progress: u8) {
        self.status_text = text.into();
        self.status_class = class;
        self.progress = progress.min(100);
        self.mark_dirty();
    }

    pub(crate) fn show_banner(&mut self, kind: BannerKind, text: impl Into<String>) -> BannerId {
        self.last_banner_id += 1;
        let id = BannerId(self.last_banner_id);
        self.banner = Some(Banner {
            id,
            kind,
            text: text.into(),
        });
        self.mark_dirty();
        id
    }

    /// Hides the banner only if `id` is still the one on screen.
    pub(crate) fn dismiss_banner(&mut self, id: BannerId) -> bool {
        if self.banner.as_ref().is_some_and(|b| b.id == id) {
            self.banner = None;
            self.mark_dirty();
            true
        } else {
            false
        }
    }

    pub(crate) fn set_shutdown(&mut self, phase: ShutdownPhase) {
        self.shutdown = phase;
        self.mark_dirty();
    }

    pub(crate) fn show_closed_notice(&mut self) {
        self.closed_notice = true;
        self.mark_dirty();
    }
}
