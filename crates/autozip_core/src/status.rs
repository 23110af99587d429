/// Server-side job state as reported by the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobState {
    #[default]
    Idle,
    Packing,
    Success,
    Error,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Success | JobState::Error)
    }
}

/// One status snapshot of the packaging job.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobStatus {
    pub state: JobState,
    /// Always within `0..=100`.
    pub progress: u8,
    pub message: String,
}

impl JobStatus {
    /// Builds a status, clamping out-of-range progress values into `0..=100`.
    pub fn new(state: JobState, progress: i64, message: impl Into<String>) -> Self {
        Self {
            state,
            progress: progress.clamp(0, 100) as u8,
            message: message.into(),
        }
    }
}
