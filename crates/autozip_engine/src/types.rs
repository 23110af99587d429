use std::fmt;

use autozip_core::{JobState, JobStatus, PollGeneration};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body of `POST /api/pack`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackRequest<'a> {
    pub output_path: &'a str,
}

/// Reply of `POST /api/pack`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackReply {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireJobState {
    #[serde(alias = "ready")]
    Idle,
    Packing,
    Success,
    Error,
    /// Anything else the server may report; treated as non-terminal.
    #[serde(other)]
    Other,
}

/// Reply of `GET /api/status`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusReply {
    pub status: WireJobState,
    #[serde(default)]
    pub progress: i64,
    #[serde(default)]
    pub message: String,
}

impl StatusReply {
    pub fn into_status(self) -> JobStatus {
        let state = match self.status {
            WireJobState::Idle | WireJobState::Other => JobState::Idle,
            WireJobState::Packing => JobState::Packing,
            WireJobState::Success => JobState::Success,
            WireJobState::Error => JobState::Error,
        };
        JobStatus::new(state, self.progress, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    Status {
        generation: PollGeneration,
        status: JobStatus,
    },
    Failed {
        generation: PollGeneration,
        error: ApiError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    PackAccepted,
    PackRejected { message: Option<String> },
    PackFailed(ApiError),
    Poll(PollEvent),
    ShutdownSent,
    ShutdownFailed(ApiError),
    /// A timer requested through [`crate::EngineHandle::wake_after`] fired.
    Wake { token: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Malformed,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Malformed => write!(f, "malformed json"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_reply_accepts_ready_and_unknown_states() {
        let ready: StatusReply =
            serde_json::from_str(r#"{"status":"ready","progress":0,"message":"x"}"#).unwrap();
        assert_eq!(ready.into_status().state, JobState::Idle);

        let odd: StatusReply = serde_json::from_str(r#"{"status":"queued"}"#).unwrap();
        let status = odd.into_status();
        assert_eq!(status.state, JobState::Idle);
        assert_eq!(status.progress, 0);
        assert!(status.message.is_empty());
    }

    #[test]
    fn status_reply_clamps_progress() {
        let reply: StatusReply =
            serde_json::from_str(r#"{"status":"packing","progress":250,"message":"m"}"#).unwrap();
        assert_eq!(reply.into_status().progress, 100);
    }

    #[test]
    fn pack_reply_message_is_optional() {
        let reply: PackReply = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(reply.success);
        assert_eq!(reply.message, None);
    }

    #[test]
    fn api_error_display_includes_kind() {
        let err = ApiError::new(FailureKind::HttpStatus(503), "unavailable");
        assert_eq!(err.to_string(), "http status 503: unavailable");
    }
}
