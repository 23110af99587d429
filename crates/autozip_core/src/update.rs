use crate::effect::{CLOSE_DELAY, CLOSE_FALLBACK_DELAY, SUCCESS_BANNER_TTL};
use crate::view_model::StatusClass;
use crate::{
    AppState, BannerKind, Effect, JobOutcome, JobState, Lifecycle, Msg, PathSource, ShutdownPhase,
};

const MISSING_PATH: &str = "Please choose an output path";
const PACK_REQUEST_FAILED: &str = "pack request failed";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::PathInputChanged(text) => {
            state.set_typed_path(text);
            Vec::new()
        }
        Msg::PathRestored(resolved) => {
            state.set_placeholder(format!("Last choice: {}", resolved.display_name));
            state.set_resolved_path(resolved);
            Vec::new()
        }
        Msg::BrowseClicked => {
            if state.lifecycle() != Lifecycle::Idle
                || state.shutdown_phase() != ShutdownPhase::Running
            {
                return (state, Vec::new());
            }
            vec![Effect::ResolvePath {
                current: state.path_input().to_string(),
            }]
        }
        Msg::PathResolved(resolved) => {
            state.set_resolved_path(resolved);
            Vec::new()
        }
        Msg::PackClicked => start_pack(&mut state),
        Msg::FullPathResolved {
            folder_name,
            full_path,
        } => {
            if state.lifecycle() != Lifecycle::Requesting {
                return (state, Vec::new());
            }
            let output_path = match full_path {
                Some(path) if !path.trim().is_empty() => {
                    let path = path.trim().to_string();
                    state.set_full_path(path.clone());
                    path
                }
                _ => folder_name,
            };
            vec![Effect::SubmitPack { output_path }]
        }
        Msg::PackAccepted => {
            if state.lifecycle() != Lifecycle::Requesting {
                return (state, Vec::new());
            }
            let generation = state.begin_polling();
            vec![Effect::StartPoller { generation }]
        }
        Msg::PackRejected { message } => {
            if state.lifecycle() != Lifecycle::Requesting {
                return (state, Vec::new());
            }
            let reason = message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| PACK_REQUEST_FAILED.to_string());
            fail_request(&mut state, &reason)
        }
        Msg::PackTransportFailed { reason } => {
            if state.lifecycle() != Lifecycle::Requesting {
                return (state, Vec::new());
            }
            fail_request(&mut state, &reason)
        }
        Msg::StatusReceived { generation, status } => {
            if state.lifecycle() != Lifecycle::Polling || generation != state.poll_generation() {
                return (state, Vec::new());
            }
            state.apply_status(&status);
            match status.state {
                JobState::Success => {
                    let text = format!("Packing succeeded! Saved to: {}", state.job_path());
                    state.finish(Some(JobOutcome::Succeeded));
                    let banner_id = state.show_banner(BannerKind::Success, text);
                    vec![
                        Effect::StopPoller,
                        Effect::ScheduleBannerDismiss {
                            banner_id,
                            after: SUCCESS_BANNER_TTL,
                        },
                    ]
                }
                JobState::Error => {
                    state.finish(Some(JobOutcome::Failed));
                    state.show_banner(
                        BannerKind::Error,
                        format!("Packing failed: {}", status.message),
                    );
                    vec![Effect::StopPoller]
                }
                JobState::Idle | JobState::Packing => Vec::new(),
            }
        }
        Msg::PollFailed { generation, .. } => {
            if state.lifecycle() != Lifecycle::Polling || generation != state.poll_generation() {
                return (state, Vec::new());
            }
            state.finish(Some(JobOutcome::Failed));
            state.show_banner(BannerKind::Error, "Status check failed");
            vec![Effect::StopPoller]
        }
        Msg::BannerExpired { banner_id } => {
            state.dismiss_banner(banner_id);
            Vec::new()
        }
        Msg::ShutdownClicked => {
            if state.shutdown_phase() != ShutdownPhase::Running {
                return (state, Vec::new());
            }
            vec![Effect::ConfirmShutdown]
        }
        Msg::ShutdownConfirmed => {
            if state.shutdown_phase() != ShutdownPhase::Running {
                return (state, Vec::new());
            }
            let mut effects = Vec::with_capacity(2);
            if state.finish(None) {
                effects.push(Effect::StopPoller);
            }
            state.show_banner(BannerKind::Error, "Shutting down...");
            state.set_status("Shutting down server...", StatusClass::Error, 100);
            state.set_shutdown(ShutdownPhase::Requested);
            effects.push(Effect::SendShutdown);
            effects
        }
        Msg::ShutdownSent => {
            if state.shutdown_phase() != ShutdownPhase::Requested {
                return (state, Vec::new());
            }
            vec![Effect::CloseInterface { after: CLOSE_DELAY }]
        }
        Msg::ShutdownFailed { .. } => {
            if state.shutdown_phase() != ShutdownPhase::Requested {
                return (state, Vec::new());
            }
            state.set_shutdown(ShutdownPhase::Running);
            state.set_status("Ready", StatusClass::Normal, 0);
            state.show_banner(
                BannerKind::Error,
                "Shutdown failed, please close the terminal manually",
            );
            Vec::new()
        }
        Msg::CloseRequested => {
            if state.shutdown_phase() != ShutdownPhase::Requested {
                return (state, Vec::new());
            }
            state.set_shutdown(ShutdownPhase::Closing);
            vec![
                Effect::Quit,
                Effect::ScheduleCloseFallback {
                    after: CLOSE_FALLBACK_DELAY,
                },
            ]
        }
        Msg::CloseFallbackElapsed => {
            if state.shutdown_phase() == ShutdownPhase::Closing {
                state.show_closed_notice();
            }
            Vec::new()
        }
        Msg::EngineUnavailable => {
            let mut effects = Vec::new();
            if state.lifecycle() != Lifecycle::Idle {
                state.set_status("Packing failed", StatusClass::Error, 0);
                if state.finish(Some(JobOutcome::Failed)) {
                    effects.push(Effect::StopPoller);
                }
            }
            state.show_banner(
                BannerKind::Error,
                "Network request failed, please check the connection",
            );
            effects
        }
        Msg::Teardown => {
            let mut effects = Vec::with_capacity(2);
            if state.finish(None) {
                effects.push(Effect::StopPoller);
            }
            effects.push(Effect::Quit);
            effects
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn start_pack(state: &mut AppState) -> Vec<Effect> {
    if state.lifecycle() != Lifecycle::Idle || state.shutdown_phase() != ShutdownPhase::Running {
        return Vec::new();
    }
    let output_path = state.path_input().trim().to_string();
    if output_path.is_empty() {
        state.show_banner(BannerKind::Error, MISSING_PATH);
        return Vec::new();
    }

    state.begin_request(output_path.clone());
    match (state.path_source(), state.full_path()) {
        (_, Some(full_path)) => vec![Effect::SubmitPack {
            output_path: full_path.to_string(),
        }],
        (Some(PathSource::Picker), None) => vec![Effect::ResolveFullPath {
            folder_name: output_path,
        }],
        (_, None) => vec![Effect::SubmitPack { output_path }],
    }
}

fn fail_request(state: &mut AppState, reason: &str) -> Vec<Effect> {
    state.set_status("Packing failed", StatusClass::Error, 0);
    state.finish(Some(JobOutcome::Failed));
    state.show_banner(BannerKind::Error, format!("Packing failed: {reason}"));
    Vec::new()
}
