use autozip_core::{
    update, AppState, Effect, Msg, ShutdownPhase, StatusClass, CLOSE_DELAY, CLOSE_FALLBACK_DELAY,
};

fn confirmed(state: AppState) -> (AppState, Vec<Effect>) {
    let (state, effects) = update(state, Msg::ShutdownClicked);
    assert_eq!(effects, vec![Effect::ConfirmShutdown]);
    update(state, Msg::ShutdownConfirmed)
}

#[test]
fn shutdown_click_only_asks_for_confirmation() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::ShutdownClicked);

    assert_eq!(effects, vec![Effect::ConfirmShutdown]);
    assert_eq!(next, state);
}

#[test]
fn confirmed_shutdown_sends_request_and_closes_after_delay() {
    let (state, effects) = confirmed(AppState::new());
    assert_eq!(effects, vec![Effect::SendShutdown]);

    let view = state.view();
    assert_eq!(view.shutdown, ShutdownPhase::Requested);
    assert_eq!(view.status_text, "Shutting down server...");
    assert_eq!(view.status_class, StatusClass::Error);
    assert_eq!(view.progress, 100);
    assert!(!view.pack_enabled);

    let (state, effects) = update(state, Msg::ShutdownSent);
    assert_eq!(effects, vec![Effect::CloseInterface { after: CLOSE_DELAY }]);

    let (state, effects) = update(state, Msg::CloseRequested);
    assert_eq!(
        effects,
        vec![
            Effect::Quit,
            Effect::ScheduleCloseFallback {
                after: CLOSE_FALLBACK_DELAY
            }
        ]
    );
    assert!(!state.view().closed_notice);

    let (state, _) = update(state, Msg::CloseFallbackElapsed);
    assert!(state.view().closed_notice);
}

#[test]
fn shutdown_while_polling_stops_the_poller_first() {
    let (state, _) = update(AppState::new(), Msg::PathInputChanged("D:\\out".into()));
    let (state, _) = update(state, Msg::PackClicked);
    let (state, _) = update(state, Msg::PackAccepted);
    assert!(state.poller_active());

    let (state, effects) = confirmed(state);
    assert_eq!(effects, vec![Effect::StopPoller, Effect::SendShutdown]);
    assert!(!state.poller_active());
}

#[test]
fn failed_shutdown_shows_manual_hint_and_allows_retry() {
    let (state, _) = confirmed(AppState::new());
    let (state, effects) = update(
        state,
        Msg::ShutdownFailed {
            reason: "connection refused".into(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.shutdown_phase(), ShutdownPhase::Running);
    assert_eq!(
        state.view().banner.unwrap().text,
        "Shutdown failed, please close the terminal manually"
    );
    let view = state.view();
    assert_eq!(view.status_text, "Ready");
    assert_eq!(view.status_class, StatusClass::Normal);
    assert_eq!(view.progress, 0);

    let (_, effects) = update(state, Msg::ShutdownClicked);
    assert_eq!(effects, vec![Effect::ConfirmShutdown]);
}

#[test]
fn pack_is_blocked_once_shutdown_started() {
    let (state, _) = update(AppState::new(), Msg::PathInputChanged("D:\\out".into()));
    let (state, _) = confirmed(state);
    let (_, effects) = update(state, Msg::PackClicked);
    assert!(effects.is_empty());
}

#[test]
fn close_fallback_ignored_without_close_attempt() {
    let (state, _) = update(AppState::new(), Msg::CloseFallbackElapsed);
    assert!(!state.view().closed_notice);
}
