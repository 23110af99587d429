use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use autozip_core::{Effect, Millis, Msg, PathCache, ResolvedPath};
use autozip_engine::{
    EngineEvent, EngineHandle, FullPathResolver, PathResolver, PollEvent, Prompter, Resolution,
};
use autozip_logging::{autozip_debug, autozip_info, autozip_warn};
use chrono::Utc;

use super::console::AppEvent;
use super::persistence::save_path_cache;

const SHUTDOWN_QUESTION: &str = "Shut down the packaging server?";

pub fn now_ms() -> Millis {
    Utc::now().timestamp_millis()
}

/// Carries out effects on behalf of the update loop.
///
/// Path effects run inline because they talk to the user; network work
/// and timers go to the engine thread and come back as [`AppEvent`]s.
pub struct EffectRunner {
    engine: EngineHandle,
    resolver: PathResolver,
    full_path: Box<dyn FullPathResolver>,
    prompter: Arc<dyn Prompter>,
    cache: PathCache,
    cache_file: PathBuf,
    timers: HashMap<u64, Msg>,
    next_token: u64,
    exit_on_quit: bool,
    quit: bool,
}

pub struct RunnerParts {
    pub engine: EngineHandle,
    pub resolver: PathResolver,
    pub full_path: Box<dyn FullPathResolver>,
    pub prompter: Arc<dyn Prompter>,
    pub cache: PathCache,
    pub cache_file: PathBuf,
    pub exit_on_quit: bool,
}

impl EffectRunner {
    pub fn new(parts: RunnerParts) -> Self {
        Self {
            engine: parts.engine,
            resolver: parts.resolver,
            full_path: parts.full_path,
            prompter: parts.prompter,
            cache: parts.cache,
            cache_file: parts.cache_file,
            timers: HashMap::new(),
            next_token: 0,
            exit_on_quit: parts.exit_on_quit,
            quit: false,
        }
    }

    /// Path to show on startup, if one was chosen recently.
    pub fn restore_last(&mut self) -> Option<ResolvedPath> {
        let before = self.cache.len();
        let restored = self.resolver.restore_last(&mut self.cache, now_ms());
        if self.cache.len() != before {
            self.save_cache();
        }
        restored
    }

    /// Runs effects in order and returns messages produced synchronously.
    pub fn enqueue(&mut self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut followups = Vec::new();
        for effect in effects {
            autozip_debug!("Effect {:?}", effect);
            if let Some(msg) = self.run(effect) {
                followups.push(msg);
            }
        }
        followups
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Maps an engine event to a message; unknown wake tokens map to nothing.
    pub fn translate(&mut self, event: EngineEvent) -> Option<Msg> {
        let msg = match event {
            EngineEvent::PackAccepted => Msg::PackAccepted,
            EngineEvent::PackRejected { message } => Msg::PackRejected { message },
            EngineEvent::PackFailed(err) => Msg::PackTransportFailed {
                reason: err.to_string(),
            },
            EngineEvent::Poll(PollEvent::Status { generation, status }) => {
                Msg::StatusReceived { generation, status }
            }
            EngineEvent::Poll(PollEvent::Failed { generation, error }) => Msg::PollFailed {
                generation,
                reason: error.to_string(),
            },
            EngineEvent::ShutdownSent => Msg::ShutdownSent,
            EngineEvent::ShutdownFailed(err) => Msg::ShutdownFailed {
                reason: err.to_string(),
            },
            EngineEvent::Wake { token } => return self.timers.remove(&token),
        };
        Some(msg)
    }

    fn run(&mut self, effect: Effect) -> Option<Msg> {
        match effect {
            Effect::ResolvePath { current } => {
                let resolution = self.resolver.resolve(&mut self.cache, &current, now_ms());
                // resolve() purges stale entries even when nothing is chosen.
                self.save_cache();
                match resolution {
                    Resolution::Chosen(path) => Some(Msg::PathResolved(path)),
                    Resolution::Unchanged => None,
                }
            }
            Effect::ResolveFullPath { folder_name } => {
                let full_path = self
                    .full_path
                    .resolve(&mut self.cache, &folder_name, now_ms());
                self.save_cache();
                Some(Msg::FullPathResolved {
                    folder_name,
                    full_path,
                })
            }
            Effect::SubmitPack { output_path } => {
                autozip_info!("Packing into {}", output_path);
                self.engine.submit_pack(output_path);
                None
            }
            Effect::StartPoller { generation } => {
                self.engine.start_poller(generation);
                None
            }
            Effect::StopPoller => {
                self.engine.stop_poller();
                None
            }
            Effect::ScheduleBannerDismiss { banner_id, after } => {
                self.schedule(after, Msg::BannerExpired { banner_id });
                None
            }
            Effect::ConfirmShutdown => self
                .prompter
                .confirm(SHUTDOWN_QUESTION)
                .then_some(Msg::ShutdownConfirmed),
            Effect::SendShutdown => {
                self.engine.shutdown_server();
                None
            }
            Effect::CloseInterface { after } => {
                self.schedule(after, Msg::CloseRequested);
                None
            }
            Effect::ScheduleCloseFallback { after } => {
                self.schedule(after, Msg::CloseFallbackElapsed);
                None
            }
            Effect::Quit => {
                if self.exit_on_quit {
                    self.quit = true;
                } else {
                    autozip_info!("Staying open after quit request");
                }
                None
            }
        }
    }

    fn schedule(&mut self, after: Duration, msg: Msg) {
        self.next_token += 1;
        let token = self.next_token;
        self.timers.insert(token, msg);
        self.engine.wake_after(after, token);
    }

    fn save_cache(&self) {
        save_path_cache(&self.cache_file, &self.cache);
    }
}

/// Forwards engine events into the app channel until either side closes.
pub fn spawn_event_forwarder(events: mpsc::Receiver<EngineEvent>, tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        while let Ok(event) = events.recv() {
            if tx.send(AppEvent::Engine(event)).is_err() {
                return;
            }
        }
        autozip_warn!("Engine event channel closed");
        let _ = tx.send(AppEvent::EngineGone);
    });
}
