use std::collections::VecDeque;
use std::path::Path;
use std::sync::{mpsc, Arc};

use anyhow::Context;
use autozip_core::{update, AppState, Lifecycle, Msg};
use autozip_engine::{
    CachedPromptFullPath, EngineConfig, EngineHandle, FolderPicker, FullPathResolver,
    PathResolver, Prompter,
};
use autozip_logging::autozip_info;
use colored::Colorize;

use super::config::{Args, Settings};
use super::console::{spawn_stdin_reader, AppEvent, ConsolePrompter, Inbox, CANCEL_WORD};
use super::effects::{spawn_event_forwarder, EffectRunner, RunnerParts};
use super::persistence::load_path_cache;
use super::picker::{picker_available, RfdFolderPicker};
use super::{logging, ui};

pub fn run_app() -> anyhow::Result<()> {
    let args: Args = argh::from_env();
    let settings = Settings::load(args)?;
    logging::initialize(settings.log);
    autozip_info!("Starting with {:?}", settings);

    let mut engine_config = EngineConfig::new(settings.server_url.clone());
    engine_config.poll_interval = settings.poll_interval;
    let (engine, engine_events) = EngineHandle::new(&engine_config)
        .with_context(|| format!("starting client for {}", settings.server_url))?;

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    spawn_event_forwarder(engine_events, event_tx.clone());
    spawn_stdin_reader(event_tx);

    let inbox = Arc::new(Inbox::new(event_rx));
    let prompter: Arc<dyn Prompter> = Arc::new(ConsolePrompter::new(inbox.clone()));

    let picker: Option<Box<dyn FolderPicker>> = if picker_available(settings.picker_enabled) {
        Some(Box::new(RfdFolderPicker))
    } else {
        None
    };
    let resolver = PathResolver::new(picker, prompter.clone(), settings.default_manual_path.clone());
    if !resolver.has_picker() {
        autozip_info!("Native folder dialog unavailable; using console prompts");
    }
    // The dialog hands back absolute paths, so this only runs for picker
    // names restored from an older cache.
    let full_path: Box<dyn FullPathResolver> = Box::new(CachedPromptFullPath::new(
        prompter.clone(),
        settings.home_dir.clone(),
    ));

    let mut runner = EffectRunner::new(RunnerParts {
        engine,
        resolver,
        full_path,
        prompter,
        cache: load_path_cache(&settings.cache_file),
        cache_file: settings.cache_file.clone(),
        exit_on_quit: settings.exit_on_shutdown,
    });

    print_banner(&settings.server_url, &settings.cache_file);

    let mut app = App::new();
    match runner.restore_last() {
        Some(restored) => app.dispatch(Msg::PathRestored(restored), &mut runner),
        None => app.render(true),
    }

    // Scripted runs close stdin right after `pack`; the job still finishes.
    let mut input_closed = false;
    while let Some(event) = inbox.next() {
        let msg = match event {
            AppEvent::Line(line) => match ui::commands::parse(&line) {
                ui::commands::Command::Dispatch(msg) => msg,
                ui::commands::Command::Status => {
                    app.render(true);
                    continue;
                }
                ui::commands::Command::Help => {
                    print_help();
                    continue;
                }
                ui::commands::Command::Quit => break,
                ui::commands::Command::Empty => continue,
                ui::commands::Command::Unknown(word) => {
                    println!("{} '{}', type 'help'", "Unknown command".yellow(), word);
                    continue;
                }
            },
            AppEvent::InputClosed => {
                input_closed = true;
                if app.busy() {
                    autozip_info!("Input closed, waiting for the running job");
                    continue;
                }
                break;
            }
            AppEvent::Engine(event) => match runner.translate(event) {
                Some(msg) => msg,
                None => continue,
            },
            AppEvent::EngineGone => Msg::EngineUnavailable,
        };

        app.dispatch(msg, &mut runner);
        if runner.quit_requested() || (input_closed && !app.busy()) {
            break;
        }
    }

    app.dispatch(Msg::Teardown, &mut runner);
    autozip_info!("Client finished");
    Ok(())
}

struct App {
    state: AppState,
}

impl App {
    fn new() -> Self {
        Self {
            state: AppState::new(),
        }
    }

    /// Runs `msg` and every message its effects produce.
    fn dispatch(&mut self, msg: Msg, runner: &mut EffectRunner) {
        let mut pending = VecDeque::from([msg]);
        while let Some(msg) = pending.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            // Render before effects that may block on a prompt.
            self.render(false);
            pending.extend(runner.enqueue(effects));
        }
    }

    /// A pack request or its status polling is still outstanding.
    fn busy(&self) -> bool {
        self.state.lifecycle() != Lifecycle::Idle
    }

    fn render(&mut self, force: bool) {
        let dirty = self.state.consume_dirty();
        if !(dirty || force) {
            return;
        }
        println!();
        for line in ui::render::render(&self.state.view()) {
            println!("{line}");
        }
    }
}

fn print_banner(server_url: &str, cache_file: &Path) {
    println!("{}", "AutoZIP client".bold());
    println!("Server: {server_url}");
    autozip_info!("Path cache at {:?}", cache_file);
}

fn print_help() {
    for (command, description) in ui::commands::HELP {
        println!("  {:<16} {}", command.bold(), description);
    }
    println!("  At a prompt, press Enter to accept the suggestion or type '{CANCEL_WORD}'.");
}
