//! Console input plumbing.
//!
//! Everything the main loop reacts to arrives on one channel: lines typed
//! by the user and messages produced by the engine. Prompts pull lines from
//! the same channel so a question never races the command reader for stdin.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use autozip_engine::{EngineEvent, Prompter};
use autozip_logging::autozip_debug;
use colored::Colorize;

/// Typing this at a prompt dismisses it.
pub const CANCEL_WORD: &str = "cancel";

#[derive(Debug)]
pub enum AppEvent {
    /// One line typed on stdin, without the newline.
    Line(String),
    /// stdin reached end of file.
    InputClosed,
    Engine(EngineEvent),
    /// The engine event channel closed unexpectedly.
    EngineGone,
}

/// Single consumer of [`AppEvent`]s.
///
/// Events skipped while a prompt waits for a line are kept and handed out
/// afterwards in arrival order.
pub struct Inbox {
    rx: Mutex<mpsc::Receiver<AppEvent>>,
    backlog: Mutex<VecDeque<AppEvent>>,
}

impl Inbox {
    pub fn new(rx: mpsc::Receiver<AppEvent>) -> Self {
        Self {
            rx: Mutex::new(rx),
            backlog: Mutex::new(VecDeque::new()),
        }
    }

    /// Blocks for the next event; `None` once every sender is gone.
    pub fn next(&self) -> Option<AppEvent> {
        if let Some(event) = self.lock_backlog().pop_front() {
            return Some(event);
        }
        let rx = self.rx.lock().ok()?;
        rx.recv().ok()
    }

    /// Blocks for the next typed line, setting other events aside.
    ///
    /// Lines already in the backlog count: they were typed before the
    /// prompt appeared.
    pub fn next_line(&self) -> Option<String> {
        {
            let mut backlog = self.lock_backlog();
            if let Some(pos) = backlog
                .iter()
                .position(|event| matches!(event, AppEvent::Line(_) | AppEvent::InputClosed))
            {
                return match backlog.remove(pos) {
                    Some(AppEvent::Line(line)) => Some(line),
                    Some(closed) => {
                        backlog.insert(pos, closed);
                        None
                    }
                    None => None,
                };
            }
        }

        let rx = self.rx.lock().ok()?;
        loop {
            match rx.recv().ok()? {
                AppEvent::Line(line) => return Some(line),
                AppEvent::InputClosed => {
                    self.lock_backlog().push_back(AppEvent::InputClosed);
                    return None;
                }
                other => self.lock_backlog().push_back(other),
            }
        }
    }

    fn lock_backlog(&self) -> std::sync::MutexGuard<'_, VecDeque<AppEvent>> {
        self.backlog
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Reads stdin line by line on its own thread.
pub fn spawn_stdin_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(AppEvent::Line(line)).is_err() {
                return;
            }
        }
        autozip_debug!("stdin closed");
        let _ = tx.send(AppEvent::InputClosed);
    });
}

/// Asks questions on the console.
pub struct ConsolePrompter {
    inbox: Arc<Inbox>,
}

impl ConsolePrompter {
    pub fn new(inbox: Arc<Inbox>) -> Self {
        Self { inbox }
    }
}

impl Prompter for ConsolePrompter {
    fn prompt(&self, question: &str, default: &str) -> Option<String> {
        print!("{} [{}] ", question.bold(), default.dimmed());
        let _ = io::stdout().flush();
        let line = self.inbox.next_line()?;
        interpret_answer(&line, default)
    }

    fn confirm(&self, question: &str) -> bool {
        print!("{} [y/N] ", question.bold());
        let _ = io::stdout().flush();
        self.inbox
            .next_line()
            .is_some_and(|line| is_yes(&line))
    }
}

/// Empty input accepts the pre-filled default; the cancel word dismisses.
fn interpret_answer(line: &str, default: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case(CANCEL_WORD) {
        None
    } else if trimmed.is_empty() {
        Some(default.to_string())
    } else {
        Some(trimmed.to_string())
    }
}

fn is_yes(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
