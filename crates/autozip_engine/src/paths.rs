//! Obtaining an output path from the user.
//!
//! A [`PathResolver`] prefers a native [`FolderPicker`] when one is
//! available and falls back to a text [`Prompter`]. Both are traits so the
//! front end can plug in whatever the platform offers.

use std::path::Path;
use std::sync::Arc;

use autozip_core::{Millis, PathCache, ResolvedPath};
use autozip_logging::{autozip_debug, autozip_info, autozip_warn};

/// Outcome of one native picker invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Picked {
        /// Display name of the folder.
        name: String,
        /// Absolute path, when the platform exposes it.
        full_path: Option<String>,
    },
    /// The user closed the picker. Not an error.
    Aborted,
    /// The picker could not be shown or failed.
    Failed(String),
}

pub trait FolderPicker: Send + Sync {
    fn pick(&self) -> PickOutcome;
}

/// Interactive text questions.
pub trait Prompter: Send + Sync {
    /// Asks for a line of text pre-filled with `default`.
    ///
    /// `None` means the prompt was cancelled.
    fn prompt(&self, question: &str, default: &str) -> Option<String>;

    fn confirm(&self, question: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Chosen(ResolvedPath),
    /// Nothing was chosen; the previous path stays in place.
    Unchanged,
}

pub struct PathResolver {
    picker: Option<Box<dyn FolderPicker>>,
    prompter: Arc<dyn Prompter>,
    default_manual_path: String,
}

impl PathResolver {
    pub fn new(
        picker: Option<Box<dyn FolderPicker>>,
        prompter: Arc<dyn Prompter>,
        default_manual_path: impl Into<String>,
    ) -> Self {
        Self {
            picker,
            prompter,
            default_manual_path: default_manual_path.into(),
        }
    }

    pub fn has_picker(&self) -> bool {
        self.picker.is_some()
    }

    /// Path to show on startup, read from the cache without prompting.
    pub fn restore_last(&self, cache: &mut PathCache, now: Millis) -> Option<ResolvedPath> {
        purge(cache, now);
        cache.restore_last(now)
    }

    pub fn resolve(&self, cache: &mut PathCache, current: &str, now: Millis) -> Resolution {
        purge(cache, now);

        if let Some(picker) = &self.picker {
            match picker.pick() {
                PickOutcome::Picked { name, full_path } => {
                    autozip_info!("Picked folder {:?}", name);
                    cache.remember_folder(name.clone(), now);
                    if let Some(full) = &full_path {
                        cache.remember_full_path(name.clone(), full.clone(), now);
                    }
                    return Resolution::Chosen(ResolvedPath::picked(name, full_path));
                }
                PickOutcome::Aborted => {
                    autozip_debug!("Folder picker cancelled");
                    return Resolution::Unchanged;
                }
                PickOutcome::Failed(reason) => {
                    autozip_warn!("Folder picker failed, asking for a path instead: {}", reason);
                }
            }
        }

        self.prompt_manual(cache, current, now)
    }

    fn prompt_manual(&self, cache: &mut PathCache, current: &str, now: Millis) -> Resolution {
        let default = cache
            .manual_path(now)
            .map(ToOwned::to_owned)
            .or_else(|| Some(current.trim().to_owned()).filter(|c| !c.is_empty()))
            .unwrap_or_else(|| self.default_manual_path.clone());

        let Some(answer) = self.prompter.prompt("Enter the output folder path:", &default) else {
            return Resolution::Unchanged;
        };
        let trimmed = answer.trim();
        if trimmed.is_empty() {
            return Resolution::Unchanged;
        }

        cache.remember_manual(trimmed, now);
        Resolution::Chosen(ResolvedPath::manual(trimmed))
    }
}

fn purge(cache: &mut PathCache, now: Millis) {
    let removed = cache.purge_expired(now);
    if removed > 0 {
        autozip_debug!("Purged {} expired path cache entries", removed);
    }
}

/// Turns a picker folder name into an absolute filesystem path.
///
/// Some pickers only hand out a display name; this is the pluggable
/// capability that fills the gap, and it may be unavailable.
pub trait FullPathResolver: Send + Sync {
    fn resolve(&self, cache: &mut PathCache, folder_name: &str, now: Millis) -> Option<String>;
}

/// Capability absent: the folder name is sent as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFullPath;

impl FullPathResolver for NoFullPath {
    fn resolve(&self, _cache: &mut PathCache, _folder_name: &str, _now: Millis) -> Option<String> {
        None
    }
}

/// Uses the cached mapping when fresh, otherwise asks once and remembers
/// the answer.
pub struct CachedPromptFullPath {
    prompter: Arc<dyn Prompter>,
    home_dir: String,
}

impl CachedPromptFullPath {
    pub fn new(prompter: Arc<dyn Prompter>, home_dir: impl Into<String>) -> Self {
        Self {
            prompter,
            home_dir: home_dir.into(),
        }
    }
}

impl FullPathResolver for CachedPromptFullPath {
    fn resolve(&self, cache: &mut PathCache, folder_name: &str, now: Millis) -> Option<String> {
        if let Some(saved) = cache.full_path(folder_name, now) {
            autozip_debug!("Using saved full path for {:?}", folder_name);
            return Some(saved.to_owned());
        }

        let default = cache
            .full_path_any_age(folder_name)
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| {
                Path::new(&self.home_dir)
                    .join(folder_name)
                    .display()
                    .to_string()
            });
        let question = format!(
            "You chose the folder: {folder_name}\n\
             The picker cannot see its location; enter the full path\n\
             (it is remembered for the next 24 hours):"
        );
        let answer = self.prompter.prompt(&question, &default)?;
        let trimmed = answer.trim();
        if trimmed.is_empty() {
            return None;
        }
        cache.remember_full_path(folder_name, trimmed, now);
        Some(trimmed.to_owned())
    }
}
