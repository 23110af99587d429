//! Command-line flags and the optional RON config file.
//!
//! Flags win over the file; the file wins over built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use argh::FromArgs;
use autozip_engine::{DEFAULT_POLL_INTERVAL, DEFAULT_SERVER_URL};
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

const DEFAULT_CONFIG_FILE: &str = "autozip.ron";
const DEFAULT_CACHE_FILE: &str = ".autozip_cache.ron";
const MIN_POLL_MS: u64 = 50;

#[derive(FromArgs, Debug, Default)]
/// Terminal client for the AutoZIP packaging server.
pub struct Args {
    /// base URL of the packaging server (default http://localhost:5000)
    #[argh(option)]
    pub server: Option<String>,

    /// RON config file to read (default ./autozip.ron when present)
    #[argh(option)]
    pub config: Option<PathBuf>,

    /// file that remembers recent output paths
    #[argh(option)]
    pub cache_file: Option<PathBuf>,

    /// status poll interval in milliseconds
    #[argh(option)]
    pub poll_ms: Option<u64>,

    /// never open the native folder dialog; always ask on the console
    #[argh(switch)]
    pub no_picker: bool,

    /// log destination: file, terminal or both
    #[argh(option)]
    pub log: Option<LogDestination>,
}

/// Contents of `autozip.ron`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server_url: String,
    pub poll_interval_ms: u64,
    pub cache_file: PathBuf,
    pub picker_enabled: bool,
    /// Pre-fill of the manual path prompt when nothing better is known.
    pub default_manual_path: Option<String>,
    /// Base of the suggested absolute path for picker folders.
    pub home_dir: Option<String>,
    pub log: LogDestination,
    /// Leave the console after a completed server shutdown.
    pub exit_on_shutdown: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            cache_file: PathBuf::from(DEFAULT_CACHE_FILE),
            picker_enabled: true,
            default_manual_path: None,
            home_dir: None,
            log: LogDestination::File,
            exit_on_shutdown: true,
        }
    }
}

/// Effective settings after merging flags, file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub poll_interval: Duration,
    pub cache_file: PathBuf,
    pub picker_enabled: bool,
    pub default_manual_path: String,
    pub home_dir: String,
    pub log: LogDestination,
    pub exit_on_shutdown: bool,
}

impl Settings {
    pub fn load(args: Args) -> anyhow::Result<Self> {
        let file = match &args.config {
            Some(path) => read_config(path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    read_config(path)?
                } else {
                    FileConfig::default()
                }
            }
        };
        Self::merge(args, file)
    }

    fn merge(args: Args, file: FileConfig) -> anyhow::Result<Self> {
        let poll_ms = args.poll_ms.unwrap_or(file.poll_interval_ms);
        if poll_ms < MIN_POLL_MS {
            bail!("poll interval must be at least {MIN_POLL_MS} ms, got {poll_ms}");
        }

        let home_dir = file.home_dir.unwrap_or_else(home_dir);
        let default_manual_path = file
            .default_manual_path
            .unwrap_or_else(|| platform_default_path(&home_dir));

        Ok(Self {
            server_url: args.server.unwrap_or(file.server_url),
            poll_interval: Duration::from_millis(poll_ms),
            cache_file: args.cache_file.unwrap_or(file.cache_file),
            picker_enabled: file.picker_enabled && !args.no_picker,
            default_manual_path,
            home_dir,
            log: args.log.unwrap_or(file.log),
            exit_on_shutdown: file.exit_on_shutdown,
        })
    }
}

fn read_config(path: &Path) -> anyhow::Result<FileConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    ron::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
}

fn home_dir() -> String {
    std::env::var("USERPROFILE")
        .or_else(|_| std::env::var("HOME"))
        .unwrap_or_else(|_| ".".to_string())
}

fn platform_default_path(home_dir: &str) -> String {
    if cfg!(windows) {
        "C:\\".to_string()
    } else {
        home_dir.to_string()
    }
}
