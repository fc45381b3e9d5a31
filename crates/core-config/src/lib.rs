//! Configuration loading and parsing.
//!
//! Parses `linewin.toml` (or an override path supplied by the binary):
//!
//! ```toml
//! [window]
//! start_line = 1
//! capacity = 24
//!
//! [output]
//! json = false
//! ```
//!
//! Missing sections and fields fall back to defaults. Unknown fields are
//! ignored so older binaries tolerate newer files. A file that fails to parse
//! degrades to defaults with a warning rather than aborting.
//!
//! The configured capacity is retained in `file`; the effective capacity is
//! clamped against the host viewport in `Config::apply_context`.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "linewin.toml";

/// Host viewport facts the window capacity is clamped against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigContext {
    /// Total rows of the host view; `0` when unknown.
    pub viewport_rows: u16,
    /// Rows reserved for non-text chrome (status line and the like).
    pub status_rows: u16,
}

impl ConfigContext {
    pub fn new(viewport_rows: u16, status_rows: u16) -> Self {
        Self {
            viewport_rows,
            status_rows,
        }
    }

    pub fn text_rows(&self) -> u16 {
        self.viewport_rows.saturating_sub(self.status_rows)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    #[serde(default = "WindowConfig::default_start_line")]
    pub start_line: usize,
    #[serde(default = "WindowConfig::default_capacity")]
    pub capacity: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            start_line: Self::default_start_line(),
            capacity: Self::default_capacity(),
        }
    }
}

impl WindowConfig {
    const fn default_start_line() -> usize {
        1
    }
    const fn default_capacity() -> usize {
        24
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub file: ConfigFile,             // parsed (or default) data
    pub effective_start_line: usize,  // raised to 1 when the file says 0
    pub effective_capacity: usize,    // clamped to viewport text rows
}

impl Default for Config {
    fn default() -> Self {
        Self::from_file(ConfigFile::default())
    }
}

/// Config path following platform conventions: local `linewin.toml` first,
/// then `<config_dir>/linewin/linewin.toml`.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("linewin").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => Ok(Config::from_file(file)),
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

impl Config {
    fn from_file(file: ConfigFile) -> Self {
        let effective_start_line = file.window.start_line.max(1);
        let effective_capacity = file.window.capacity;
        Self {
            file,
            effective_start_line,
            effective_capacity,
        }
    }

    /// Apply viewport context to compute the clamped window capacity.
    /// A context with no known text rows leaves the configured value alone.
    /// Returns the effective value.
    pub fn apply_context(&mut self, ctx: ConfigContext) -> usize {
        let raw = self.file.window.capacity;
        let text_rows = ctx.text_rows() as usize;
        let clamped = if text_rows == 0 {
            raw
        } else {
            raw.min(text_rows)
        };

        if clamped != raw {
            info!(
                target: "config",
                raw,
                clamped,
                text_rows,
                viewport_rows = ctx.viewport_rows,
                status_rows = ctx.status_rows,
                "window_capacity_clamped"
            );
        }
        self.effective_capacity = clamped;
        clamped
    }
}
