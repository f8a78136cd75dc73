//! Typed configuration record consumed by the core at backend `init()`
//! (§4.9/§6). Split, in the teacher's style, between the literal
//! serde-deserialised file shape (`ConfigFile`, all fields optional or
//! `serde(default)`) and the fully-populated effective record (`Config`)
//! the rest of the toolkit actually reads.
//!
//! `Config::load` never hard-fails: a missing or malformed file falls back
//! to `Config::default()` with a logged warning, mirroring the teacher's
//! `load_from` graceful-fallback behaviour. `ConfigError` exists for callers
//! that want to distinguish a parse failure explicitly (e.g. a settings-UI
//! validating a file before writing it).

pub mod file;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;
use ttk_events::KeyboardLayout;
use ttk_grid::ColorPair;

pub use file::{ColorPairFile, ConfigFile, InputConfigFile, LoggingConfigFile, RenderConfigFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to parse config file {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
}

/// Rendering defaults, matched to a typical 80x24 terminal cell size.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub cell_width_px: u16,
    pub cell_height_px: u16,
    pub font_family: String,
    pub color_pairs: Vec<ColorPair>,
    pub max_color_pairs: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            cell_width_px: 8,
            cell_height_px: 16,
            font_family: "monospace".to_string(),
            color_pairs: Vec::new(),
            max_color_pairs: ttk_grid::MIN_COLOR_PAIRS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub log_pane_enabled: bool,
    /// `None` resolves to "auto from mode" at `TtkLogger::init` time.
    pub stream_output_enabled: Option<bool>,
    pub remote_monitoring_enabled: bool,
    pub remote_port: Option<u16>,
    pub default_level: String,
    pub logger_levels: Vec<(String, String)>,
    pub max_log_messages: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_pane_enabled: true,
            stream_output_enabled: None,
            remote_monitoring_enabled: false,
            remote_port: None,
            default_level: "info".to_string(),
            logger_levels: Vec::new(),
            max_log_messages: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputConfig {
    pub layout: KeyboardLayout,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig { layout: KeyboardLayout::Ansi }
    }
}

/// The effective, fully-populated configuration record the core consumes.
/// Consumed by value at backend `init()`; changing it afterwards requires a
/// fresh `init()` call (no hot-reload).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub rendering: RenderConfig,
    pub logging: LoggingConfig,
    pub input: InputConfig,
}

impl Config {
    /// Best-effort config path: a local `ttk.toml` in the working directory,
    /// else the platform config dir.
    pub fn discover() -> PathBuf {
        let local = PathBuf::from("ttk.toml");
        if local.exists() {
            return local;
        }
        dirs::config_dir().map(|dir| dir.join("ttk").join("ttk.toml")).unwrap_or(local)
    }

    /// Loads from `path`, or from [`Config::discover`] if `path` is `None`.
    /// Never fails: a missing file, an unreadable file, or a parse error all
    /// fall back to [`Config::default`] with a logged warning.
    pub fn load(path: Option<&Path>) -> Config {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Config::discover);
        match Self::load_strict(&path) {
            Ok(config) => config,
            Err(err) => {
                warn!(target: "ttk::config", path = %path.display(), error = %err, "falling back to default config");
                Config::default()
            }
        }
    }

    /// As [`Config::load`], but returns the parse/read error instead of
    /// silently falling back — for callers (e.g. a settings UI) that need to
    /// report a bad file to the user.
    pub fn load_strict(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let file: ConfigFile = toml::from_str(&content)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        Ok(Config::from_file(file))
    }

    fn from_file(file: ConfigFile) -> Config {
        Config {
            rendering: file.rendering.into_effective(),
            logging: file.logging.into_effective(),
            input: file.input.into_effective(),
        }
    }
}
