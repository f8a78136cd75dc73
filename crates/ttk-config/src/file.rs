//! The literal TOML shape. Every field is optional or `serde(default)` so a
//! partial file, or no file at all, always deserialises successfully;
//! [`Config::from_file`](crate::Config) fills in the rest from defaults.

use serde::Deserialize;

use crate::{InputConfig, LoggingConfig, RenderConfig};

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ColorPairFile {
    pub id: u16,
    pub fg: (u8, u8, u8),
    pub bg: (u8, u8, u8),
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct RenderConfigFile {
    pub cell_width_px: Option<u16>,
    pub cell_height_px: Option<u16>,
    pub font_family: Option<String>,
    #[serde(default)]
    pub color_pairs: Vec<ColorPairFile>,
    pub max_color_pairs: Option<usize>,
}

impl RenderConfigFile {
    pub(crate) fn into_effective(self) -> RenderConfig {
        let default = RenderConfig::default();
        RenderConfig {
            cell_width_px: self.cell_width_px.unwrap_or(default.cell_width_px),
            cell_height_px: self.cell_height_px.unwrap_or(default.cell_height_px),
            font_family: self.font_family.unwrap_or(default.font_family),
            color_pairs: self
                .color_pairs
                .into_iter()
                .map(|p| ttk_grid::ColorPair {
                    fg_rgb: ttk_grid::Rgb(p.fg.0, p.fg.1, p.fg.2),
                    bg_rgb: ttk_grid::Rgb(p.bg.0, p.bg.1, p.bg.2),
                })
                .collect(),
            max_color_pairs: self.max_color_pairs.unwrap_or(default.max_color_pairs).max(ttk_grid::MIN_COLOR_PAIRS),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct LoggingConfigFile {
    pub log_pane_enabled: Option<bool>,
    pub stream_output_enabled: Option<bool>,
    pub remote_monitoring_enabled: Option<bool>,
    pub remote_port: Option<u16>,
    pub default_level: Option<String>,
    #[serde(default)]
    pub logger_levels: std::collections::BTreeMap<String, String>,
    pub max_log_messages: Option<usize>,
}

impl LoggingConfigFile {
    pub(crate) fn into_effective(self) -> LoggingConfig {
        let default = LoggingConfig::default();
        LoggingConfig {
            log_pane_enabled: self.log_pane_enabled.unwrap_or(default.log_pane_enabled),
            stream_output_enabled: self.stream_output_enabled,
            remote_monitoring_enabled: self
                .remote_monitoring_enabled
                .unwrap_or(default.remote_monitoring_enabled),
            remote_port: self.remote_port,
            default_level: self.default_level.unwrap_or(default.default_level),
            logger_levels: self.logger_levels.into_iter().collect(),
            max_log_messages: self.max_log_messages.unwrap_or(default.max_log_messages),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct InputConfigFile {
    /// Defaults to "ANSI"; other values are reserved and fall back to ANSI
    /// rather than failing to parse.
    pub keyboard_layout: Option<String>,
}

impl InputConfigFile {
    pub(crate) fn into_effective(self) -> InputConfig {
        let layout = match self.keyboard_layout.as_deref() {
            Some("ANSI") | Some("ansi") | None => ttk_events::KeyboardLayout::Ansi,
            Some(_) => ttk_events::KeyboardLayout::Ansi,
        };
        InputConfig { layout }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub rendering: RenderConfigFile,
    #[serde(default)]
    pub logging: LoggingConfigFile,
    #[serde(default)]
    pub input: InputConfigFile,
}
