//! Configuration loading and parsing.
//!
//! Parses `kiosk.toml` (or an override path provided by the binary). Every
//! section is optional and unknown keys are ignored so older files keep
//! working. A missing file yields defaults silently; a file that fails to
//! parse yields defaults with a warning.
//!
//! Recognised sections:
//! - `[layouts] files`: ordered layout documents, which is also the cyclic
//!   navigation order.
//! - `[icons] dir`: where icon images are loaded from.
//! - `[refresh] interval_ms`: periodic text field refresh cadence.
//! - `[style]`: `#RRGGBB` colours and `border_width`.
//! - `[quit] message`: confirmation shown by the `quit` action.
//!
//! Relative paths resolve against the directory of the file the config
//! was read from, or the working directory when running on defaults.

use anyhow::Result;
use core_render::{Color, FrameStyle};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const CONFIG_FILE_NAME: &str = "kiosk.toml";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LayoutsConfig {
    #[serde(default = "LayoutsConfig::default_files")]
    pub files: Vec<PathBuf>,
}

impl Default for LayoutsConfig {
    fn default() -> Self {
        Self {
            files: Self::default_files(),
        }
    }
}

impl LayoutsConfig {
    fn default_files() -> Vec<PathBuf> {
        vec![
            PathBuf::from("layouts/layout1.json"),
            PathBuf::from("layouts/layout2.json"),
        ]
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct IconsConfig {
    #[serde(default = "IconsConfig::default_dir")]
    pub dir: PathBuf,
}

impl Default for IconsConfig {
    fn default() -> Self {
        Self {
            dir: Self::default_dir(),
        }
    }
}

impl IconsConfig {
    fn default_dir() -> PathBuf {
        PathBuf::from("icons")
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct RefreshConfig {
    #[serde(default = "RefreshConfig::default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_ms: Self::default_interval_ms(),
        }
    }
}

impl RefreshConfig {
    const fn default_interval_ms() -> u64 {
        1000
    }
}

/// Raw style overrides. Colours stay strings until [`Config::frame_style`]
/// so one bad value only loses that value.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct StyleConfig {
    pub button_fill: Option<String>,
    pub button_text: Option<String>,
    pub field_fill: Option<String>,
    pub field_text: Option<String>,
    pub border: Option<String>,
    pub border_width: Option<f32>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct QuitConfig {
    #[serde(default = "QuitConfig::default_message")]
    pub message: String,
}

impl Default for QuitConfig {
    fn default() -> Self {
        Self {
            message: Self::default_message(),
        }
    }
}

impl QuitConfig {
    fn default_message() -> String {
        "Exiting...".to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub layouts: LayoutsConfig,
    #[serde(default)]
    pub icons: IconsConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub quit: QuitConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>,     // file contents as read
    pub file: ConfigFile,        // parsed (or default) data
    pub source: Option<PathBuf>, // file the values came from
}

/// Best-effort config path: `./kiosk.toml`, then the platform config dir
/// (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("gridkiosk").join(CONFIG_FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        debug!(target: "config", path = %path.display(), "config_absent_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(
                target: "config",
                path = %path.display(),
                layouts = file.layouts.files.len(),
                "config_loaded"
            );
            Ok(Config {
                raw: Some(content),
                file,
                source: Some(path),
            })
        }
        Err(err) => {
            warn!(target: "config", path = %path.display(), %err, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Directory relative paths resolve against.
    pub fn base_dir(&self) -> PathBuf {
        self.source
            .as_deref()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir().join(path)
        }
    }

    /// Layout document paths in navigation order.
    pub fn layout_paths(&self) -> Vec<PathBuf> {
        self.file
            .layouts
            .files
            .iter()
            .map(|p| self.resolve(p))
            .collect()
    }

    pub fn icon_dir(&self) -> PathBuf {
        self.resolve(&self.file.icons.dir)
    }

    /// Refresh cadence; zero falls back to the default.
    pub fn refresh_interval(&self) -> Duration {
        let ms = match self.file.refresh.interval_ms {
            0 => {
                warn!(target: "config", "refresh_interval_zero_using_default");
                RefreshConfig::default_interval_ms()
            }
            ms => ms,
        };
        Duration::from_millis(ms)
    }

    pub fn quit_message(&self) -> &str {
        &self.file.quit.message
    }

    /// Apply `[style]` overrides on top of `base`. Invalid entries keep the
    /// base value and log a warning.
    pub fn frame_style(&self, base: FrameStyle) -> FrameStyle {
        let s = &self.file.style;
        let mut style = base;
        apply_color(&mut style.button_fill, s.button_fill.as_deref(), "button_fill");
        apply_color(&mut style.button_text, s.button_text.as_deref(), "button_text");
        apply_color(&mut style.field_fill, s.field_fill.as_deref(), "field_fill");
        apply_color(&mut style.field_text, s.field_text.as_deref(), "field_text");
        apply_color(&mut style.border, s.border.as_deref(), "border");
        match s.border_width {
            Some(w) if w.is_finite() && w >= 0.0 => style.border_width = w,
            Some(w) => warn!(target: "config", key = "border_width", value = w, "style_value_invalid"),
            None => {}
        }
        style
    }
}

fn apply_color(slot: &mut Color, value: Option<&str>, key: &'static str) {
    let Some(value) = value else { return };
    match Color::parse_hex(value) {
        Some(color) => *slot = color,
        None => warn!(target: "config", key, value, "style_value_invalid"),
    }
}
