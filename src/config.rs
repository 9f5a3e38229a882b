//! Configuration management for keycap.
//!
//! This module provides:
//! - TOML configuration file loading from `~/.keycap/config.toml`
//! - Key-reading timing and the default echo notation
//! - The 256-color palette used for echoes and menus
//!
//! # Configuration File
//!
//! ```toml
//! # Echo notation: shell, readline or repr
//! notation = "shell"
//!
//! # Ask for Up/Down/Enter/Esc at startup instead of assuming xterm keys
//! calibrate = true
//! # Arrow keys send ESC O A instead of ESC [ A (used when not calibrating)
//! application_cursor = false
//!
//! # Write the selected menu index at the top of the screen
//! show_index = false
//!
//! # Copy the shell notation of shown keys to the clipboard
//! copy_to_clipboard = false
//!
//! [timing]
//! sequence_timeout_ms = 50
//! poll_interval_ms = 10
//!
//! [colors]
//! user_input = 180
//! control_char = 202
//! ```
//!
//! Missing keys take their defaults. A file that fails to parse is ignored
//! with a warning in the log.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::Timing;
use crate::error::Result;
use crate::ui::Notation;

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Echo notation name
    pub notation: String,
    /// Calibrate navigation keys at startup
    pub calibrate: bool,
    /// xterm application cursor mode for the built-in bindings
    pub application_cursor: bool,
    /// Debug line with the selected menu index
    pub show_index: bool,
    /// Copy displayed keys to the clipboard
    pub copy_to_clipboard: bool,
    pub timing: TimingConfig,
    pub colors: ColorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notation: Notation::default().name().to_string(),
            calibrate: true,
            application_cursor: false,
            show_index: false,
            copy_to_clipboard: false,
            timing: TimingConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

/// Key-reading timing, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub sequence_timeout_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        let timing = Timing::default();
        Self {
            sequence_timeout_ms: timing.sequence_timeout.as_millis() as u64,
            poll_interval_ms: timing.poll_interval.as_millis() as u64,
        }
    }
}

/// 256-color palette indices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub user_input: u8,
    pub control_char: u8,
    /// Skipped indicator and unselected menu entries
    pub skipped: u8,
    /// Selected menu marker
    pub marker: u8,
    /// Debug index line
    pub index: u8,
    /// Key names in calibration prompts
    pub key_name: u8,
    pub heading_underline: bool,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            user_input: 180,
            control_char: 202,
            skipped: 8,
            marker: 2,
            index: 1,
            key_name: 3,
            heading_underline: true,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Self {
        match Self::get_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Self::default(),
        }
    }

    /// Load from an explicit path, falling back to defaults on any error
    pub fn load_from(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read config {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match Self::from_toml_str(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring invalid config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Parsed echo notation
    pub fn notation(&self) -> Result<Notation> {
        self.notation.parse()
    }

    /// Key-reading timing. A zero poll interval is raised to 1 ms.
    pub fn timing(&self) -> Timing {
        Timing {
            poll_interval: Duration::from_millis(self.timing.poll_interval_ms.max(1)),
            sequence_timeout: Duration::from_millis(self.timing.sequence_timeout_ms),
        }
    }

    /// Directory holding the config file and the log
    pub fn get_config_dir() -> Option<PathBuf> {
        home_dir().map(|home| home.join(".keycap"))
    }

    /// Get config file path
    pub fn get_config_path() -> Option<PathBuf> {
        Self::get_config_dir().map(|dir| dir.join("config.toml"))
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}
