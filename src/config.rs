use std::path::{Path, PathBuf};

use crossterm::event::KeyCode;
use serde::Deserialize;

use crate::system::collector::DEFAULT_TOP_N;
use crate::system::source::DEFAULT_PROC_ROOT;

pub const MIN_REFRESH_SECS: u64 = 1;
pub const MAX_REFRESH_SECS: u64 = 10;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub colors: ColorsConfig,
    pub keybinds: KeybindsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub refresh_secs: u64,
    pub top_n: usize,
    pub proc_root: PathBuf,
    pub start_paused: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            refresh_secs: 1,
            top_n: DEFAULT_TOP_N,
            proc_root: PathBuf::from(DEFAULT_PROC_ROOT),
            start_paused: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub theme: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        ColorsConfig {
            theme: "dark".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KeybindsConfig {
    pub quit: String,
    pub pause: String,
    pub faster: String,
    pub slower: String,
}

impl Default for KeybindsConfig {
    fn default() -> Self {
        KeybindsConfig {
            quit: "q".to_string(),
            pause: "p".to_string(),
            faster: "+".to_string(),
            slower: "-".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file; nothing is logged when unset, since stdout is the UI.
    pub file: Option<PathBuf>,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            file: None,
            level: "info".to_string(),
        }
    }
}

/// Parses a keybind name from the config file.
pub fn parse_key(s: &str) -> Option<KeyCode> {
    match s {
        "Enter" => Some(KeyCode::Enter),
        "Esc" | "Escape" => Some(KeyCode::Esc),
        "Tab" => Some(KeyCode::Tab),
        "Space" => Some(KeyCode::Char(' ')),
        "Backspace" => Some(KeyCode::Backspace),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(KeyCode::Char(c)),
                _ => None,
            }
        }
    }
}

pub fn clamp_refresh_secs(secs: u64) -> u64 {
    secs.clamp(MIN_REFRESH_SECS, MAX_REFRESH_SECS)
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("topcpu").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}
