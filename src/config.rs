use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::labels::LabelMode;
use crate::theme::{apply_overrides, Theme, ThemeOverrides};

const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Clone)]
pub struct RevdiffConfig {
    pub theme: Theme,
    pub label_mode: LabelMode,
    pub watch: bool,
    pub debounce_ms: u64,
    pub restore_session: bool,
}

impl Default for RevdiffConfig {
    fn default() -> Self {
        Self {
            theme: Theme::from_name("one-dark"),
            label_mode: LabelMode::Name,
            watch: true,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            restore_session: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    theme: Option<String>,
    #[serde(default)]
    colors: Option<ThemeOverrides>,
    #[serde(default)]
    label_mode: Option<LabelMode>,
    #[serde(default)]
    watch: Option<bool>,
    #[serde(default)]
    debounce_ms: Option<u64>,
    #[serde(default)]
    restore_session: Option<bool>,
}

fn config_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".config");
    path.push("revdiff");
    path.push("config.toml");
    path
}

/// Load config from `~/.config/revdiff/config.toml`, falling back to defaults.
pub fn load_config() -> RevdiffConfig {
    load_config_from(&config_path())
}

fn load_config_from(path: &Path) -> RevdiffConfig {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return RevdiffConfig::default(),
    };

    match toml::from_str::<ConfigFile>(&contents) {
        Ok(file) => from_file(file),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
            RevdiffConfig::default()
        }
    }
}

fn from_file(file: ConfigFile) -> RevdiffConfig {
    let defaults = RevdiffConfig::default();

    let theme_name = file.theme.as_deref().unwrap_or("one-dark");
    let mut theme = Theme::from_name(theme_name);
    if let Some(ref overrides) = file.colors {
        apply_overrides(&mut theme, overrides);
    }

    RevdiffConfig {
        theme,
        label_mode: file.label_mode.unwrap_or(defaults.label_mode),
        watch: file.watch.unwrap_or(defaults.watch),
        debounce_ms: file.debounce_ms.unwrap_or(defaults.debounce_ms),
        restore_session: file.restore_session.unwrap_or(defaults.restore_session),
    }
}
