use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use fastlib_client::api::http::DEFAULT_BASE_URL;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_THEME: &str = "hacker";

/// On-disk TOML settings for the terminal client.
/// All fields are optional so partial files work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsFile {
    pub connection: Option<ConnectionConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub theme: Option<String>,
}

/// Final settings after CLI > env > file > default resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub timeout_secs: u64,
    pub theme: String,
}

/// Platform settings path: `<config_dir>/fastlib/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fastlib").join("config.toml"))
}

/// Default log file: `<cache_dir>/fastlib/fastlib-tui.log`.
pub fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("fastlib")
        .join("fastlib-tui.log")
}

/// Load settings by cascading CWD `.fastlib.toml` over the platform file.
/// CWD values override platform values.
pub fn load_settings() -> SettingsFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".fastlib.toml"));

    match (platform, cwd) {
        (None, None) => SettingsFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

pub fn load_from_path(path: &Path) -> Option<SettingsFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(settings) => Some(settings),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed settings file");
            None
        }
    }
}

/// Merge two settings files: `overlay` values take precedence over `base`.
pub fn merge(base: SettingsFile, overlay: SettingsFile) -> SettingsFile {
    SettingsFile {
        connection: Some(ConnectionConfig {
            api_url: overlay
                .connection
                .as_ref()
                .and_then(|c| c.api_url.clone())
                .or_else(|| base.connection.as_ref().and_then(|c| c.api_url.clone())),
            timeout_secs: overlay
                .connection
                .as_ref()
                .and_then(|c| c.timeout_secs)
                .or_else(|| base.connection.as_ref().and_then(|c| c.timeout_secs)),
        }),
        display: Some(DisplayConfig {
            theme: overlay
                .display
                .as_ref()
                .and_then(|d| d.theme.clone())
                .or_else(|| base.display.as_ref().and_then(|d| d.theme.clone())),
        }),
    }
}

/// Resolve every setting: overrides first, then the file, then defaults.
/// Empty strings and a zero timeout count as unset.
pub fn resolve(overrides: Overrides, file: &SettingsFile) -> Settings {
    let connection = file.connection.as_ref();
    let api_url = overrides
        .api_url
        .filter(|u| !u.trim().is_empty())
        .or_else(|| connection.and_then(|c| c.api_url.clone()))
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let timeout_secs = overrides
        .timeout_secs
        .filter(|t| *t > 0)
        .or_else(|| connection.and_then(|c| c.timeout_secs))
        .filter(|t| *t > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    let theme = overrides
        .theme
        .or_else(|| file.display.as_ref().and_then(|d| d.theme.clone()))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_THEME.to_string());

    Settings {
        api_url,
        timeout_secs,
        theme,
    }
}
