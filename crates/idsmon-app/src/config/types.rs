//! Configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use idsmon_core::feed::DEFAULT_FEED_CAPACITY;
use idsmon_core::types::{ModelKind, ScanMode};
use idsmon_daemon::DEFAULT_ENDPOINT;

// ─────────────────────────────────────────────────────────
// config.toml
// ─────────────────────────────────────────────────────────

/// Application configuration from `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub dashboard: DashboardConfig,
    pub replay: ReplayConfig,
    pub ui: UiConfig,
}

/// `[backend]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// WebSocket endpoint of the backend
    pub endpoint: String,
    /// Backend executable to launch, relative paths resolve against the config dir
    pub executable: Option<PathBuf>,
    /// Extra arguments placed before the log directory
    pub args: Vec<String>,
    pub startup_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            executable: None,
            args: Vec::new(),
            startup_timeout_secs: 60,
        }
    }
}

/// `[dashboard]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Cap for both the log and the alert list
    pub max_entries: usize,
    pub default_model: ModelKind,
    pub default_mode: ScanMode,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_FEED_CAPACITY,
            default_model: ModelKind::default(),
            default_mode: ScanMode::default(),
        }
    }
}

/// `[replay]` section, sent with scans started in replay mode.
///
/// Paths are passed to the backend untouched; they name files on the
/// backend host. Unset fields fall back to the backend's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    pub csv_path: Option<PathBuf>,
    pub delay_ms: Option<u64>,
    pub max_flows: Option<u64>,
    pub start_row: Option<u64>,
    pub end_row: Option<u64>,
}

impl ReplayConfig {
    pub fn is_ready(&self) -> bool {
        self.csv_path
            .as_ref()
            .is_some_and(|p| !p.as_os_str().is_empty())
    }
}

/// `[ui]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub show_timestamps: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_timestamps: true,
        }
    }
}

// ─────────────────────────────────────────────────────────
// settings.toml
// ─────────────────────────────────────────────────────────

/// Whether the monitor should start with the OS session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartOnBoot {
    On,
    #[default]
    Off,
}

impl StartOnBoot {
    pub fn toggle(&self) -> Self {
        match self {
            StartOnBoot::On => StartOnBoot::Off,
            StartOnBoot::Off => StartOnBoot::On,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StartOnBoot::On => "on",
            StartOnBoot::Off => "off",
        }
    }
}

/// User settings blob edited on the settings page.
///
/// Empty strings mean "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Adapter display name
    pub capture_interface: String,
    /// Adapter identifier sent to the backend
    pub guid: String,
    pub log_path: String,
    pub start_on_boot: StartOnBoot,
}

impl Settings {
    /// Interface to send with `start_scan`: the GUID, or `None` to let the
    /// backend auto-detect.
    pub fn resolved_interface(&self) -> Option<String> {
        non_empty(&self.guid)
    }

    pub fn capture_interface(&self) -> Option<String> {
        non_empty(&self.capture_interface)
    }

    /// Whether any interface has been chosen.
    pub fn has_interface(&self) -> bool {
        !self.guid.trim().is_empty() || !self.capture_interface.trim().is_empty()
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}
