//! Message types for the application (TEA pattern)

use std::path::PathBuf;

use idsmon_daemon::BackendEvent;

use crate::config::{SaveOutcome, Settings};
use crate::input_key::InputKey;

/// All possible messages in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from the terminal
    Key(InputKey),

    /// Periodic tick from the event loop
    Tick,

    /// Quit (q, Ctrl+C, signal handler)
    Quit,

    /// Inbound event forwarded from the session client
    Backend(BackendEvent),

    // ─────────────────────────────────────────────────────────
    // Dashboard
    // ─────────────────────────────────────────────────────────
    StartScan,
    StopScan,
    NextModel,
    PrevModel,
    ToggleScanMode,

    // ─────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────
    ShowDashboard,
    ShowSettings,
    DismissNotification,

    // ─────────────────────────────────────────────────────────
    // Settings page
    // ─────────────────────────────────────────────────────────
    /// Settings store load finished (`Ok(None)` when nothing is saved yet)
    SettingsLoaded { result: Result<Option<Settings>, String> },
    SaveSettings,
    SettingsSaved {
        settings: Settings,
        outcome: SaveOutcome,
    },
    DiscardSettings,
    RefreshInterfaces,
    BrowseLogPath,
    /// `None` when the candidate is not a usable directory
    FolderSelected {
        candidate: PathBuf,
        path: Option<PathBuf>,
    },
    SettingsFocusNext,
    SettingsFocusPrev,
    /// Left/Right on the focused row
    SettingsCycle { forward: bool },
    SettingsInput(char),
    SettingsBackspace,
    SettingsClearField,
}
