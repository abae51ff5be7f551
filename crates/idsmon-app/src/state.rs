//! Application state (Model in TEA pattern)

use crate::config::{AppConfig, Settings};
use crate::dashboard::{Controls, DashboardState};
use crate::settings_form::SettingsForm;

/// Lifecycle of the application loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Running,
    Quitting,
}

/// Current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiMode {
    #[default]
    Dashboard,
    Settings,
}

/// Link state as reported by the session client, for display only
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected { endpoint: String },
    /// Link dropped after being up; the client does not reconnect.
    Lost { reason: Option<String> },
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected { .. })
    }

    pub fn label(&self) -> String {
        match self {
            ConnectionStatus::Disconnected => "disconnected".to_string(),
            ConnectionStatus::Connecting => "connecting".to_string(),
            ConnectionStatus::Connected { endpoint } => format!("connected to {endpoint}"),
            ConnectionStatus::Lost { reason: Some(r) } => format!("connection lost: {r}"),
            ConnectionStatus::Lost { reason: None } => "connection closed".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

/// Blocking modal shown over the current screen until dismissed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::build(NotificationKind::Info, title, message)
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::build(NotificationKind::Success, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::build(NotificationKind::Error, title, message)
    }

    fn build(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub phase: AppPhase,
    pub ui_mode: UiMode,
    pub config: AppConfig,

    /// Last loaded or saved settings; scans are started from these.
    pub settings: Settings,
    pub settings_loaded: bool,
    /// Editable draft shown on the settings page
    pub form: SettingsForm,

    pub dashboard: DashboardState,
    pub connection: ConnectionStatus,
    pub notification: Option<Notification>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            dashboard: DashboardState {
                replay: config.replay.clone(),
                ..DashboardState::new(&config.dashboard)
            },
            config,
            ..Default::default()
        }
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    pub fn request_quit(&mut self) {
        self.phase = AppPhase::Quitting;
    }

    pub fn controls(&self) -> Controls {
        self.dashboard.controls(&self.settings)
    }

    /// Install freshly loaded or saved settings and reset the draft to match.
    pub fn apply_settings(&mut self, settings: Settings) {
        self.form.reset(&settings);
        self.settings = settings;
        self.settings_loaded = true;
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
    }

    pub fn has_notification(&self) -> bool {
        self.notification.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;

    #[test]
    fn test_new_state_defaults() {
        let state = AppState::new();
        assert_eq!(state.ui_mode, UiMode::Dashboard);
        assert_eq!(state.phase, AppPhase::Running);
        assert!(!state.controls().can_start);
        assert!(!state.controls().can_stop);
    }

    #[test]
    fn test_with_config_sizes_feeds() {
        let config = AppConfig {
            dashboard: DashboardConfig {
                max_entries: 5,
                ..Default::default()
            },
            ..Default::default()
        };
        let state = AppState::with_config(config);
        assert_eq!(state.dashboard.logs.capacity(), 5);
    }

    #[test]
    fn test_apply_settings_resets_draft() {
        let mut state = AppState::new();
        state.form.draft.log_path = "edited".into();
        state.form.dirty = true;

        let settings = Settings {
            guid: "G".into(),
            ..Default::default()
        };
        state.apply_settings(settings.clone());
        assert_eq!(state.settings, settings);
        assert_eq!(state.form.draft, settings);
        assert!(!state.form.dirty);
        assert!(state.controls().can_start);
    }

    #[test]
    fn test_connection_label() {
        let status = ConnectionStatus::Connected {
            endpoint: "ws://x".into(),
        };
        assert!(status.is_connected());
        assert_eq!(status.label(), "connected to ws://x");
        assert_eq!(
            ConnectionStatus::Lost { reason: None }.label(),
            "connection closed"
        );
    }
}
