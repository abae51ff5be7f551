//! Headless mode - NDJSON event output instead of the TUI
//!
//! Each engine event becomes one JSON object on its own stdout line, with an
//! `"event"` tag and a millisecond `timestamp`.
//!
//! # Example Output
//!
//! ```json
//! {"event":"connection","connected":true,"detail":"connected to ws://127.0.0.1:8765","timestamp":1704700001000}
//! {"event":"scan_started","model":"random-forest","mode":"live","timestamp":1704700002000}
//! {"event":"flow","flow_number":1,"predicted_label":"BENIGN","confidence":0.98,...,"timestamp":1704700002400}
//! ```

pub mod runner;

use std::io::{self, Write};

use chrono::Utc;
use serde::Serialize;
use tracing::error;

use idsmon_app::config::Settings;
use idsmon_app::{EngineEvent, NotificationKind};
use idsmon_core::{FlowEntry, InterfaceInfo, ModelKind, ScanComplete, ScanMode, ScanSummary};

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    Connection {
        connected: bool,
        detail: String,
        timestamp: i64,
    },

    ScanStarted {
        model: ModelKind,
        mode: ScanMode,
        timestamp: i64,
    },

    ScanStopped {
        timestamp: i64,
    },

    /// Backend streaming flag flipped
    ScanStatus {
        is_scanning: bool,
        timestamp: i64,
    },

    Flow {
        #[serde(flatten)]
        flow: FlowEntry,
        timestamp: i64,
    },

    AlertFlow {
        #[serde(flatten)]
        flow: FlowEntry,
        timestamp: i64,
    },

    DuplicateFlow {
        flow_number: u64,
        timestamp: i64,
    },

    ScanSummary {
        #[serde(flatten)]
        summary: ScanSummary,
        timestamp: i64,
    },

    ScanComplete {
        #[serde(flatten)]
        complete: ScanComplete,
        timestamp: i64,
    },

    ScanError {
        error: String,
        timestamp: i64,
    },

    Interfaces {
        interfaces: Vec<InterfaceInfo>,
        timestamp: i64,
    },

    Settings {
        #[serde(flatten)]
        settings: Settings,
        timestamp: i64,
    },

    Notification {
        kind: &'static str,
        title: String,
        message: String,
        timestamp: i64,
    },

    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },

    Shutdown {
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Emit this event to stdout as one JSON line
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }

        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    pub fn error(message: String, fatal: bool) -> Self {
        Self::Error {
            message,
            fatal,
            timestamp: Self::now(),
        }
    }
}

impl From<EngineEvent> for HeadlessEvent {
    fn from(event: EngineEvent) -> Self {
        let timestamp = Self::now();
        match event {
            EngineEvent::ConnectionChanged { connected, detail } => Self::Connection {
                connected,
                detail,
                timestamp,
            },
            EngineEvent::ScanStarted { model, mode } => Self::ScanStarted {
                model,
                mode,
                timestamp,
            },
            EngineEvent::ScanStopped => Self::ScanStopped { timestamp },
            EngineEvent::ScanningChanged { is_scanning } => Self::ScanStatus {
                is_scanning,
                timestamp,
            },
            EngineEvent::FlowReceived { entry } => Self::Flow {
                flow: entry,
                timestamp,
            },
            EngineEvent::AlertRaised { entry } => Self::AlertFlow {
                flow: entry,
                timestamp,
            },
            EngineEvent::DuplicateFlow { flow_number } => Self::DuplicateFlow {
                flow_number,
                timestamp,
            },
            EngineEvent::SummaryUpdated { summary } => Self::ScanSummary { summary, timestamp },
            EngineEvent::ScanCompleted { complete } => Self::ScanComplete {
                complete,
                timestamp,
            },
            EngineEvent::ScanFailed { error } => Self::ScanError { error, timestamp },
            EngineEvent::InterfacesUpdated { interfaces } => Self::Interfaces {
                interfaces,
                timestamp,
            },
            EngineEvent::SettingsChanged { settings } => Self::Settings {
                settings,
                timestamp,
            },
            EngineEvent::Notification { notification } => Self::Notification {
                kind: match notification.kind {
                    NotificationKind::Info => "info",
                    NotificationKind::Success => "success",
                    NotificationKind::Error => "error",
                },
                title: notification.title,
                message: notification.message,
                timestamp,
            },
            EngineEvent::Shutdown => Self::Shutdown { timestamp },
        }
    }
}
