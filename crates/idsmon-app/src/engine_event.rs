//! Domain events emitted by the Engine for external consumers
//!
//! Events are broadcast after each message processing cycle via
//! `Engine::subscribe()`, derived by diffing state before and after, so
//! subscribers see a consistent view of what changed.

use idsmon_core::events::{InterfaceInfo, ScanComplete, ScanSummary};
use idsmon_core::types::{FlowEntry, ModelKind, ScanMode};

use crate::config::Settings;
use crate::state::Notification;

#[derive(Debug, Clone)]
pub enum EngineEvent {
    // ─────────────────────────────────────────────────────────
    // Connection
    // ─────────────────────────────────────────────────────────
    ConnectionChanged { connected: bool, detail: String },

    // ─────────────────────────────────────────────────────────
    // Scan lifecycle
    // ─────────────────────────────────────────────────────────
    /// A `start_scan` was sent
    ScanStarted { model: ModelKind, mode: ScanMode },

    /// The control bar left the running state (user stop or backend `stopped`)
    ScanStopped,

    /// Backend streaming flag changed
    ScanningChanged { is_scanning: bool },

    // ─────────────────────────────────────────────────────────
    // Flows
    // ─────────────────────────────────────────────────────────
    FlowReceived { entry: FlowEntry },

    /// Non-benign flow added to the alert list
    AlertRaised { entry: FlowEntry },

    /// A flow number arrived twice and was dropped
    DuplicateFlow { flow_number: u64 },

    // ─────────────────────────────────────────────────────────
    // Results
    // ─────────────────────────────────────────────────────────
    SummaryUpdated { summary: ScanSummary },
    ScanCompleted { complete: ScanComplete },
    ScanFailed { error: String },

    // ─────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────
    InterfacesUpdated { interfaces: Vec<InterfaceInfo> },
    SettingsChanged { settings: Settings },

    /// A blocking notification was raised
    Notification { notification: Notification },

    /// Engine is shutting down
    Shutdown,
}

impl EngineEvent {
    /// Short label for logging and the headless stream
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ConnectionChanged { .. } => "connection",
            Self::ScanStarted { .. } => "scan_started",
            Self::ScanStopped => "scan_stopped",
            Self::ScanningChanged { .. } => "scanning_changed",
            Self::FlowReceived { .. } => "flow",
            Self::AlertRaised { .. } => "alert_flow",
            Self::DuplicateFlow { .. } => "duplicate_flow",
            Self::SummaryUpdated { .. } => "scan_summary",
            Self::ScanCompleted { .. } => "scan_complete",
            Self::ScanFailed { .. } => "scan_error",
            Self::InterfacesUpdated { .. } => "interfaces",
            Self::SettingsChanged { .. } => "settings",
            Self::Notification { .. } => "notification",
            Self::Shutdown => "shutdown",
        }
    }
}
