//! Dashboard view-model: live scan state and its reducers

use idsmon_core::events::{NetworkEvent, ScanComplete, ScanError, ScanStatus, ScanSummary};
use idsmon_core::feed::{FeedInsert, FlowFeed};
use idsmon_core::prelude::*;
use idsmon_core::types::{FlowEntry, ModelKind, NetworkMetrics, ScanMode};
use idsmon_daemon::StartScanRequest;

use crate::config::{DashboardConfig, ReplayConfig, Settings};

/// What a `network_data` event did to the lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    Logged,
    /// Logged and added to the alert list
    Alerted,
    /// Flow number already present; both lists unchanged
    Duplicate,
}

/// Control bar availability, derived from state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub can_start: bool,
    pub can_stop: bool,
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    pub logs: FlowFeed,
    pub alerts: FlowFeed,
    pub metrics: NetworkMetrics,
    pub summary: Option<ScanSummary>,
    pub scan_complete: Option<ScanComplete>,
    /// Distinct non-benign flows in the current scan
    pub threats_detected: u64,
    pub duplicates_dropped: u64,
    /// Accepted flows since startup; survives scan restarts
    pub flows_seen: u64,
    pub last_scan_error: Option<String>,
    /// Set when a start is sent, cleared by stop or a `stopped` status
    pub is_running: bool,
    pub model: ModelKind,
    pub mode: ScanMode,
    /// Source parameters for [`ScanMode::Replay`]
    pub replay: ReplayConfig,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(&DashboardConfig::default())
    }
}

impl DashboardState {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            logs: FlowFeed::new(config.max_entries),
            alerts: FlowFeed::new(config.max_entries),
            metrics: NetworkMetrics::default(),
            summary: None,
            scan_complete: None,
            threats_detected: 0,
            duplicates_dropped: 0,
            flows_seen: 0,
            last_scan_error: None,
            is_running: false,
            model: config.default_model,
            mode: config.default_mode,
            replay: ReplayConfig::default(),
        }
    }

    // ─────────────────────────────────────────────────────────
    // Inbound events
    // ─────────────────────────────────────────────────────────

    pub fn on_network_data(&mut self, event: &NetworkEvent) -> FlowOutcome {
        self.metrics = NetworkMetrics::from_event(event);

        let entry = FlowEntry::from_event(event);
        let is_threat = entry.is_threat();

        if self.logs.insert(entry.clone()) == FeedInsert::Duplicate {
            self.duplicates_dropped += 1;
            warn!("Duplicate flow #{} ignored", event.flow_number);
            return FlowOutcome::Duplicate;
        }
        self.flows_seen += 1;

        if is_threat && self.alerts.insert(entry) == FeedInsert::Inserted {
            self.threats_detected += 1;
            return FlowOutcome::Alerted;
        }

        FlowOutcome::Logged
    }

    pub fn on_scan_status(&mut self, status: &ScanStatus) {
        if status.is_stopped() {
            info!("Scan stopped: {}", status.message.as_deref().unwrap_or("-"));
            self.metrics.is_scanning = false;
            self.is_running = false;
        } else {
            debug!(
                "Scan status {:?}: {}",
                status.state,
                status.message.as_deref().unwrap_or("-")
            );
        }
    }

    pub fn on_scan_summary(&mut self, summary: ScanSummary) {
        debug!("Scan summary received");
        self.summary = Some(summary);
    }

    pub fn on_scan_complete(&mut self, complete: ScanComplete) {
        debug!("Replay complete: {:?}", complete);
        self.scan_complete = Some(complete);
    }

    pub fn on_scan_error(&mut self, error: &ScanError) {
        match error.flow_number {
            Some(n) => warn!("Backend scan error on flow #{}: {}", n, error.error),
            None => warn!("Backend scan error: {}", error.error),
        }
        self.last_scan_error = Some(error.error.clone());
    }

    // ─────────────────────────────────────────────────────────
    // Intents
    // ─────────────────────────────────────────────────────────

    pub fn controls(&self, settings: &Settings) -> Controls {
        Controls {
            can_start: !self.is_running && self.has_source(settings),
            can_stop: self.is_running || self.metrics.is_scanning,
        }
    }

    /// Whether the selected mode has something to read flows from.
    pub fn has_source(&self, settings: &Settings) -> bool {
        if self.mode.needs_interface() {
            settings.has_interface()
        } else {
            self.replay.is_ready()
        }
    }

    /// Reset per-scan state and build the request for a fresh scan.
    pub fn begin_scan(&mut self, settings: &Settings) -> StartScanRequest {
        self.logs.clear();
        self.alerts.clear();
        self.summary = None;
        self.scan_complete = None;
        self.threats_detected = 0;
        self.duplicates_dropped = 0;
        self.last_scan_error = None;
        self.is_running = true;

        let mut request = StartScanRequest {
            capture_interface: settings.capture_interface(),
            ..StartScanRequest::new(settings.resolved_interface(), self.mode, Some(self.model))
        };
        if self.mode == ScanMode::Replay {
            let replay = &self.replay;
            request.csv_path = replay
                .csv_path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned());
            request.delay_ms = replay.delay_ms;
            request.max_flows = replay.max_flows;
            request.start_row = replay.start_row;
            request.end_row = replay.end_row;
        }
        request
    }

    /// Logs, alerts and summary stay visible after a stop.
    pub fn end_scan(&mut self) {
        self.is_running = false;
    }

    pub fn set_model(&mut self, model: ModelKind) {
        self.model = model;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idsmon_core::events::ScanState;

    fn event(n: u64, label: &str) -> NetworkEvent {
        NetworkEvent::new(n, label)
    }

    fn settings_with_guid(guid: &str) -> Settings {
        Settings {
            guid: guid.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_benign_flow_is_logged_not_alerted() {
        let mut d = DashboardState::default();
        assert_eq!(d.on_network_data(&event(1, "BENIGN")), FlowOutcome::Logged);
        assert_eq!(d.logs.len(), 1);
        assert!(d.alerts.is_empty());
        assert_eq!(d.threats_detected, 0);
    }

    #[test]
    fn test_unlabelled_flow_is_logged_not_alerted() {
        let mut d = DashboardState::default();
        let bare: NetworkEvent = serde_json::from_value(serde_json::json!({"flow_number": 9}))
            .expect("bare flow parses");
        assert_eq!(d.on_network_data(&bare), FlowOutcome::Logged);

        let blank: NetworkEvent =
            serde_json::from_value(serde_json::json!({"flow_number": 10, "predicted_label": ""}))
                .expect("blank label parses");
        assert_eq!(d.on_network_data(&blank), FlowOutcome::Logged);

        assert_eq!(d.logs.len(), 2);
        assert!(d.alerts.is_empty());
        assert_eq!(d.threats_detected, 0);
        assert_eq!(d.logs.iter().next().map(|e| e.label()), Some("N/A"));
    }

    #[test]
    fn test_threat_goes_to_both_lists_newest_first() {
        let mut d = DashboardState::default();
        d.on_network_data(&event(1, "BENIGN"));
        assert_eq!(d.on_network_data(&event(2, "DDoS")), FlowOutcome::Alerted);

        let logs: Vec<u64> = d.logs.iter().map(|e| e.flow_number).collect();
        let alerts: Vec<u64> = d.alerts.iter().map(|e| e.flow_number).collect();
        assert_eq!(logs, vec![2, 1]);
        assert_eq!(alerts, vec![2]);
        assert_eq!(d.threats_detected, 1);
    }

    #[test]
    fn test_duplicate_changes_nothing_but_metrics() {
        let mut d = DashboardState::default();
        d.on_network_data(&event(7, "PortScan"));
        assert_eq!(
            d.on_network_data(&event(7, "PortScan")),
            FlowOutcome::Duplicate
        );
        assert_eq!(d.logs.len(), 1);
        assert_eq!(d.alerts.len(), 1);
        assert_eq!(d.threats_detected, 1);
        assert_eq!(d.duplicates_dropped, 1);
    }

    #[test]
    fn test_caps_hold_under_flood() {
        let mut d = DashboardState::default();
        for n in 1..=60 {
            d.on_network_data(&event(n, "DDoS"));
        }
        assert_eq!(d.logs.len(), 50);
        assert_eq!(d.alerts.len(), 50);
        assert_eq!(d.logs.newest().unwrap().flow_number, 60);
        assert_eq!(d.logs.iter().last().unwrap().flow_number, 11);
    }

    #[test]
    fn test_configured_cap() {
        let mut d = DashboardState::new(&DashboardConfig {
            max_entries: 3,
            ..Default::default()
        });
        for n in 1..=5 {
            d.on_network_data(&event(n, "BENIGN"));
        }
        assert_eq!(d.logs.len(), 3);
    }

    #[test]
    fn test_metrics_overwritten_and_scanning() {
        let mut d = DashboardState::default();
        let mut ev = event(1, "BENIGN");
        ev.throughput = Some(100.0);
        d.on_network_data(&ev);
        d.on_network_data(&event(2, "BENIGN"));
        assert!(d.metrics.is_scanning);
        assert_eq!(d.metrics.flow_number, 2);
        assert_eq!(d.metrics.throughput, None);
    }

    #[test]
    fn test_stopped_status_clears_scanning_and_running() {
        let mut d = DashboardState::default();
        d.is_running = true;
        d.on_network_data(&event(1, "BENIGN"));

        d.on_scan_status(&ScanStatus::new(ScanState::Started));
        assert!(d.metrics.is_scanning);

        d.on_scan_status(&ScanStatus::new(ScanState::Stopped));
        assert!(!d.metrics.is_scanning);
        assert!(!d.is_running);
        assert_eq!(d.logs.len(), 1);
    }

    #[test]
    fn test_summary_replaced_wholesale() {
        let mut d = DashboardState::default();
        d.on_scan_summary(ScanSummary {
            total_flows: Some(10),
            model_type: Some("rf".into()),
            ..Default::default()
        });
        d.on_scan_summary(ScanSummary {
            total_flows: Some(20),
            ..Default::default()
        });
        let summary = d.summary.as_ref().unwrap();
        assert_eq!(summary.total_flows, Some(20));
        assert_eq!(summary.model_type, None);
    }

    #[test]
    fn test_begin_scan_clears_and_builds_request() {
        let mut d = DashboardState::default();
        d.on_network_data(&event(1, "DDoS"));
        d.on_scan_summary(ScanSummary::default());
        d.on_scan_error(&ScanError {
            error: "boom".into(),
            flow_number: None,
        });
        d.set_model(ModelKind::SupportVectorMachine);

        let req = d.begin_scan(&settings_with_guid("G"));
        assert!(d.logs.is_empty());
        assert!(d.alerts.is_empty());
        assert!(d.summary.is_none());
        assert!(d.last_scan_error.is_none());
        assert_eq!(d.threats_detected, 0);
        assert!(d.is_running);

        assert_eq!(req.interface.as_deref(), Some("G"));
        assert_eq!(req.mode, ScanMode::Live);
        assert_eq!(req.model, Some(ModelKind::SupportVectorMachine));
    }

    #[test]
    fn test_replay_scan_carries_source_params() {
        let mut d = DashboardState::default();
        d.mode = ScanMode::Replay;
        d.replay = ReplayConfig {
            csv_path: Some("captures/friday.csv".into()),
            delay_ms: Some(5),
            max_flows: Some(300),
            ..Default::default()
        };

        let settings = Settings::default();
        assert!(d.controls(&settings).can_start);

        let req = d.begin_scan(&settings);
        assert_eq!(req.mode, ScanMode::Replay);
        assert_eq!(req.csv_path.as_deref(), Some("captures/friday.csv"));
        assert_eq!(req.delay_ms, Some(5));
        assert_eq!(req.max_flows, Some(300));
        assert!(req.start_row.is_none());
    }

    #[test]
    fn test_replay_needs_csv_not_interface() {
        let mut d = DashboardState::default();
        d.mode = ScanMode::Replay;
        assert!(!d.controls(&settings_with_guid("G")).can_start);

        d.replay.csv_path = Some("flows.csv".into());
        assert!(d.controls(&Settings::default()).can_start);
    }

    #[test]
    fn test_live_scan_omits_replay_params() {
        let mut d = DashboardState::default();
        d.replay.csv_path = Some("flows.csv".into());
        let req = d.begin_scan(&settings_with_guid("G"));
        assert_eq!(req.mode, ScanMode::Live);
        assert!(req.csv_path.is_none());
    }

    #[test]
    fn test_begin_scan_without_guid_sends_null_interface() {
        let mut d = DashboardState::default();
        let settings = Settings {
            capture_interface: "Wi-Fi".into(),
            ..Default::default()
        };
        let req = d.begin_scan(&settings);
        assert_eq!(req.interface, None);
        assert_eq!(req.capture_interface.as_deref(), Some("Wi-Fi"));
    }

    #[test]
    fn test_controls_derivation() {
        let mut d = DashboardState::default();
        let none = Settings::default();
        let some = settings_with_guid("G");

        assert_eq!(
            d.controls(&none),
            Controls {
                can_start: false,
                can_stop: false
            }
        );
        assert!(d.controls(&some).can_start);

        d.begin_scan(&some);
        let c = d.controls(&some);
        assert!(!c.can_start);
        assert!(c.can_stop);

        d.end_scan();
        d.on_network_data(&event(1, "BENIGN"));
        // backend still streaming
        assert!(d.controls(&some).can_stop);
    }

    #[test]
    fn test_model_change_is_local() {
        let mut d = DashboardState::default();
        d.set_model(ModelKind::MultilayerPerceptron);
        assert_eq!(d.model, ModelKind::MultilayerPerceptron);
        assert!(!d.is_running);
    }
}
