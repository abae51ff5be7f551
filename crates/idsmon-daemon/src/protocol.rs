//! Backend wire protocol
//!
//! Every WebSocket text frame carries one envelope:
//!
//! ```json
//! {"event": "network_data", "data": {"flow_number": 1, "predicted_label": "BENIGN"}}
//! ```
//!
//! `data` is omitted for events without a payload (`stop_scan`,
//! `request_interfaces`).
//!
//! This is plain WebSocket framing, not Socket.IO. A Socket.IO backend must
//! expose a WebSocket route that relays each emitted event as one such frame;
//! event names and payloads are unchanged.

use serde::{Deserialize, Serialize};

use idsmon_core::events::{
    InterfaceInfo, NetworkEvent, ScanComplete, ScanError, ScanStatus, ScanSummary, ServiceStatus,
};
use idsmon_core::types::{ModelKind, ScanMode};

// ─────────────────────────────────────────────────────────
// Outbound (client → backend)
// ─────────────────────────────────────────────────────────

/// Payload of `start_scan`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartScanRequest {
    /// Adapter GUID, `null` lets the backend auto-detect
    pub interface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture_interface: Option<String>,
    pub mode: ScanMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelKind>,
    /// Replay only: CSV path on the backend host
    #[serde(rename = "csv_path", default, skip_serializing_if = "Option::is_none")]
    pub csv_path: Option<String>,
    /// Replay only: pause between flows, backend default 100
    #[serde(rename = "delay_ms", default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
    #[serde(rename = "max_flows", default, skip_serializing_if = "Option::is_none")]
    pub max_flows: Option<u64>,
    #[serde(rename = "start_row", default, skip_serializing_if = "Option::is_none")]
    pub start_row: Option<u64>,
    #[serde(rename = "end_row", default, skip_serializing_if = "Option::is_none")]
    pub end_row: Option<u64>,
}

impl StartScanRequest {
    /// Request without any replay parameters
    pub fn new(interface: Option<String>, mode: ScanMode, model: Option<ModelKind>) -> Self {
        Self {
            interface,
            capture_interface: None,
            mode,
            model,
            csv_path: None,
            delay_ms: None,
            max_flows: None,
            start_row: None,
            end_row: None,
        }
    }
}

/// One-way requests to the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientRequest {
    StartScan(StartScanRequest),
    StopScan,
    RequestInterfaces,
}

impl ClientRequest {
    pub fn name(&self) -> &'static str {
        match self {
            ClientRequest::StartScan(_) => "start_scan",
            ClientRequest::StopScan => "stop_scan",
            ClientRequest::RequestInterfaces => "request_interfaces",
        }
    }

    pub fn to_frame(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// ─────────────────────────────────────────────────────────
// Inbound (backend → client)
// ─────────────────────────────────────────────────────────

/// Connection lifecycle, produced locally by the client rather than the wire
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConnectionEvent {
    Connected { endpoint: String },
    Disconnected { reason: Option<String> },
}

/// Typed inbound event
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    Alert(serde_json::Value),
    ServiceStatus(ServiceStatus),
    ScanStatus(ScanStatus),
    NetworkData(NetworkEvent),
    ScanSummary(ScanSummary),
    ScanComplete(ScanComplete),
    ScanError(ScanError),
    InterfaceList(Vec<InterfaceInfo>),
    Connection(ConnectionEvent),
}

/// Listener key for [`BackendEvent`] variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Alert,
    ServiceStatus,
    ScanStatus,
    NetworkData,
    ScanSummary,
    ScanComplete,
    ScanError,
    InterfaceList,
    Connection,
}

impl EventKind {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Alert => "alert",
            EventKind::ServiceStatus => "service_status",
            EventKind::ScanStatus => "scan_status",
            EventKind::NetworkData => "network_data",
            EventKind::ScanSummary => "scan_summary",
            EventKind::ScanComplete => "scan_complete",
            EventKind::ScanError => "scan_error",
            EventKind::InterfaceList => "interface_list",
            EventKind::Connection => "connection",
        }
    }
}

impl BackendEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            BackendEvent::Alert(_) => EventKind::Alert,
            BackendEvent::ServiceStatus(_) => EventKind::ServiceStatus,
            BackendEvent::ScanStatus(_) => EventKind::ScanStatus,
            BackendEvent::NetworkData(_) => EventKind::NetworkData,
            BackendEvent::ScanSummary(_) => EventKind::ScanSummary,
            BackendEvent::ScanComplete(_) => EventKind::ScanComplete,
            BackendEvent::ScanError(_) => EventKind::ScanError,
            BackendEvent::InterfaceList(_) => EventKind::InterfaceList,
            BackendEvent::Connection(_) => EventKind::Connection,
        }
    }
}

/// Result of parsing one text frame
#[derive(Debug)]
pub enum BackendMessage {
    Event(BackendEvent),
    /// Well-formed envelope naming an event we do not handle
    Unknown { event: String },
    /// Not an envelope, or a payload that does not match its event
    Malformed { reason: String },
}

#[derive(Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Parse one WebSocket text frame from the backend.
pub fn parse_backend_message(text: &str) -> BackendMessage {
    let envelope: Envelope = match serde_json::from_str(text) {
        Ok(env) => env,
        Err(e) => {
            return BackendMessage::Malformed {
                reason: format!("invalid envelope: {e}"),
            }
        }
    };

    use serde_json::from_value;

    let data = envelope.data;
    let decoded = match envelope.event.as_str() {
        "alert" => Ok(BackendEvent::Alert(data)),
        "service_status" => from_value(data).map(BackendEvent::ServiceStatus),
        "scan_status" => from_value(data).map(BackendEvent::ScanStatus),
        "network_data" => from_value(data).map(BackendEvent::NetworkData),
        "scan_summary" => from_value(data).map(BackendEvent::ScanSummary),
        "scan_complete" => from_value(data).map(BackendEvent::ScanComplete),
        "scan_error" => from_value(data).map(BackendEvent::ScanError),
        "interface_list" => from_value(data).map(BackendEvent::InterfaceList),
        _ => {
            return BackendMessage::Unknown {
                event: envelope.event,
            }
        }
    };

    match decoded {
        Ok(event) => BackendMessage::Event(event),
        Err(e) => BackendMessage::Malformed {
            reason: format!("{}: {e}", envelope.event),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idsmon_core::events::ScanState;
    use serde_json::json;

    #[test]
    fn test_start_scan_frame_shape() {
        let req = ClientRequest::StartScan(StartScanRequest {
            capture_interface: Some("Ethernet".into()),
            ..StartScanRequest::new(None, ScanMode::Live, Some(ModelKind::RandomForest))
        });
        let value: serde_json::Value = serde_json::from_str(&req.to_frame().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "event": "start_scan",
                "data": {
                    "interface": null,
                    "captureInterface": "Ethernet",
                    "mode": "live",
                    "model": "random-forest"
                }
            })
        );
    }

    #[test]
    fn test_start_scan_omits_absent_optionals() {
        let req = ClientRequest::StartScan(StartScanRequest::new(
            Some("\\Device\\NPF_{X}".into()),
            ScanMode::Deep,
            None,
        ));
        let value: serde_json::Value = serde_json::from_str(&req.to_frame().unwrap()).unwrap();
        let data = value.get("data").unwrap();
        assert_eq!(data.get("mode"), Some(&json!("deep")));
        assert!(data.get("model").is_none());
        assert!(data.get("captureInterface").is_none());
        assert!(data.get("csv_path").is_none());
        assert!(data.get("delay_ms").is_none());
    }

    #[test]
    fn test_replay_start_scan_uses_backend_param_names() {
        let req = ClientRequest::StartScan(StartScanRequest {
            csv_path: Some("captures/friday.csv".into()),
            delay_ms: Some(20),
            max_flows: Some(500),
            start_row: Some(100),
            end_row: None,
            ..StartScanRequest::new(None, ScanMode::Replay, Some(ModelKind::RandomForest))
        });
        let value: serde_json::Value = serde_json::from_str(&req.to_frame().unwrap()).unwrap();
        assert_eq!(
            value["data"],
            json!({
                "interface": null,
                "mode": "replay",
                "model": "random-forest",
                "csv_path": "captures/friday.csv",
                "delay_ms": 20,
                "max_flows": 500,
                "start_row": 100
            })
        );
    }

    #[test]
    fn test_payloadless_requests_have_no_data() {
        let value: serde_json::Value =
            serde_json::from_str(&ClientRequest::StopScan.to_frame().unwrap()).unwrap();
        assert_eq!(value, json!({"event": "stop_scan"}));

        let value: serde_json::Value =
            serde_json::from_str(&ClientRequest::RequestInterfaces.to_frame().unwrap()).unwrap();
        assert_eq!(value, json!({"event": "request_interfaces"}));
    }

    #[test]
    fn test_parse_network_data() {
        let msg = parse_backend_message(
            r#"{"event":"network_data","data":{"flow_number":5,"predicted_label":"DDoS"}}"#,
        );
        match msg {
            BackendMessage::Event(BackendEvent::NetworkData(ev)) => {
                assert_eq!(ev.flow_number, 5);
                assert_eq!(ev.predicted_label.as_deref(), Some("DDoS"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_parse_network_data_with_epoch_timestamp() {
        let msg = parse_backend_message(
            r#"{"event":"network_data","data":{"flow_number":1,"predicted_label":"DDoS","timestamp":1700000000.5}}"#,
        );
        let BackendMessage::Event(BackendEvent::NetworkData(ev)) = msg else {
            panic!("expected network_data");
        };
        assert_eq!(ev.predicted_label.as_deref(), Some("DDoS"));
        assert_eq!(ev.timestamp.as_deref(), Some("1700000000.5"));
    }

    #[test]
    fn test_parse_network_data_with_mistyped_metric() {
        let msg = parse_backend_message(
            r#"{"event":"network_data","data":{"flow_number":2,"predicted_label":"PortScan","confidence":"high"}}"#,
        );
        let BackendMessage::Event(BackendEvent::NetworkData(ev)) = msg else {
            panic!("expected network_data");
        };
        assert_eq!(ev.flow_number, 2);
        assert!(ev.confidence.is_none());
    }

    #[test]
    fn test_parse_scan_status_stopped() {
        let msg = parse_backend_message(
            r#"{"event":"scan_status","data":{"state":"stopped","message":"Scan terminated"}}"#,
        );
        let BackendMessage::Event(BackendEvent::ScanStatus(status)) = msg else {
            panic!("expected scan_status");
        };
        assert_eq!(status.state, ScanState::Stopped);
    }

    #[test]
    fn test_parse_alert_is_opaque() {
        let msg = parse_backend_message(r#"{"event":"alert","data":{"anything":[1,2]}}"#);
        let BackendMessage::Event(BackendEvent::Alert(value)) = msg else {
            panic!("expected alert");
        };
        assert_eq!(value, json!({"anything": [1, 2]}));
    }

    #[test]
    fn test_parse_unknown_event() {
        let msg = parse_backend_message(r#"{"event":"heartbeat","data":{}}"#);
        assert!(matches!(msg, BackendMessage::Unknown { event } if event == "heartbeat"));
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            parse_backend_message("not json"),
            BackendMessage::Malformed { .. }
        ));
        assert!(matches!(
            parse_backend_message(r#"{"event":"network_data","data":{"predicted_label":"x"}}"#),
            BackendMessage::Malformed { .. }
        ));
    }

    #[test]
    fn test_connection_kind_is_not_a_wire_event() {
        assert!(matches!(
            parse_backend_message(r#"{"event":"connection"}"#),
            BackendMessage::Unknown { .. }
        ));
    }
}
