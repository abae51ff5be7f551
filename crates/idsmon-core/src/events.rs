//! Inbound backend event payloads
//!
//! The backend emits flat `snake_case` objects. Every field that is not
//! needed to identify an event is optional and defaults when missing, so a
//! partially populated payload never fails to parse. A present optional
//! field of the wrong shape is dropped to `None` rather than rejecting the
//! whole event.

use serde::{Deserialize, Serialize};

/// Field adapters for optional payload values
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Trimmed non-empty string; numbers keep their decimal form
    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::String(s)) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    /// Finite float from a number or a numeric string
    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        let value = match Option::<Value>::deserialize(d)? {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(value.filter(|v| v.is_finite()))
    }

    /// Non-negative integer; whole floats are accepted
    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Number(n)) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            }),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        })
    }
}

// ─────────────────────────────────────────────────────────
// network_data
// ─────────────────────────────────────────────────────────

/// One classified flow, keyed by `flow_number`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NetworkEvent {
    pub flow_number: u64,
    /// Backend-side timestamp, passed through verbatim. Numeric epochs are
    /// kept in their decimal form.
    #[serde(default, deserialize_with = "lenient::text")]
    pub timestamp: Option<String>,
    /// `None` when the backend sent no usable label
    #[serde(default, deserialize_with = "lenient::text")]
    pub predicted_label: Option<String>,
    /// Classifier confidence in `0.0..=1.0`
    #[serde(default, deserialize_with = "lenient::number")]
    pub confidence: Option<f64>,
    /// Seconds
    #[serde(default, deserialize_with = "lenient::number")]
    pub inference_latency: Option<f64>,
    /// Packets per second
    #[serde(default, deserialize_with = "lenient::number")]
    pub throughput: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cpu_usage_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub memory_usage_percent: Option<f64>,
    /// Ground truth, only present when the backend replays a labelled capture
    #[serde(default, deserialize_with = "lenient::text")]
    pub true_label: Option<String>,
    /// Running accuracy in percent, replay only
    #[serde(default, deserialize_with = "lenient::number")]
    pub accuracy: Option<f64>,
}

impl NetworkEvent {
    /// Minimal event with only the key and label set.
    pub fn new(flow_number: u64, predicted_label: impl Into<String>) -> Self {
        Self {
            flow_number,
            timestamp: None,
            predicted_label: Some(predicted_label.into()),
            confidence: None,
            inference_latency: None,
            throughput: None,
            cpu_usage_percent: None,
            memory_usage_percent: None,
            true_label: None,
            accuracy: None,
        }
    }
}

// ─────────────────────────────────────────────────────────
// scan_summary / scan_complete
// ─────────────────────────────────────────────────────────

/// CPU and memory usage over a whole scan
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HardwareUsage {
    #[serde(deserialize_with = "lenient::number")]
    pub cpu_average_percent: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub cpu_max_percent: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub memory_average_percent: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub memory_max_percent: Option<f64>,
}

/// End-of-scan statistics
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanSummary {
    #[serde(deserialize_with = "lenient::number")]
    pub duration_seconds: Option<f64>,
    #[serde(deserialize_with = "lenient::count")]
    pub total_flows: Option<u64>,
    #[serde(deserialize_with = "lenient::count")]
    pub total_packets: Option<u64>,
    #[serde(deserialize_with = "lenient::number")]
    pub throughput_packets_per_second: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub average_inference_latency_seconds: Option<f64>,
    #[serde(deserialize_with = "lenient::text")]
    pub model_type: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub interface: Option<String>,
    pub hardware_usage: HardwareUsage,
}

/// Replay completion report
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanComplete {
    #[serde(deserialize_with = "lenient::count")]
    pub total_flows: Option<u64>,
    #[serde(deserialize_with = "lenient::count")]
    pub correct: Option<u64>,
    #[serde(deserialize_with = "lenient::number")]
    pub accuracy: Option<f64>,
}

// ─────────────────────────────────────────────────────────
// scan_status / service_status / scan_error
// ─────────────────────────────────────────────────────────

/// Scan lifecycle state reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanState {
    Started,
    Running,
    AlreadyRunning,
    Stopped,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScanStatus {
    pub state: ScanState,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ScanStatus {
    pub fn new(state: ScanState) -> Self {
        Self {
            state,
            mode: None,
            message: None,
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.state == ScanState::Stopped
    }
}

/// Backend service health; opaque beyond `state`/`message`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Failure reported by the backend while starting or running a scan
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScanError {
    pub error: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub flow_number: Option<u64>,
}

// ─────────────────────────────────────────────────────────
// interface_list
// ─────────────────────────────────────────────────────────

/// Capture adapter as advertised by the backend
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InterfaceInfo {
    pub name: String,
    #[serde(default)]
    pub guid: String,
}
