//! Domain types shared by the session client and the dashboard

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::events::NetworkEvent;

// ─────────────────────────────────────────────────────────
// Model selection
// ─────────────────────────────────────────────────────────

/// Classifier model the backend should use for the next scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    #[default]
    RandomForest,
    LogisticRegression,
    SupportVectorMachine,
    MultilayerPerceptron,
    IsolationForest,
}

impl ModelKind {
    pub const ALL: [ModelKind; 5] = [
        ModelKind::RandomForest,
        ModelKind::LogisticRegression,
        ModelKind::SupportVectorMachine,
        ModelKind::MultilayerPerceptron,
        ModelKind::IsolationForest,
    ];

    /// Identifier sent on the wire
    pub fn id(&self) -> &'static str {
        match self {
            ModelKind::RandomForest => "random-forest",
            ModelKind::LogisticRegression => "logistic-regression",
            ModelKind::SupportVectorMachine => "support-vector-machine",
            ModelKind::MultilayerPerceptron => "multilayer-perceptron",
            ModelKind::IsolationForest => "isolation-forest",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ModelKind::RandomForest => "Random Forest",
            ModelKind::LogisticRegression => "Logistic Regression",
            ModelKind::SupportVectorMachine => "Support Vector Machine",
            ModelKind::MultilayerPerceptron => "Multilayer Perceptron",
            ModelKind::IsolationForest => "Isolation Forest",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|m| m == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

// ─────────────────────────────────────────────────────────
// Scan mode
// ─────────────────────────────────────────────────────────

/// Flow source sent with `start_scan`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    #[default]
    Live,
    Deep,
    /// Labelled CSV capture replayed by the backend
    Replay,
}

impl ScanMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanMode::Live => "live",
            ScanMode::Deep => "deep",
            ScanMode::Replay => "replay",
        }
    }

    /// Live -> Deep -> Replay -> Live
    pub fn toggle(&self) -> Self {
        match self {
            ScanMode::Live => ScanMode::Deep,
            ScanMode::Deep => ScanMode::Replay,
            ScanMode::Replay => ScanMode::Live,
        }
    }

    /// Replay reads a file on the backend host instead of an adapter
    pub fn needs_interface(&self) -> bool {
        !matches!(self, ScanMode::Replay)
    }
}

impl std::fmt::Display for ScanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────
// Live metrics
// ─────────────────────────────────────────────────────────

/// Latest scalar snapshot, overwritten by every `network_data` event
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkMetrics {
    pub flow_number: u64,
    pub predicted_label: Option<String>,
    pub inference_latency: Option<f64>,
    pub throughput: Option<f64>,
    pub cpu_usage_percent: Option<f64>,
    pub memory_usage_percent: Option<f64>,
    pub is_scanning: bool,
}

impl NetworkMetrics {
    /// Snapshot derived from an event. Receiving data implies a scan is live.
    pub fn from_event(event: &NetworkEvent) -> Self {
        Self {
            flow_number: event.flow_number,
            predicted_label: event.predicted_label.clone(),
            inference_latency: event.inference_latency,
            throughput: event.throughput,
            cpu_usage_percent: event.cpu_usage_percent,
            memory_usage_percent: event.memory_usage_percent,
            is_scanning: true,
        }
    }
}

// ─────────────────────────────────────────────────────────
// Flow entries
// ─────────────────────────────────────────────────────────

/// Display projection of a [`NetworkEvent`] stamped with the local receive time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowEntry {
    pub flow_number: u64,
    pub received_at: DateTime<Local>,
    pub predicted_label: Option<String>,
    pub confidence: Option<f64>,
    pub inference_latency: Option<f64>,
    pub throughput: Option<f64>,
    pub true_label: Option<String>,
}

impl FlowEntry {
    pub fn from_event(event: &NetworkEvent) -> Self {
        Self {
            flow_number: event.flow_number,
            received_at: Local::now(),
            predicted_label: event.predicted_label.clone(),
            confidence: event.confidence,
            inference_latency: event.inference_latency,
            throughput: event.throughput,
            true_label: event.true_label.clone(),
        }
    }

    /// Label for display, `"N/A"` when the backend sent none
    pub fn label(&self) -> &str {
        self.predicted_label.as_deref().unwrap_or("N/A")
    }

    /// Only a present, non-benign label counts as a threat
    pub fn is_threat(&self) -> bool {
        is_threat_label(self.predicted_label.as_deref())
    }
}

/// A missing label is unclassified, not a threat
pub fn is_threat_label(label: Option<&str>) -> bool {
    label.is_some_and(|l| !is_benign(l))
}

/// Case-insensitive check against the benign class label
pub fn is_benign(label: &str) -> bool {
    label.eq_ignore_ascii_case("benign")
}

/// `0.914` -> `"91.4%"`, missing -> `"N/A"`
pub fn format_confidence(confidence: Option<f64>) -> String {
    match confidence {
        Some(c) => format!("{:.1}%", c * 100.0),
        None => "N/A".to_string(),
    }
}

/// Seconds to milliseconds with two decimals, missing or zero -> `"N/A"`
pub fn format_latency(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) if s > 0.0 => format!("{:.2}ms", s * 1000.0),
        _ => "N/A".to_string(),
    }
}
