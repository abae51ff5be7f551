//! End-of-scan summary, replay accuracy and the last backend error

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use idsmon_app::DashboardState;
use idsmon_core::{format_latency, ScanComplete, ScanSummary};

use super::{format_count, format_optional};
use crate::theme::styles;

pub struct SummaryPanel<'a> {
    summary: Option<&'a ScanSummary>,
    complete: Option<&'a ScanComplete>,
    last_error: Option<&'a str>,
}

impl<'a> SummaryPanel<'a> {
    pub fn new(dashboard: &'a DashboardState) -> Self {
        Self {
            summary: dashboard.summary.as_ref(),
            complete: dashboard.scan_complete.as_ref(),
            last_error: dashboard.last_scan_error.as_deref(),
        }
    }
}

fn pair(label: &'static str, value: String) -> [Span<'static>; 3] {
    [
        Span::styled(format!("{label} "), styles::text_muted()),
        Span::styled(value, styles::text_primary()),
        Span::raw("  "),
    ]
}

fn summary_lines(s: &ScanSummary) -> Vec<Line<'static>> {
    let hw = &s.hardware_usage;

    let mut first = Vec::new();
    first.extend(pair("duration", format_optional(s.duration_seconds, 1, "s")));
    first.extend(pair("flows", format_count(s.total_flows)));
    first.extend(pair("packets", format_count(s.total_packets)));
    first.extend(pair(
        "rate",
        format_optional(s.throughput_packets_per_second, 1, " pkt/s"),
    ));

    let mut second = Vec::new();
    second.extend(pair(
        "avg latency",
        format_latency(s.average_inference_latency_seconds),
    ));
    second.extend(pair(
        "model",
        s.model_type.clone().unwrap_or_else(|| "N/A".into()),
    ));
    second.extend(pair(
        "iface",
        s.interface.clone().unwrap_or_else(|| "N/A".into()),
    ));

    let mut third = Vec::new();
    third.extend(pair(
        "cpu avg/max",
        format!(
            "{}/{}",
            format_optional(hw.cpu_average_percent, 1, "%"),
            format_optional(hw.cpu_max_percent, 1, "%")
        ),
    ));
    third.extend(pair(
        "mem avg/max",
        format!(
            "{}/{}",
            format_optional(hw.memory_average_percent, 1, "%"),
            format_optional(hw.memory_max_percent, 1, "%")
        ),
    ));

    vec![Line::from(first), Line::from(second), Line::from(third)]
}

impl Widget for SummaryPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false).title(" Scan Summary ");
        let mut lines = Vec::new();

        if let Some(err) = self.last_error {
            lines.push(Line::from(vec![
                Span::styled("error ", styles::error_text()),
                Span::styled(err.to_string(), styles::error_text()),
            ]));
        }

        if let Some(c) = self.complete {
            let mut spans = Vec::new();
            spans.extend(pair("replayed", format_count(c.total_flows)));
            spans.extend(pair("correct", format_count(c.correct)));
            spans.extend(pair(
                "accuracy",
                format_optional(c.accuracy.map(|a| a * 100.0), 1, "%"),
            ));
            lines.push(Line::from(spans));
        }

        match self.summary {
            Some(s) => lines.extend(summary_lines(s)),
            None => lines.push(Line::from(Span::styled(
                "No summary yet. It arrives when a scan stops.",
                styles::text_muted(),
            ))),
        }

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use idsmon_core::{HardwareUsage, ScanError};

    #[test]
    fn test_placeholder_without_summary() {
        let mut term = TestTerminal::new();
        let dashboard = DashboardState::default();
        term.render_widget(SummaryPanel::new(&dashboard), term.area());
        assert!(term.buffer_contains("Scan Summary"));
        assert!(term.buffer_contains("No summary yet"));
    }

    #[test]
    fn test_summary_fields_with_missing_values() {
        let mut term = TestTerminal::with_size(100, 10);
        let mut dashboard = DashboardState::default();
        dashboard.on_scan_summary(ScanSummary {
            duration_seconds: Some(12.34),
            total_flows: Some(120),
            average_inference_latency_seconds: Some(0.0012),
            hardware_usage: HardwareUsage {
                cpu_average_percent: Some(10.0),
                ..Default::default()
            },
            ..Default::default()
        });
        term.render_widget(SummaryPanel::new(&dashboard), term.area());

        assert!(term.buffer_contains("duration 12.3s"));
        assert!(term.buffer_contains("flows 120"));
        assert!(term.buffer_contains("packets N/A"));
        assert!(term.buffer_contains("avg latency 1.20ms"));
        assert!(term.buffer_contains("10.0%/N/A"));
    }

    #[test]
    fn test_scan_error_is_shown_first() {
        let mut term = TestTerminal::new();
        let mut dashboard = DashboardState::default();
        dashboard.on_scan_error(&ScanError {
            error: "capture failed".into(),
            flow_number: None,
        });
        term.render_widget(SummaryPanel::new(&dashboard), term.area());
        assert!(term.line_contains(1, "error capture failed"));
    }

    #[test]
    fn test_replay_accuracy_as_percentage() {
        let mut term = TestTerminal::new();
        let mut dashboard = DashboardState::default();
        dashboard.on_scan_complete(ScanComplete {
            total_flows: Some(10),
            correct: Some(9),
            accuracy: Some(0.9),
        });
        term.render_widget(SummaryPanel::new(&dashboard), term.area());
        assert!(term.buffer_contains("accuracy 90.0%"));
    }
}
