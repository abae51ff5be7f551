//! Quick traffic info: the latest live metrics

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use idsmon_core::{format_latency, is_threat_label, NetworkMetrics};

use super::format_optional;
use crate::theme::styles;

pub struct TrafficInfo<'a> {
    metrics: &'a NetworkMetrics,
    threats_detected: u64,
}

impl<'a> TrafficInfo<'a> {
    pub fn new(metrics: &'a NetworkMetrics, threats_detected: u64) -> Self {
        Self {
            metrics,
            threats_detected,
        }
    }
}

fn field(label: &'static str, value: String) -> Vec<Span<'static>> {
    vec![
        Span::styled(format!("{label} "), styles::text_muted()),
        Span::styled(value, styles::text_primary()),
        Span::raw("  "),
    ]
}

impl Widget for TrafficInfo<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let m = self.metrics;
        let block = styles::glass_block(m.is_scanning).title(" Live Traffic ");

        let (state, state_style) = if m.is_scanning {
            ("scanning", styles::accent_bold())
        } else {
            ("idle", styles::text_muted())
        };

        let flow = if m.flow_number == 0 {
            "-".to_string()
        } else {
            format!("#{}", m.flow_number)
        };
        let label_style = styles::flow_label(is_threat_label(m.predicted_label.as_deref()));
        let label = m.predicted_label.clone().unwrap_or_else(|| "N/A".to_string());

        let mut first = vec![Span::styled(format!("{state:<9}"), state_style)];
        first.extend(field("flow", flow));
        first.push(Span::styled("label ", styles::text_muted()));
        first.push(Span::styled(label, label_style));

        let mut second = field("latency", format_latency(m.inference_latency));
        second.extend(field("throughput", format_optional(m.throughput, 2, " f/s")));

        let mut third = field("cpu", format_optional(m.cpu_usage_percent, 1, "%"));
        third.extend(field("mem", format_optional(m.memory_usage_percent, 1, "%")));
        third.push(Span::styled("threats ", styles::text_muted()));
        third.push(Span::styled(
            self.threats_detected.to_string(),
            styles::flow_label(self.threats_detected > 0),
        ));

        Paragraph::new(vec![Line::from(first), Line::from(second), Line::from(third)])
            .block(block)
            .render(area, buf);
    }
}
