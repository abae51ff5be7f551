//! Flow log and alert tables

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Cell, Row, Table, Widget},
};

use idsmon_core::{format_confidence, format_latency, FlowFeed};

use crate::theme::styles;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowTableKind {
    Log,
    Alerts,
}

impl FlowTableKind {
    fn title(&self) -> &'static str {
        match self {
            FlowTableKind::Log => "Flow Log",
            FlowTableKind::Alerts => "Alerts",
        }
    }

    fn empty_text(&self) -> &'static str {
        match self {
            FlowTableKind::Log => "No flows yet",
            FlowTableKind::Alerts => "No threats detected",
        }
    }
}

/// Newest-first table over a [`FlowFeed`]
pub struct FlowTable<'a> {
    feed: &'a FlowFeed,
    kind: FlowTableKind,
    show_timestamps: bool,
}

impl<'a> FlowTable<'a> {
    pub fn new(feed: &'a FlowFeed, kind: FlowTableKind) -> Self {
        Self {
            feed,
            kind,
            show_timestamps: true,
        }
    }

    pub fn show_timestamps(mut self, show: bool) -> Self {
        self.show_timestamps = show;
        self
    }
}

impl Widget for FlowTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!(
            " {} ({}/{}) ",
            self.kind.title(),
            self.feed.len(),
            self.feed.capacity()
        );
        let block = styles::glass_block(false).title(title);

        if self.feed.is_empty() {
            let inner = block.inner(area);
            block.render(area, buf);
            if inner.height > 0 {
                Span::styled(self.kind.empty_text(), styles::text_muted()).render(inner, buf);
            }
            return;
        }

        let mut header = vec!["Flow"];
        let mut widths = vec![Constraint::Length(7)];
        if self.show_timestamps {
            header.push("Time");
            widths.push(Constraint::Length(8));
        }
        header.extend(["Label", "Conf", "Latency"]);
        widths.extend([
            Constraint::Min(8),
            Constraint::Length(6),
            Constraint::Length(9),
        ]);

        let rows = self.feed.iter().map(|entry| {
            let mut cells = vec![Cell::from(format!("#{}", entry.flow_number))];
            if self.show_timestamps {
                cells.push(Cell::from(entry.received_at.format("%H:%M:%S").to_string()));
            }
            cells.push(
                Cell::from(entry.label().to_string())
                    .style(styles::flow_label(entry.is_threat())),
            );
            cells.push(Cell::from(format_confidence(entry.confidence)));
            cells.push(Cell::from(format_latency(entry.inference_latency)));
            Row::new(cells).style(styles::text_secondary())
        });

        Table::new(rows, widths)
            .header(Row::new(header).style(styles::accent_bold()))
            .column_spacing(1)
            .block(block)
            .render(area, buf);
    }
}
