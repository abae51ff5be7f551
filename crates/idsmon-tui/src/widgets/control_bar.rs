//! Start/stop controls
//!
//! Availability comes from [`Controls`]; this widget only draws it.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use idsmon_app::Controls;

use crate::theme::{palette, styles};

/// What the control bar reports, in lifecycle order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    NoInterface,
    Ready,
    Scanning,
}

impl ScanPhase {
    pub fn derive(controls: Controls, is_scanning: bool) -> Self {
        if controls.can_stop || is_scanning {
            ScanPhase::Scanning
        } else if controls.can_start {
            ScanPhase::Ready
        } else {
            ScanPhase::NoInterface
        }
    }

    fn label(&self) -> (&'static str, Style) {
        match self {
            ScanPhase::NoInterface => (
                "No interface, see settings",
                Style::default().fg(palette::STATUS_YELLOW),
            ),
            ScanPhase::Ready => ("Ready", Style::default().fg(palette::STATUS_GREEN)),
            ScanPhase::Scanning => ("Scanning", styles::accent_bold()),
        }
    }
}

pub struct ControlBar {
    controls: Controls,
    phase: ScanPhase,
}

impl ControlBar {
    pub fn new(controls: Controls, is_scanning: bool) -> Self {
        Self {
            controls,
            phase: ScanPhase::derive(controls, is_scanning),
        }
    }
}

fn button(key: &'static str, label: &'static str, enabled: bool) -> Line<'static> {
    let (key_style, label_style) = if enabled {
        (styles::keybinding(), styles::text_primary())
    } else {
        (styles::text_muted(), styles::text_muted())
    };
    Line::from(vec![
        Span::styled(format!("[{key}] "), key_style),
        Span::styled(label, label_style),
    ])
}

impl Widget for ControlBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(self.phase == ScanPhase::Scanning).title(" Controls ");
        let (label, style) = self.phase.label();

        Paragraph::new(vec![
            Line::from(Span::styled(label, style)),
            button("s", "Start scan", self.controls.can_start),
            button("x", "Stop scan", self.controls.can_stop),
        ])
        .block(block)
        .render(area, buf);
    }
}
