//! Screen layout definitions for the TUI

use ratatui::layout::{Constraint, Layout, Rect};

/// Header height: top border + title row + bottom border
pub const HEADER_HEIGHT: u16 = 3;
/// Traffic info / model panel row
pub const INFO_HEIGHT: u16 = 5;
/// Summary / controls row
pub const FOOTER_HEIGHT: u16 = 5;

/// Areas of the dashboard screen
#[derive(Debug, Clone, Copy)]
pub struct DashboardAreas {
    pub header: Rect,
    pub traffic: Rect,
    pub model: Rect,
    pub logs: Rect,
    pub alerts: Rect,
    pub summary: Rect,
    pub controls: Rect,
}

/// Areas of the settings screen
#[derive(Debug, Clone, Copy)]
pub struct SettingsAreas {
    pub header: Rect,
    pub panel: Rect,
}

pub fn dashboard(area: Rect) -> DashboardAreas {
    let [header, info, body, footer] = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Length(INFO_HEIGHT),
        Constraint::Min(3),
        Constraint::Length(FOOTER_HEIGHT),
    ])
    .areas(area);

    let [traffic, model] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(info);
    let [logs, alerts] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(body);
    let [summary, controls] =
        Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)])
            .areas(footer);

    DashboardAreas {
        header,
        traffic,
        model,
        logs,
        alerts,
        summary,
        controls,
    }
}

pub fn settings(area: Rect) -> SettingsAreas {
    let [header, panel] =
        Layout::vertical([Constraint::Length(HEADER_HEIGHT), Constraint::Min(3)]).areas(area);
    SettingsAreas { header, panel }
}
