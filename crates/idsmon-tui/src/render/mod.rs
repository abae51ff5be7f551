//! Main render/view function (View in TEA pattern)


use idsmon_app::{AppState, UiMode};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use super::{layout, widgets};
use crate::theme::{palette, styles};

/// Below this the dashboard grid collapses into unreadable slivers.
pub const MIN_WIDTH: u16 = 40;
pub const MIN_HEIGHT: u16 = 16;

/// Render the complete UI.
///
/// Pure over `state`; everything shown is derived from it.
pub fn view(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    let bg_block = Block::default().style(Style::default().bg(palette::DEEPEST_BG));
    frame.render_widget(bg_block, area);

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        render_too_small(frame, area);
        return;
    }

    match state.ui_mode {
        UiMode::Dashboard => render_dashboard(frame, area, state),
        UiMode::Settings => render_settings(frame, area, state),
    }

    if let Some(notification) = &state.notification {
        frame.render_widget(widgets::NotificationModal::new(notification), area);
    }
}

fn render_dashboard(frame: &mut Frame, area: Rect, state: &AppState) {
    let areas = layout::dashboard(area);
    let dashboard = &state.dashboard;
    let show_timestamps = state.config.ui.show_timestamps;

    frame.render_widget(
        widgets::MainHeader::new(state.ui_mode, &state.connection),
        areas.header,
    );
    frame.render_widget(
        widgets::TrafficInfo::new(&dashboard.metrics, dashboard.threats_detected),
        areas.traffic,
    );
    frame.render_widget(
        widgets::ModelPanel::new(dashboard.model, dashboard.mode, dashboard.is_running),
        areas.model,
    );
    frame.render_widget(
        widgets::FlowTable::new(&dashboard.logs, widgets::FlowTableKind::Log)
            .show_timestamps(show_timestamps),
        areas.logs,
    );
    frame.render_widget(
        widgets::FlowTable::new(&dashboard.alerts, widgets::FlowTableKind::Alerts)
            .show_timestamps(show_timestamps),
        areas.alerts,
    );
    frame.render_widget(widgets::SummaryPanel::new(dashboard), areas.summary);
    frame.render_widget(
        widgets::ControlBar::new(state.controls(), dashboard.metrics.is_scanning),
        areas.controls,
    );
}

fn render_settings(frame: &mut Frame, area: Rect, state: &AppState) {
    let areas = layout::settings(area);
    frame.render_widget(
        widgets::MainHeader::new(state.ui_mode, &state.connection),
        areas.header,
    );

    if !state.settings_loaded {
        let loading = Paragraph::new(Line::from("Loading settings..."))
            .style(styles::text_muted())
            .alignment(Alignment::Center)
            .block(styles::glass_block(true).title(" Settings "));
        frame.render_widget(loading, areas.panel);
        return;
    }

    frame.render_widget(widgets::SettingsPanel::new(&state.form), areas.panel);
}

fn render_too_small(frame: &mut Frame, area: Rect) {
    let message = Paragraph::new(vec![
        Line::from("Terminal too small"),
        Line::from(format!("need {MIN_WIDTH}x{MIN_HEIGHT}")),
    ])
    .style(styles::text_secondary())
    .alignment(Alignment::Center);
    frame.render_widget(message, area);
}
