//! Semantic style builders

use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

use idsmon_app::state::{ConnectionStatus, NotificationKind};

use super::palette;

// --- Text styles ---
pub fn text_primary() -> Style {
    Style::default().fg(palette::TEXT_PRIMARY)
}

pub fn text_secondary() -> Style {
    Style::default().fg(palette::TEXT_SECONDARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(palette::TEXT_MUTED)
}

// --- Border styles ---
pub fn border_inactive() -> Style {
    Style::default().fg(palette::BORDER_DIM)
}

pub fn border_active() -> Style {
    Style::default().fg(palette::BORDER_ACTIVE)
}

// --- Accent styles ---
pub fn accent() -> Style {
    Style::default().fg(palette::ACCENT)
}

pub fn accent_bold() -> Style {
    Style::default()
        .fg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// Key hint such as `[s]`
pub fn keybinding() -> Style {
    Style::default().fg(palette::STATUS_YELLOW)
}

/// Focused row on the settings page
pub fn focused_selected() -> Style {
    Style::default()
        .fg(palette::CONTRAST_FG)
        .bg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn error_text() -> Style {
    Style::default().fg(palette::STATUS_RED)
}

// --- Flow classification ---
pub fn flow_label(is_threat: bool) -> Style {
    if is_threat {
        Style::default()
            .fg(palette::FLOW_THREAT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette::FLOW_BENIGN)
    }
}

// --- Block builders ---
pub fn glass_block(focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            border_active()
        } else {
            border_inactive()
        })
        .style(Style::default().bg(palette::CARD_BG))
}

pub fn modal_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_active())
        .style(Style::default().bg(palette::POPUP_BG))
}

// --- Indicators ---

/// `(icon, Style)` for the connection dot in the header
pub fn connection_indicator(status: &ConnectionStatus) -> (&'static str, Style) {
    match status {
        ConnectionStatus::Connected { .. } => (
            "●",
            Style::default()
                .fg(palette::STATUS_GREEN)
                .add_modifier(Modifier::BOLD),
        ),
        ConnectionStatus::Connecting => ("◌", Style::default().fg(palette::STATUS_YELLOW)),
        ConnectionStatus::Disconnected => ("○", text_muted()),
        ConnectionStatus::Lost { .. } => ("✗", Style::default().fg(palette::STATUS_RED)),
    }
}

pub fn notification_style(kind: NotificationKind) -> Style {
    let color = match kind {
        NotificationKind::Info => palette::STATUS_BLUE,
        NotificationKind::Success => palette::STATUS_GREEN,
        NotificationKind::Error => palette::STATUS_RED,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}
