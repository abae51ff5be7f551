//! Header bar: title, page tabs and connection status

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use idsmon_app::state::{ConnectionStatus, UiMode};

use crate::theme::{palette, styles};

pub struct MainHeader<'a> {
    ui_mode: UiMode,
    connection: &'a ConnectionStatus,
}

impl<'a> MainHeader<'a> {
    pub fn new(ui_mode: UiMode, connection: &'a ConnectionStatus) -> Self {
        Self {
            ui_mode,
            connection,
        }
    }

    fn tab(&self, key: &'static str, label: &'static str, mode: UiMode) -> Vec<Span<'static>> {
        let style = if self.ui_mode == mode {
            styles::accent_bold()
        } else {
            styles::text_muted()
        };
        vec![
            Span::styled(format!("[{key}] "), styles::keybinding()),
            Span::styled(label, style),
            Span::raw("  "),
        ]
    }
}

impl Widget for MainHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let (icon, icon_style) = styles::connection_indicator(self.connection);

        let mut left = vec![
            Span::raw(" "),
            Span::styled(icon, icon_style),
            Span::raw(" "),
            Span::styled("IDS Monitor", styles::accent_bold()),
            Span::raw("   "),
        ];
        left.extend(self.tab("1", "Dashboard", UiMode::Dashboard));
        left.extend(self.tab("2", "Settings", UiMode::Settings));
        let left = Line::from(left);
        let left_width = left.width() as u16;
        left.render(inner, buf);

        // Right-aligned connection text, dropped when it does not fit
        let status = format!("{} ", self.connection.label());
        let status_width = status.chars().count() as u16;
        if left_width + status_width < inner.width {
            let x = inner.x + inner.width - status_width;
            buf.set_string(
                x,
                inner.y,
                status,
                Style::default().fg(palette::TEXT_SECONDARY),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;

    #[test]
    fn test_header_shows_title_and_tabs() {
        let mut term = TestTerminal::new();
        let status = ConnectionStatus::Disconnected;
        term.render_widget(MainHeader::new(UiMode::Dashboard, &status), term.area());

        assert!(term.line_contains(1, "IDS Monitor"));
        assert!(term.line_contains(1, "Dashboard"));
        assert!(term.line_contains(1, "Settings"));
        assert!(term.line_contains(1, "disconnected"));
    }

    #[test]
    fn test_header_shows_endpoint_when_connected() {
        let mut term = TestTerminal::with_size(120, 3);
        let status = ConnectionStatus::Connected {
            endpoint: "ws://127.0.0.1:5000".into(),
        };
        term.render_widget(MainHeader::new(UiMode::Settings, &status), term.area());
        assert!(term.buffer_contains("connected to ws://127.0.0.1:5000"));
    }

    #[test]
    fn test_header_drops_status_on_narrow_terminal() {
        let mut term = TestTerminal::compact();
        let status = ConnectionStatus::Connected {
            endpoint: "ws://127.0.0.1:5000".into(),
        };
        term.render_widget(MainHeader::new(UiMode::Dashboard, &status), term.area());
        assert!(!term.buffer_contains("ws://127.0.0.1:5000"));
    }
}
