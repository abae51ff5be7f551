//! Model selection and scan mode

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use idsmon_core::{ModelKind, ScanMode};

use crate::theme::styles;

pub struct ModelPanel {
    model: ModelKind,
    mode: ScanMode,
    /// Selection is locked while a scan runs; it applies to the next start.
    scan_running: bool,
}

impl ModelPanel {
    pub fn new(model: ModelKind, mode: ScanMode, scan_running: bool) -> Self {
        Self {
            model,
            mode,
            scan_running,
        }
    }
}

impl Widget for ModelPanel {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false).title(" Model ");

        let model_line = Line::from(vec![
            Span::styled("◀ ", styles::text_muted()),
            Span::styled(self.model.display_name(), styles::accent_bold()),
            Span::styled(" ▶", styles::text_muted()),
        ]);
        let mode_line = Line::from(vec![
            Span::styled("mode ", styles::text_muted()),
            Span::styled(self.mode.as_str(), styles::text_primary()),
        ]);
        let hint = if self.scan_running {
            Line::from(Span::styled("applies to next scan", styles::text_muted()))
        } else {
            Line::from(vec![
                Span::styled("[m/M]", styles::keybinding()),
                Span::styled(" model ", styles::text_muted()),
                Span::styled("[v]", styles::keybinding()),
                Span::styled(" mode", styles::text_muted()),
            ])
        };

        Paragraph::new(vec![model_line, mode_line, hint])
            .block(block)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;

    #[test]
    fn test_model_panel_shows_selection() {
        let mut term = TestTerminal::new();
        term.render_widget(
            ModelPanel::new(ModelKind::IsolationForest, ScanMode::Deep, false),
            term.area(),
        );
        assert!(term.buffer_contains(ModelKind::IsolationForest.display_name()));
        assert!(term.buffer_contains("mode deep"));
        assert!(term.buffer_contains("[m/M]"));
    }

    #[test]
    fn test_model_panel_while_running() {
        let mut term = TestTerminal::new();
        term.render_widget(
            ModelPanel::new(ModelKind::RandomForest, ScanMode::Live, true),
            term.area(),
        );
        assert!(term.buffer_contains("applies to next scan"));
    }

    #[test]
    fn test_model_panel_shows_replay_mode() {
        let mut term = TestTerminal::new();
        term.render_widget(
            ModelPanel::new(ModelKind::RandomForest, ScanMode::Replay, false),
            term.area(),
        );
        assert!(term.buffer_contains("mode replay"));
    }
}
