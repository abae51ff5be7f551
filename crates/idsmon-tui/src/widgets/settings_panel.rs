//! Settings page: adapter picker, GUID, log path and boot toggle

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use idsmon_app::{config::StartOnBoot, SettingsField, SettingsForm};

use crate::theme::{palette, styles};

const INDICATOR_WIDTH: u16 = 3;
const LABEL_WIDTH: u16 = 20;
const CURSOR: &str = "█";

pub struct SettingsPanel<'a> {
    form: &'a SettingsForm,
}

impl<'a> SettingsPanel<'a> {
    pub fn new(form: &'a SettingsForm) -> Self {
        Self { form }
    }

    fn value_spans(&self, field: SettingsField, focused: bool, width: usize) -> Vec<Span<'static>> {
        let form = self.form;
        let value_style = if focused {
            styles::text_primary().add_modifier(Modifier::BOLD)
        } else {
            styles::text_secondary()
        };

        match field {
            SettingsField::Interface => {
                if form.interfaces.is_empty() {
                    let current = form.draft.capture_interface.trim();
                    let text = if current.is_empty() {
                        "No adapters (Ctrl+R to refresh)".to_string()
                    } else {
                        format!("{current} (no adapter list)")
                    };
                    return vec![Span::styled(
                        truncate_start(&text, width),
                        styles::text_muted(),
                    )];
                }
                let name = form
                    .selected_name()
                    .unwrap_or(form.draft.capture_interface.as_str());
                let name = if name.trim().is_empty() { "none" } else { name };
                let position = form
                    .selected_interface
                    .map(|i| format!("  {}/{}", i + 1, form.interfaces.len()))
                    .unwrap_or_default();
                vec![
                    Span::styled("◀ ", styles::accent()),
                    Span::styled(truncate_start(name, width.saturating_sub(12)), value_style),
                    Span::styled(" ▶", styles::accent()),
                    Span::styled(position, styles::text_muted()),
                ]
            }
            SettingsField::Guid | SettingsField::LogPath => {
                let text = if field == SettingsField::Guid {
                    form.draft.guid.as_str()
                } else {
                    form.draft.log_path.as_str()
                };
                if focused && field.is_text() {
                    vec![
                        Span::styled(
                            truncate_start(text, width.saturating_sub(1)),
                            value_style,
                        ),
                        Span::styled(CURSOR, styles::accent()),
                    ]
                } else if text.is_empty() {
                    let hint = if field == SettingsField::Guid {
                        "(set by the adapter)"
                    } else {
                        "(not set)"
                    };
                    vec![Span::styled(hint, styles::text_muted())]
                } else {
                    vec![Span::styled(truncate_start(text, width), value_style)]
                }
            }
            SettingsField::StartOnBoot => {
                let style = match form.draft.start_on_boot {
                    StartOnBoot::On => Style::default().fg(palette::STATUS_GREEN),
                    StartOnBoot::Off => Style::default().fg(palette::STATUS_RED),
                };
                vec![Span::styled(
                    form.draft.start_on_boot.as_str(),
                    if focused {
                        style.add_modifier(Modifier::BOLD)
                    } else {
                        style
                    },
                )]
            }
        }
    }

    fn render_row(&self, field: SettingsField, area: Rect, buf: &mut Buffer) {
        let focused = self.form.focus == field;

        if focused {
            buf.set_style(area, Style::default().bg(palette::BORDER_DIM));
            if let Some(cell) = buf.cell_mut((area.x, area.y)) {
                cell.set_symbol("▎");
                cell.set_fg(palette::ACCENT);
            }
        }

        let label_style = if focused {
            styles::text_primary().add_modifier(Modifier::BOLD)
        } else {
            styles::text_secondary()
        };
        let label_x = area.x + INDICATOR_WIDTH;
        let label_width = LABEL_WIDTH.min(area.width.saturating_sub(INDICATOR_WIDTH));
        buf.set_stringn(
            label_x,
            area.y,
            field.label(),
            label_width as usize,
            label_style,
        );

        let value_x = label_x + label_width;
        let value_width = area.right().saturating_sub(value_x);
        if value_width == 0 {
            return;
        }
        let line = Line::from(self.value_spans(field, focused, value_width as usize));
        buf.set_line(value_x, area.y, &line, value_width);
    }

    fn render_footer(&self, area: Rect, buf: &mut Buffer) {
        let save_label = if self.form.dirty { "save*" } else { "save" };
        let enter_label = match self.form.focus {
            SettingsField::LogPath => "use folder",
            SettingsField::Guid => "next",
            _ => "change",
        };
        let hint = |key: &'static str, label: &'static str| {
            [
                Span::styled(key, styles::keybinding()),
                Span::styled(format!(" {label}  "), styles::text_muted()),
            ]
        };

        let mut spans = Vec::new();
        spans.extend(hint("↑/↓", "move"));
        spans.extend(hint("←/→", "cycle"));
        spans.extend(hint("Enter", enter_label));
        spans.extend(hint("Ctrl+S", save_label));
        spans.extend(hint("Ctrl+D", "discard"));
        spans.extend(hint("Ctrl+R", "adapters"));
        spans.extend(hint("Esc", "back"));

        Paragraph::new(Line::from(spans))
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

impl Widget for SettingsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.form.dirty {
            " Settings (unsaved) "
        } else {
            " Settings "
        };
        let block = styles::glass_block(true).title(title);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 {
            return;
        }

        let [rows_area, footer_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(2)]).areas(inner);

        // One blank line between rows when there is room.
        let stride = if rows_area.height >= (SettingsField::ALL.len() as u16) * 2 {
            2
        } else {
            1
        };
        for (i, field) in SettingsField::ALL.iter().enumerate() {
            let y = rows_area.y + i as u16 * stride;
            if y >= rows_area.bottom() {
                break;
            }
            let row = Rect::new(rows_area.x, y, rows_area.width, 1);
            self.render_row(*field, row, buf);
        }

        self.render_footer(footer_area, buf);
    }
}

/// Keep the tail of `text` within `max_width` columns, prefixing `…` when cut.
fn truncate_start(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let room = max_width - 1;
    let mut used = 0;
    let mut tail: Vec<char> = Vec::new();
    for c in text.chars().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > room {
            break;
        }
        used += w;
        tail.push(c);
    }
    let mut out = String::from("…");
    out.extend(tail.into_iter().rev());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_interface, TestTerminal};
    use idsmon_app::config::Settings;

    fn form_with_adapters() -> SettingsForm {
        let mut form = SettingsForm::from_settings(&Settings::default());
        form.set_interfaces(vec![
            test_interface("Ethernet", "{ETH-0}"),
            test_interface("Wi-Fi", "{WIFI-1}"),
        ]);
        form
    }

    #[test]
    fn test_renders_all_labels() {
        let mut term = TestTerminal::new();
        let form = form_with_adapters();
        term.render_widget(SettingsPanel::new(&form), term.area());

        for field in SettingsField::ALL {
            assert!(term.buffer_contains(field.label()), "{:?}", field);
        }
        assert!(term.buffer_contains("◀ Ethernet ▶"));
        assert!(term.buffer_contains("1/2"));
        assert!(term.buffer_contains("{ETH-0}"));
    }

    #[test]
    fn test_empty_adapter_list_hint() {
        let mut term = TestTerminal::new();
        let form = SettingsForm::default();
        term.render_widget(SettingsPanel::new(&form), term.area());
        assert!(term.buffer_contains("No adapters (Ctrl+R to refresh)"));
        assert!(term.buffer_contains("(not set)"));
    }

    #[test]
    fn test_dirty_marker_in_title() {
        let mut term = TestTerminal::new();
        let form = form_with_adapters();
        assert!(form.dirty);
        term.render_widget(SettingsPanel::new(&form), term.area());
        assert!(term.line_contains(0, "Settings (unsaved)"));
        assert!(term.buffer_contains("save*"));
    }

    #[test]
    fn test_focused_text_field_shows_cursor() {
        let mut term = TestTerminal::new();
        let mut form = SettingsForm::default();
        form.focus = SettingsField::LogPath;
        form.input_char('C');
        term.render_widget(SettingsPanel::new(&form), term.area());
        assert!(term.buffer_contains(&format!("C{CURSOR}")));
        assert!(term.buffer_contains("use folder"));
    }

    #[test]
    fn test_focused_guid_has_no_cursor() {
        let mut term = TestTerminal::new();
        let mut form = form_with_adapters();
        form.focus = SettingsField::Guid;
        term.render_widget(SettingsPanel::new(&form), term.area());
        assert!(term.buffer_contains("{ETH-0}"));
        assert!(!term.buffer_contains(CURSOR));
    }

    #[test]
    fn test_truncate_start_keeps_tail() {
        assert_eq!(truncate_start("short", 10), "short");
        assert_eq!(truncate_start("C:/very/long/path", 8), "…ng/path");
        assert_eq!(truncate_start("abc", 0), "");
    }
}
