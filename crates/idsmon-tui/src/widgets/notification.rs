//! Centered modal for the single pending notification

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Widget, Wrap},
};

use idsmon_app::Notification;

use super::modal_overlay::{centered_rect, dim_background, render_shadow};
use crate::theme::styles;

const MODAL_WIDTH: u16 = 56;
const MODAL_HEIGHT: u16 = 9;

pub struct NotificationModal<'a> {
    notification: &'a Notification,
}

impl<'a> NotificationModal<'a> {
    pub fn new(notification: &'a Notification) -> Self {
        Self { notification }
    }
}

impl Widget for NotificationModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        dim_background(buf, area);

        let modal = centered_rect(MODAL_WIDTH, MODAL_HEIGHT, area);
        render_shadow(buf, modal);
        Clear.render(modal, buf);

        let title = format!(" {} ", self.notification.title);
        let block = styles::modal_block(&title)
            .title_style(styles::notification_style(self.notification.kind));
        let inner = block.inner(modal);
        block.render(modal, buf);

        let [body, hint] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        Paragraph::new(self.notification.message.as_str())
            .style(styles::text_primary())
            .wrap(Wrap { trim: true })
            .render(body, buf);

        Line::from(vec![
            Span::styled("Enter", styles::keybinding()),
            Span::styled(" to dismiss", styles::text_muted()),
        ])
        .alignment(Alignment::Center)
        .render(hint, buf);
    }
}
