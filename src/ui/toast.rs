//! Toast stack, bottom-right corner

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::notify::Toast;
use crate::ui::theme::Palette;

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 4;

/// Area of the n-th toast counted from the bottom
pub fn toast_area(area: Rect, slot: u16) -> Option<Rect> {
    let width = TOAST_WIDTH.min(area.width);
    let offset = (slot + 1) * TOAST_HEIGHT;
    if width == 0 || offset > area.height {
        return None;
    }
    Some(Rect {
        x: area.x + area.width - width,
        y: area.y + area.height - offset,
        width,
        height: TOAST_HEIGHT,
    })
}

/// Draw toasts newest at the bottom
pub fn render_toasts(frame: &mut Frame, area: Rect, toasts: &[Toast], palette: &Palette) {
    for (slot, toast) in toasts.iter().rev().enumerate() {
        let Some(rect) = toast_area(area, slot as u16) else {
            break;
        };

        let accent = if toast.notification.is_destructive() {
            palette.error()
        } else {
            palette.success()
        };

        frame.render_widget(Clear, rect);
        let body = Paragraph::new(toast.notification.description.as_str())
            .style(palette.text())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(accent)
                    .title(Span::styled(format!(" {} ", toast.notification.title), accent))
                    .style(Style::default().bg(palette.background)),
            );
        frame.render_widget(body, rect);
    }
}
