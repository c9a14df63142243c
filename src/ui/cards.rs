//! Animal card grid
//!
//! Lays cards out row by row and scrolls whole rows so the cursor stays
//! visible.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::app::GridState;
use crate::models::Entity;
use crate::ui::theme::Palette;

/// Rows taken by one card including its border
pub const CARD_HEIGHT: u16 = 5;

/// Label style for a card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardLabel {
    /// Show the animal's name under the icon
    Name,
    /// Show the option number (quiz)
    Number,
}

/// Card grid widget
pub struct CardGrid<'a> {
    cards: &'a [Entity],
    grid: &'a GridState,
    palette: &'a Palette,
    enabled: bool,
    label: CardLabel,
}

impl<'a> CardGrid<'a> {
    pub fn new(cards: &'a [Entity], grid: &'a GridState, palette: &'a Palette) -> Self {
        Self {
            cards,
            grid,
            palette,
            enabled: true,
            label: CardLabel::Name,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn label(mut self, label: CardLabel) -> Self {
        self.label = label;
        self
    }

    /// First row to draw so the selected row is on screen
    pub fn first_visible_row(&self, visible_rows: usize) -> usize {
        let selected_row = self.grid.row_of(self.grid.selected);
        if visible_rows == 0 || selected_row < visible_rows {
            0
        } else {
            selected_row + 1 - visible_rows
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let columns = self.grid.columns.max(1);
        let visible_rows = (area.height / CARD_HEIGHT) as usize;
        if visible_rows == 0 || area.width == 0 {
            return;
        }
        let first_row = self.first_visible_row(visible_rows);
        let card_width = area.width / columns as u16;

        for (index, entity) in self.cards.iter().enumerate() {
            let row = index / columns;
            if row < first_row || row >= first_row + visible_rows {
                continue;
            }
            let col = (index % columns) as u16;
            let card_area = Rect {
                x: area.x + col * card_width,
                y: area.y + (row - first_row) as u16 * CARD_HEIGHT,
                width: card_width,
                height: CARD_HEIGHT,
            };
            self.render_card(frame, card_area, index, entity);
        }
    }

    fn render_card(&self, frame: &mut Frame, area: Rect, index: usize, entity: &Entity) {
        let selected = index == self.grid.selected;
        let (style, border) = match (self.enabled, selected) {
            (false, _) => (self.palette.card_disabled(), self.palette.border()),
            (true, true) => (self.palette.card_selected(), self.palette.border_focused()),
            (true, false) => (self.palette.card(), self.palette.border()),
        };

        let label = match self.label {
            CardLabel::Name => entity.name.clone(),
            CardLabel::Number => format!("{}", index + 1),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if selected {
                BorderType::Thick
            } else {
                BorderType::Rounded
            })
            .border_style(border)
            .style(style);

        let content = Paragraph::new(vec![
            Line::from(entity.icon.as_str()),
            Line::from(""),
            Line::from(Span::styled(label, style)),
        ])
        .alignment(Alignment::Center)
        .block(block);

        frame.render_widget(content, area);
    }
}
