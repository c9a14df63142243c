//! Top-level screen rendering
//!
//! Header, active view, status bar and toast overlay. Focus mode (terminal
//! fullscreen) drops the header and status bar.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::controller::QuizPhase;
use crate::models::{Feedback, Level, ViewState};
use crate::ui::cards::{CardGrid, CardLabel};
use crate::ui::theme::Palette;
use crate::ui::toast::render_toasts;

/// Main render function - dispatches to view-specific renderers
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let palette = Palette::for_mode(app.theme.mode());

    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background)),
        area,
    );

    let content = if app.fullscreen.is_active() {
        area
    } else {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(1),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);
        render_header(frame, chunks[0], app, palette);
        render_status_bar(frame, chunks[2], app, palette);
        chunks[1]
    };

    if app.loading.is_loading() {
        let msg = app.loading.message().unwrap_or("Загружаем...");
        render_loading(frame, content, msg, palette);
    } else {
        match app.view() {
            ViewState::Selection => render_selection(frame, content, app, palette),
            ViewState::Explore => render_explore(frame, content, app, palette),
            ViewState::Quiz => render_quiz(frame, content, app, palette),
        }
    }

    render_toasts(frame, area, app.notifier.visible(), palette);
}

/// Render the header with the app title and current view
fn render_header(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let subtitle = match app.view() {
        ViewState::Selection => "Выбери уровень",
        ViewState::Explore => "Слушай и узнавай",
        ViewState::Quiz => "Угадай, кто это",
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled("🐾 Говорящие животные", palette.title()),
        Span::styled(format!("  ·  {}", subtitle), palette.dimmed()),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(palette.border()),
    );
    frame.render_widget(header, area);
}

fn render_loading(frame: &mut Frame, area: Rect, msg: &str, palette: &Palette) {
    let para = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(format!("⟳ {}", msg), palette.loading())),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(para, area);
}

fn render_selection(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(7),
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(10),
            Constraint::Percentage(38),
            Constraint::Percentage(4),
            Constraint::Percentage(38),
            Constraint::Percentage(10),
        ])
        .split(rows[1]);

    render_level_button(
        frame,
        buttons[1],
        "1",
        "🔊 Слушай и узнавай",
        app.level_cursor == Level::Explore,
        palette,
    );
    render_level_button(
        frame,
        buttons[3],
        "2",
        "❓ Угадай животное",
        app.level_cursor == Level::Quiz,
        palette,
    );

    let theme_hint = Paragraph::new(Line::from(vec![
        Span::styled(" t ", palette.keybind()),
        Span::styled(format!("тема: {}", app.theme.mode()), palette.keybind_desc()),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(theme_hint, rows[2]);

    if !app.controller.catalog().supports_quiz() {
        let warn = Paragraph::new(Span::styled(
            format!("Загружено животных: {}", app.controller.catalog().len()),
            palette.dimmed(),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(warn, rows[3]);
    }

    let footer = Paragraph::new(Span::styled(
        format!("Говорящие животные v{}", env!("CARGO_PKG_VERSION")),
        palette.dimmed(),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(footer, rows[4]);
}

fn render_level_button(
    frame: &mut Frame,
    area: Rect,
    key: &str,
    label: &str,
    focused: bool,
    palette: &Palette,
) {
    let (style, border) = if focused {
        (palette.card_selected(), palette.border_focused())
    } else {
        (palette.card(), palette.border())
    };

    let button = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(label, style.add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(format!("[{}]", key), style)),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(if focused {
                BorderType::Thick
            } else {
                BorderType::Rounded
            })
            .border_style(border)
            .style(style),
    );
    frame.render_widget(button, area);
}

fn render_explore(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let cards = app.controller.cards();
    if cards.is_empty() {
        let empty = Paragraph::new("Животные не загрузились")
            .style(palette.dimmed())
            .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    CardGrid::new(cards, &app.grid, palette).render(frame, area);
}

fn render_quiz(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Banner
            Constraint::Min(1),    // Options
            Constraint::Length(1), // Hints
        ])
        .split(area);

    let feedback = app.controller.feedback();
    let banner = match (feedback, feedback.banner()) {
        (Feedback::Correct, Some(text)) => Span::styled(text, palette.success()),
        (Feedback::Incorrect, Some(text)) => Span::styled(text, palette.error()),
        _ if app.quiz_phase() == QuizPhase::Idle => {
            Span::styled("Нажми n, чтобы начать", palette.dimmed())
        }
        _ => Span::styled("Кто так говорит?", palette.title()),
    };
    frame.render_widget(
        Paragraph::new(Line::from(banner)).alignment(Alignment::Center),
        rows[0],
    );

    let cards = app.controller.cards();
    let grid_area = centered(rows[1], 60);
    CardGrid::new(cards, &app.grid, palette)
        .enabled(app.controller.options_enabled())
        .label(CardLabel::Number)
        .render(frame, grid_area);

    let hint_style = |enabled: bool| {
        if enabled {
            (palette.keybind(), palette.keybind_desc())
        } else {
            (palette.dimmed(), palette.dimmed())
        }
    };
    let (repeat_key, repeat_desc) = hint_style(app.controller.options_enabled());
    let can_advance =
        app.quiz_phase() == QuizPhase::Idle || app.controller.options_enabled();
    let (next_key, next_desc) = hint_style(can_advance);
    let hints = Paragraph::new(Line::from(vec![
        Span::styled(" r ", repeat_key),
        Span::styled("повторить  ", repeat_desc),
        Span::styled(" n ", next_key),
        Span::styled("дальше  ", next_desc),
        Span::styled(" 1-4 ", palette.keybind()),
        Span::styled("ответ", palette.keybind_desc()),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(hints, rows[2]);
}

/// Render status bar at bottom
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let view = Span::styled(
        format!(" {} ", format!("{:?}", app.view()).to_uppercase()),
        Style::default().fg(palette.background).bg(palette.primary),
    );

    let help = match app.view() {
        ViewState::Selection => " 1/2:уровень  t:тема  x:скрыть  q:выход ",
        ViewState::Explore => " ←↑↓→:выбор  Enter:слушать  f:экран  Esc:назад  q:выход ",
        ViewState::Quiz => " Enter:ответ  r:повтор  n:дальше  f:экран  Esc:назад ",
    };

    let status_line = Line::from(vec![
        view,
        Span::raw(" "),
        Span::styled(
            format!("{} животных", app.controller.catalog().len()),
            palette.dimmed(),
        ),
        Span::raw(" │ "),
        Span::styled(help, palette.dimmed()),
    ]);

    let status = Paragraph::new(status_line).style(palette.status_bar());
    frame.render_widget(status, area);
}

/// Horizontally centered sub-area of the given width percentage
fn centered(area: Rect, percent: u16) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent.min(100)) / 100) as u16;
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}
