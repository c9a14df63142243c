//! UI component tests
//!
//! Palettes, layout at different terminal sizes, and what each view draws.
//!
//! ## Test Cases
//! - palette contrast: text and status colors meet WCAG AA in both modes
//! - layout: every view renders at 80x24 (min) and 200x50 (large)
//! - selection, explore and quiz screens show their content
//! - focus mode hides header and status bar
//! - theme toggle switches the background

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use talking_animals::ambient::{MemoryPrefs, ThemeMode};
use talking_animals::app::App;
use talking_animals::content::{fallback_record, LoadReport, ANIMAL_IDS};
use talking_animals::models::{Catalog, Entity, Level, ViewState};
use talking_animals::notify::Notification;
use talking_animals::speech::SpeechService;
use talking_animals::ui::render;
use talking_animals::ui::theme::{color_to_rgb, meets_wcag_aa, Palette, DARK, LIGHT};

// =============================================================================
// Helpers
// =============================================================================

fn embedded_catalog() -> Catalog {
    Catalog::new(
        ANIMAL_IDS
            .iter()
            .filter_map(|id| fallback_record(id).map(|r| Entity::from_record(id, r)))
            .collect(),
    )
}

fn app() -> App {
    App::new(
        Arc::new(SpeechService::new(vec![])),
        Box::new(MemoryPrefs::default()),
    )
}

fn loaded_app() -> App {
    let mut app = app();
    app.set_catalog(embedded_catalog(), &LoadReport::default());
    app
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn draw(app: &App, width: u16, height: u16) -> Buffer {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| render(frame, app)).unwrap();
    terminal.backend().buffer().clone()
}

fn text_of(buffer: &Buffer) -> String {
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                out.push_str(cell.symbol());
            }
        }
        out.push('\n');
    }
    out
}

fn rgb(color: ratatui::style::Color) -> (u8, u8, u8) {
    color_to_rgb(color).expect("palette colors should all be RGB")
}

// =============================================================================
// PALETTE TESTS
// =============================================================================

#[test]
fn test_palette_colors_are_rgb() {
    for palette in [&LIGHT, &DARK] {
        for color in [
            palette.background,
            palette.surface,
            palette.text,
            palette.dim,
            palette.primary,
            palette.accent,
            palette.success,
            palette.error,
            palette.border,
        ] {
            assert!(color_to_rgb(color).is_some());
        }
    }
}

#[test]
fn test_palette_text_contrast() {
    for palette in [&LIGHT, &DARK] {
        for (name, fg) in [
            ("text", palette.text),
            ("dim", palette.dim),
            ("success", palette.success),
            ("error", palette.error),
            ("accent", palette.accent),
        ] {
            assert!(
                meets_wcag_aa(rgb(fg), rgb(palette.background)),
                "{} on background fails AA",
                name
            );
        }
    }
}

#[test]
fn test_light_and_dark_differ() {
    assert_ne!(LIGHT.background, DARK.background);
    assert_eq!(Palette::for_mode(ThemeMode::default()), &LIGHT);
}

// =============================================================================
// LAYOUT TESTS
// =============================================================================

#[test]
fn test_loading_placeholder_before_catalog() {
    let app = app();
    let text = text_of(&draw(&app, 80, 24));
    assert!(text.contains("Загружаем животных"), "{}", text);
}

#[test]
fn test_selection_screen() {
    let app = loaded_app();
    let text = text_of(&draw(&app, 100, 30));
    assert!(text.contains("Слушай и узнавай"));
    assert!(text.contains("Угадай животное"));
    assert!(text.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_every_view_renders_at_min_and_large_sizes() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let _guard = rt.enter();

    for (width, height) in [(80, 24), (200, 50), (20, 5)] {
        let mut app = loaded_app();
        draw(&app, width, height);

        app.handle_key(key(KeyCode::Char('1')));
        assert_eq!(app.view(), ViewState::Explore);
        draw(&app, width, height);

        app.handle_key(key(KeyCode::Esc));
        app.handle_key(key(KeyCode::Char('2')));
        assert_eq!(app.view(), ViewState::Quiz);
        draw(&app, width, height);
    }
}

#[test]
fn test_explore_shows_animal_names_and_moves_cursor() {
    let mut app = loaded_app();
    app.handle_key(key(KeyCode::Char('1')));

    let text = text_of(&draw(&app, 120, 40));
    assert!(text.contains("Корова"));
    assert!(text.contains("Собака"));

    app.handle_key(key(KeyCode::Right));
    app.handle_key(key(KeyCode::Down));
    assert_eq!(app.grid.selected, 1 + app.grid.columns);
}

#[test]
fn test_selection_cursor_and_enter() {
    let mut app = loaded_app();
    app.handle_key(key(KeyCode::Right));
    assert_eq!(app.level_cursor, Level::Quiz);
    app.handle_key(key(KeyCode::Left));
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.view(), ViewState::Explore);
}

#[test]
fn test_levels_blocked_while_loading() {
    let mut app = app();
    assert!(!app.handle_key(key(KeyCode::Char('1'))));
    assert_eq!(app.view(), ViewState::Selection);
}

#[test]
fn test_focus_mode_hides_chrome() {
    let mut app = loaded_app();
    app.handle_key(key(KeyCode::Char('1')));

    // Entering a level asks for fullscreen; state follows the host's notice
    assert!(!app.fullscreen.is_active());
    app.process_events();
    assert!(app.fullscreen.is_active());
    let text = text_of(&draw(&app, 120, 40));
    assert!(!text.contains("Говорящие животные"));

    app.handle_key(key(KeyCode::Char('f')));
    app.process_events();
    assert!(!app.fullscreen.is_active());
    let text = text_of(&draw(&app, 120, 40));
    assert!(text.contains("Говорящие животные"));
}

#[test]
fn test_theme_toggle_changes_background() {
    let mut app = loaded_app();
    let before = draw(&app, 80, 24);
    assert_eq!(before.cell((0, 0)).unwrap().bg, LIGHT.background);

    app.handle_key(key(KeyCode::Char('t')));
    assert_eq!(app.theme.mode(), ThemeMode::Dark);

    let after = draw(&app, 80, 24);
    assert_eq!(after.cell((0, 0)).unwrap().bg, DARK.background);
}

#[test]
fn test_toast_is_drawn() {
    let mut app = loaded_app();
    app.notifier
        .push(Notification::error("Ошибка TTS", "Синтез речи недоступен"));

    let text = text_of(&draw(&app, 100, 30));
    assert!(text.contains("Ошибка TTS"));
}

#[test]
fn test_x_dismisses_newest_toast() {
    let mut app = loaded_app();
    app.notifier.push(Notification::info("Первый", "один"));
    app.notifier.push(Notification::error("Второй", "два"));

    assert!(app.handle_key(key(KeyCode::Char('x'))));
    let titles: Vec<_> = app
        .notifier
        .visible()
        .iter()
        .map(|t| t.notification.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Первый"]);

    assert!(app.handle_key(key(KeyCode::Char('x'))));
    assert!(app.notifier.is_empty());
    assert!(!text_of(&draw(&app, 100, 30)).contains("Первый"));

    // Nothing left to dismiss
    assert!(!app.handle_key(key(KeyCode::Char('x'))));
}

#[tokio::test]
async fn test_quiz_screen_banner_and_cards() {
    let mut app = loaded_app();
    app.handle_key(key(KeyCode::Char('2')));
    assert_eq!(app.controller.cards().len(), 4);
    assert_eq!(app.grid.columns, 2);

    let text = text_of(&draw(&app, 100, 30));
    assert!(text.contains("Кто так говорит?"));
    assert!(text.contains("повторить"));

    // Pick a wrong option by number
    let target = app.controller.challenge().unwrap().target.id.clone();
    let wrong = app
        .controller
        .cards()
        .iter()
        .position(|e| e.id != target)
        .unwrap();
    let digit = char::from_digit(wrong as u32 + 1, 10).unwrap();
    app.handle_key(key(KeyCode::Char(digit)));

    let text = text_of(&draw(&app, 100, 30));
    assert!(text.contains("Попробуй ещё"));
    assert!(app.quiz_locked());
}
