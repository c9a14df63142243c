//! Terminal UI components
//!
//! Built with ratatui. Keyboard-first navigation throughout, with light and
//! dark palettes.

pub mod cards;
pub mod screen;
pub mod theme;
pub mod toast;

pub use screen::render;
pub use theme::Palette;
