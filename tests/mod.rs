//! Integration tests for Talking Animals
//!
//! Tests are organized by component:
//! - content_test: catalog loading, HTTP and directory sources, fallback
//! - speech_test: engine chain, single-flight playback, process engines
//! - quiz_test: challenge generation and the quiz state machine
//! - ui_test: palettes and rendering with the test backend
//! - e2e_test: full app flows through keyboard input and background events
//! - cli_test: argument parsing and command handlers
//!
//! Shared doubles live in `common/`.

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
