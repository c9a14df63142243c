//! Ambient UI controllers
//!
//! Theme (light/dark, persisted) and fullscreen (mirrors the host's actual
//! state). Both are owned by the app and passed to whatever needs them.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage key of the theme preference
pub const THEME_KEY: &str = "app-theme";

// =============================================================================
// Preference Storage
// =============================================================================

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("Failed to write preferences: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode preferences: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Durable key-value storage for UI preferences
pub trait PreferenceStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError>;
}

/// Preferences kept in a TOML file
#[derive(Debug)]
pub struct FilePrefs {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePrefs {
    /// Open (or lazily create) a preference file; unreadable files start empty
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = std::fs::read_to_string(&path)
            .ok()
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default();
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string(&self.values)?)?;
        Ok(())
    }
}

/// Volatile preferences (tests, read-only environments)
#[derive(Debug, Default)]
pub struct MemoryPrefs {
    values: BTreeMap<String, String>,
}

impl PreferenceStore for MemoryPrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// Theme
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

/// Current theme plus the store it is persisted to
pub struct ThemeController {
    mode: ThemeMode,
    store: Box<dyn PreferenceStore>,
}

impl ThemeController {
    /// Read the stored preference; light when absent or unreadable
    pub fn init(store: Box<dyn PreferenceStore>) -> Self {
        let mode = store
            .get(THEME_KEY)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();
        tracing::debug!("theme: {}", mode);
        Self { mode, store }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    /// Flip light/dark and persist the choice
    pub fn toggle(&mut self) -> ThemeMode {
        self.set(self.mode.toggled());
        self.mode
    }

    pub fn set(&mut self, mode: ThemeMode) {
        self.mode = mode;
        if let Err(e) = self.store.set(THEME_KEY, mode.as_str()) {
            tracing::warn!("could not persist theme: {}", e);
        }
    }
}

impl fmt::Debug for ThemeController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeController")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Fullscreen
// =============================================================================

/// Environment that can enter and leave fullscreen
///
/// Requests may complete asynchronously; the host reports its actual state
/// through `is_fullscreen` and signals changes out of band.
pub trait FullscreenHost: Send {
    fn is_supported(&self) -> bool;
    fn is_fullscreen(&self) -> bool;
    fn request_enter(&mut self) -> Result<(), String>;
    fn request_exit(&mut self) -> Result<(), String>;
}

/// Mirror of the host's fullscreen status
pub struct FullscreenController {
    host: Box<dyn FullscreenHost>,
    active: bool,
}

impl FullscreenController {
    pub fn init(host: Box<dyn FullscreenHost>) -> Self {
        let active = host.is_fullscreen();
        Self { host, active }
    }

    pub fn is_supported(&self) -> bool {
        self.host.is_supported()
    }

    /// Last state reported by the host
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Ask the host to enter or leave fullscreen. Failures are logged only.
    pub fn request(&mut self, enter: bool) {
        if !self.host.is_supported() {
            return;
        }

        let result = if enter {
            self.host.request_enter()
        } else {
            self.host.request_exit()
        };
        if let Err(e) = result {
            tracing::warn!("fullscreen request failed: {}", e);
        }
    }

    pub fn toggle(&mut self) {
        self.request(!self.active);
    }

    /// Host change notification: re-read the actual state
    pub fn on_change(&mut self) {
        self.active = self.host.is_fullscreen();
    }

    /// Leave fullscreen on shutdown
    pub fn teardown(&mut self) {
        if self.active {
            self.request(false);
            self.on_change();
        }
    }
}

impl fmt::Debug for FullscreenController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FullscreenController")
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

/// Terminal "fullscreen": focus mode with header and footer hidden
///
/// The notify callback fires after every state change so the event loop can
/// forward it to the controller.
pub struct FocusModeHost {
    active: bool,
    notify: Box<dyn Fn(bool) + Send>,
}

impl FocusModeHost {
    pub fn new(notify: impl Fn(bool) + Send + 'static) -> Self {
        Self {
            active: false,
            notify: Box::new(notify),
        }
    }

    fn set(&mut self, active: bool) {
        if self.active != active {
            self.active = active;
            (self.notify)(active);
        }
    }
}

impl FullscreenHost for FocusModeHost {
    fn is_supported(&self) -> bool {
        true
    }

    fn is_fullscreen(&self) -> bool {
        self.active
    }

    fn request_enter(&mut self) -> Result<(), String> {
        self.set(true);
        Ok(())
    }

    fn request_exit(&mut self) -> Result<(), String> {
        self.set(false);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_theme_defaults_to_light() {
        let theme = ThemeController::init(Box::new(MemoryPrefs::default()));
        assert_eq!(theme.mode(), ThemeMode::Light);
    }

    #[test]
    fn test_theme_ignores_garbage_value() {
        let mut prefs = MemoryPrefs::default();
        prefs.set(THEME_KEY, "purple").unwrap();
        let theme = ThemeController::init(Box::new(prefs));
        assert_eq!(theme.mode(), ThemeMode::Light);
    }

    #[test]
    fn test_theme_toggle() {
        let mut theme = ThemeController::init(Box::new(MemoryPrefs::default()));
        assert_eq!(theme.toggle(), ThemeMode::Dark);
        assert_eq!(theme.toggle(), ThemeMode::Light);
    }

    #[test]
    fn test_theme_mode_parse() {
        assert_eq!("Dark".parse::<ThemeMode>(), Ok(ThemeMode::Dark));
        assert_eq!(" light ".parse::<ThemeMode>(), Ok(ThemeMode::Light));
        assert!("sepia".parse::<ThemeMode>().is_err());
    }

    struct Refusing;

    impl FullscreenHost for Refusing {
        fn is_supported(&self) -> bool {
            true
        }
        fn is_fullscreen(&self) -> bool {
            false
        }
        fn request_enter(&mut self) -> Result<(), String> {
            Err("denied".into())
        }
        fn request_exit(&mut self) -> Result<(), String> {
            Ok(())
        }
    }

    #[test]
    fn test_fullscreen_failure_is_not_assumed_success() {
        let mut fs = FullscreenController::init(Box::new(Refusing));
        fs.toggle();
        fs.on_change();
        assert!(!fs.is_active());
    }

    #[test]
    fn test_focus_mode_notifies_on_change() {
        let changes = Arc::new(AtomicUsize::new(0));
        let counter = changes.clone();
        let host = FocusModeHost::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let mut fs = FullscreenController::init(Box::new(host));

        fs.request(true);
        // State only follows the notification
        assert!(!fs.is_active());
        fs.on_change();
        assert!(fs.is_active());

        // Entering again is not a change
        fs.request(true);
        assert_eq!(changes.load(Ordering::SeqCst), 1);

        fs.teardown();
        assert!(!fs.is_active());
        assert_eq!(changes.load(Ordering::SeqCst), 2);
    }
}
