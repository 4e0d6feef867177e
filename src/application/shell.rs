use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool { self == Theme::Dark }
}

#[derive(Debug, Default)]
struct ShellState {
    theme: Theme,
    count: i64,
}

/// Layout-wide state (theme flag, home counter), created once by the
/// application root and handed to whatever needs it.
#[derive(Debug, Clone, Default)]
pub struct ShellContext {
    inner: Arc<Mutex<ShellState>>,
}

impl ShellContext {
    pub fn new(theme: Theme) -> Self {
        Self { inner: Arc::new(Mutex::new(ShellState { theme, count: 0 })) }
    }

    fn with<T>(&self, f: impl FnOnce(&mut ShellState) -> T) -> T {
        let mut guard = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    pub fn theme(&self) -> Theme { self.with(|s| s.theme) }

    /// Flips the theme and returns the new one.
    pub fn toggle_theme(&self) -> Theme {
        self.with(|s| {
            s.theme = s.theme.toggled();
            s.theme
        })
    }

    pub fn count(&self) -> i64 { self.with(|s| s.count) }

    pub fn increment(&self) -> i64 {
        self.with(|s| {
            s.count += 1;
            s.count
        })
    }

    pub fn decrement(&self) -> i64 {
        self.with(|s| {
            s.count -= 1;
            s.count
        })
    }
}
