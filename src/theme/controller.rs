//! Persisted light/dark mode

use serde::{Deserialize, Serialize};

use super::Theme;
use crate::storage::KeyValueStore;

/// Storage key of the dark-mode flag ("true" / "false")
pub const DARK_MODE_KEY: &str = "darkMode";

/// Binary UI mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
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

    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }

    /// Value persisted under [`DARK_MODE_KEY`]
    fn stored_value(self) -> &'static str {
        if self.is_dark() { "true" } else { "false" }
    }
}

/// Owns the current mode and its persisted copy
#[derive(Debug, Clone)]
pub struct ThemeController {
    mode: ThemeMode,
    palette: Theme,
}

impl ThemeController {
    /// Restore the persisted mode. Anything other than "true" means light.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let mode = match store.get(DARK_MODE_KEY).as_deref() {
            Some("true") => ThemeMode::Dark,
            _ => ThemeMode::Light,
        };
        tracing::debug!("Restored theme mode {:?}", mode);
        Self::with_mode(mode)
    }

    pub fn with_mode(mode: ThemeMode) -> Self {
        Self { mode, palette: Theme::for_mode(mode) }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    /// Palette applied for the current mode
    pub fn palette(&self) -> &Theme {
        &self.palette
    }

    /// Icon of the toggle control: it shows the mode a press switches to
    pub fn icon(&self) -> &'static str {
        match self.mode {
            ThemeMode::Dark => "☀",
            ThemeMode::Light => "☾",
        }
    }

    /// Label of the toggle control
    pub fn label(&self) -> &'static str {
        match self.mode {
            ThemeMode::Dark => "Light Mode",
            ThemeMode::Light => "Dark Mode",
        }
    }

    /// Flip the mode, apply its palette and write it through
    pub fn toggle(&mut self, store: &mut dyn KeyValueStore) -> ThemeMode {
        self.mode = self.mode.toggled();
        self.palette = Theme::for_mode(self.mode);

        if let Err(e) = store.set(DARK_MODE_KEY, self.mode.stored_value()) {
            tracing::warn!("Failed to persist theme mode: {}", e);
        }

        tracing::info!("Switched to {:?} mode", self.mode);
        self.mode
    }
}

impl Default for ThemeController {
    fn default() -> Self {
        Self::with_mode(ThemeMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn missing_key_defaults_to_light() {
        let controller = ThemeController::load(&MemoryStore::new());
        assert_eq!(controller.mode(), ThemeMode::Light);
        assert_eq!(controller.icon(), "☾");
        assert_eq!(controller.label(), "Dark Mode");
    }

    #[test]
    fn unknown_value_defaults_to_light() {
        let mut store = MemoryStore::new();
        store.set(DARK_MODE_KEY, "yes please").unwrap();
        assert_eq!(ThemeController::load(&store).mode(), ThemeMode::Light);
    }

    #[test]
    fn persisted_dark_is_restored() {
        let mut store = MemoryStore::new();
        store.set(DARK_MODE_KEY, "true").unwrap();

        let controller = ThemeController::load(&store);
        assert_eq!(controller.mode(), ThemeMode::Dark);
        assert_eq!(controller.palette().name, "Tokyo Night");
        assert_eq!(controller.icon(), "☀");
        assert_eq!(controller.label(), "Light Mode");
    }

    #[test]
    fn toggle_writes_through() {
        let mut store = MemoryStore::new();
        let mut controller = ThemeController::load(&store);

        assert_eq!(controller.toggle(&mut store), ThemeMode::Dark);
        assert_eq!(store.get(DARK_MODE_KEY).as_deref(), Some("true"));
        assert_eq!(controller.palette().name, "Tokyo Night");
    }

    #[test]
    fn toggling_twice_round_trips() {
        let mut store = MemoryStore::new();
        store.set(DARK_MODE_KEY, "false").unwrap();
        let mut controller = ThemeController::load(&store);

        controller.toggle(&mut store);
        controller.toggle(&mut store);

        assert_eq!(controller.mode(), ThemeMode::Light);
        assert_eq!(controller.palette().name, "Tokyo Day");
        assert_eq!(store.get(DARK_MODE_KEY).as_deref(), Some("false"));
    }
}
