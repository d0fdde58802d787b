//! User-facing tracking settings.

use crate::constants::{DEFAULT_SCROLL_SPEED, DEFAULT_SENSITIVITY, SETTING_MAX, SETTING_MIN};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{cell::Cell, rc::Rc};

/// Sensitivity and scroll speed, both on a 1 to 10 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Deadband size; the normalized threshold is `sensitivity / 200`
    pub sensitivity: u32,
    /// Multiplier applied to the scroll distance
    pub scroll_speed: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
            scroll_speed: DEFAULT_SCROLL_SPEED,
        }
    }
}

impl Settings {
    /// Create settings, clamping both values into range
    #[must_use]
    pub fn new(sensitivity: u32, scroll_speed: u32) -> Self {
        Self {
            sensitivity,
            scroll_speed,
        }
        .sanitized()
    }

    /// Copy with both values clamped to the valid range
    #[must_use]
    pub fn sanitized(self) -> Self {
        let clamped = Self {
            sensitivity: self.sensitivity.clamp(SETTING_MIN, SETTING_MAX),
            scroll_speed: self.scroll_speed.clamp(SETTING_MIN, SETTING_MAX),
        };
        if clamped != self {
            debug!(
                "Clamped settings from {}/{} to {}/{}",
                self.sensitivity, self.scroll_speed, clamped.sensitivity, clamped.scroll_speed
            );
        }
        clamped
    }

    /// Whether both values are already in range
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (SETTING_MIN..=SETTING_MAX).contains(&self.sensitivity)
            && (SETTING_MIN..=SETTING_MAX).contains(&self.scroll_speed)
    }

    /// Apply a partial update; missing or zero fields keep the current value
    #[must_use]
    pub fn merged(self, update: SettingsUpdate) -> Self {
        Self {
            sensitivity: update.sensitivity.filter(|v| *v != 0).unwrap_or(self.sensitivity),
            scroll_speed: update.scroll_speed.filter(|v| *v != 0).unwrap_or(self.scroll_speed),
        }
    }
}

/// Partial settings change pushed by a UI surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    /// New sensitivity, if changed
    pub sensitivity: Option<u32>,
    /// New scroll speed, if changed
    pub scroll_speed: Option<u32>,
}

/// Source of the settings in effect for the current tick
pub trait SettingsProvider {
    /// Current settings, possibly out of range
    fn current(&self) -> Settings;
}

impl SettingsProvider for Settings {
    fn current(&self) -> Settings {
        *self
    }
}

/// Settings handle that a UI can change between ticks
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Rc<Cell<Settings>>,
}

impl SharedSettings {
    /// Create a handle holding `settings`
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Rc::new(Cell::new(settings)),
        }
    }

    /// Apply a partial update
    pub fn update(&self, update: SettingsUpdate) {
        self.inner.set(self.inner.get().merged(update));
    }
}

impl SettingsProvider for SharedSettings {
    fn current(&self) -> Settings {
        self.inner.get()
    }
}
