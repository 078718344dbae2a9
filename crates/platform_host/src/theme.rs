//! Process-wide visual theme contract.

use serde::{Deserialize, Serialize};

use crate::{HostCall, HostCallLog};

/// Palette applied to the application document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePalette {
    /// Dark palette.
    #[default]
    Dark,
    /// Light palette.
    Light,
    /// Follow the operating-system preference.
    System,
}

/// Host service that switches the document palette.
///
/// Applying a palette is synchronous and has no failure path.
pub trait ThemeService {
    /// Applies `palette` to the whole application.
    fn apply_palette(&self, palette: ThemePalette);
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op theme service for headless targets.
pub struct NoopThemeService;

impl ThemeService for NoopThemeService {
    fn apply_palette(&self, _palette: ThemePalette) {}
}

#[derive(Debug, Clone, Default)]
/// In-memory theme service that records applied palettes.
pub struct MemoryThemeService {
    log: HostCallLog,
}

impl MemoryThemeService {
    /// Creates a theme service recording into `log`.
    pub fn new(log: HostCallLog) -> Self {
        Self { log }
    }
}

impl ThemeService for MemoryThemeService {
    fn apply_palette(&self, palette: ThemePalette) {
        self.log.note(HostCall::ApplyPalette(palette));
    }
}
