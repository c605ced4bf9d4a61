use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use super::keywords::DEFAULT_KEYWORDS;

/// Baseline color palette, cycled by the animation phase.
pub const DEFAULT_PALETTE: [&str; 9] = [
    "#ff5555", "#ffb86c", "#f1fa8c", "#50fa7b", "#8be9fd", "#bd93f9", "#ff79c6", "#69ff94",
    "#d6acff",
];

/// Baseline animation interval in milliseconds.
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

/// Validation errors raised when a configuration update is rejected.
///
/// The refresh pipeline assumes a validated configuration (non-empty palette,
/// positive interval), so every patch is checked at update time instead of
/// letting a bad value surface later as a modulo-by-zero or a dead timer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("color palette must not be empty")]
    EmptyPalette,

    #[error("invalid palette color {0:?}, expected #rgb or #rrggbb")]
    InvalidColor(String),

    #[error("animation interval must be positive")]
    ZeroInterval,

    #[error("keywords must not be empty strings")]
    EmptyKeyword,
}

/// Active highlighter configuration.
///
/// Created once from defaults and replaced wholesale on every update via
/// [`merged`](Self::merged); never partially mutated in place. Colors are hex
/// strings interpreted by the rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Keywords highlighted when `language_specific` is off.
    pub keywords: Vec<String>,

    /// Color palette; one style slot exists per entry.
    pub colors: Vec<String>,

    /// Period of the animation timer driving the phase rotation.
    pub animation_interval_ms: u64,

    /// Layered shadow glow plus a faint background tint.
    pub glow: bool,

    /// Wavy underline beneath each match.
    pub wavy_underline: bool,

    /// Random transient dimming of a subset of matches.
    pub blink: bool,

    /// Use the per-language keyword table instead of `keywords`.
    pub language_specific: bool,

    /// Continuous opacity oscillation.
    pub fade: bool,

    /// Continuous letter-spacing oscillation.
    pub pulse: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            colors: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            animation_interval_ms: DEFAULT_INTERVAL_MS,
            glow: true,
            wavy_underline: true,
            blink: false,
            language_specific: true,
            fade: true,
            pulse: false,
        }
    }
}

impl HighlightConfig {
    /// The animation timer period as a [`Duration`].
    pub fn animation_interval(&self) -> Duration {
        Duration::from_millis(self.animation_interval_ms)
    }

    /// Shallow merge: fields present in `patch` replace the current values,
    /// absent fields are retained.
    pub fn merged(&self, patch: &ConfigPatch) -> HighlightConfig {
        HighlightConfig {
            keywords: patch.keywords.clone().unwrap_or_else(|| self.keywords.clone()),
            colors: patch.colors.clone().unwrap_or_else(|| self.colors.clone()),
            animation_interval_ms: patch
                .animation_interval_ms
                .unwrap_or(self.animation_interval_ms),
            glow: patch.glow.unwrap_or(self.glow),
            wavy_underline: patch.wavy_underline.unwrap_or(self.wavy_underline),
            blink: patch.blink.unwrap_or(self.blink),
            language_specific: patch.language_specific.unwrap_or(self.language_specific),
            fade: patch.fade.unwrap_or(self.fade),
            pulse: patch.pulse.unwrap_or(self.pulse),
        }
    }

    /// Check the invariants the refresh pipeline relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.colors.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if let Some(bad) = self.colors.iter().find(|c| !is_hex_color(c)) {
            return Err(ConfigError::InvalidColor(bad.clone()));
        }
        if self.animation_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::EmptyKeyword);
        }
        Ok(())
    }
}

/// Partial configuration supplied by the host's command layer.
///
/// All fields optional; merging with the active configuration retains anything
/// left unset. Serde-deserializable so hosts can hand patches over as data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigPatch {
    pub keywords: Option<Vec<String>>,
    pub colors: Option<Vec<String>>,
    pub animation_interval_ms: Option<u64>,
    pub glow: Option<bool>,
    pub wavy_underline: Option<bool>,
    pub blink: Option<bool>,
    pub language_specific: Option<bool>,
    pub fade: Option<bool>,
    pub pulse: Option<bool>,
}

fn is_hex_color(color: &str) -> bool {
    let Some(hex) = color.strip_prefix('#') else {
        return false;
    };
    (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}
