//! Style resolution: configuration + palette position + wall clock → the
//! visual attributes of one decoration slot.
//!
//! Exactly one [`StyleDescriptor`] exists per palette entry at any time,
//! rebuilt from the configuration on every refresh pass. The animation phase
//! never enters here: it rotates which slot a keyword lands in (see
//! [`crate::services::refresh`]), while the fade/pulse oscillations are
//! continuous functions of wall-clock time so they stay smooth between ticks.

use crate::models::HighlightConfig;

/// Blur radii for the three glow layers.
const GLOW_BLUR_LEVELS: [f64; 3] = [8.0, 12.0, 16.0];

/// Two-hex-digit alpha suffix for the glow background tint (~8%).
const GLOW_TINT_ALPHA: &str = "14";

/// Fixed opacity of the transient blink style.
const BLINK_OPACITY: f64 = 0.25;

/// One layer of a glow shadow.
#[derive(Debug, Clone, PartialEq)]
pub struct Shadow {
    pub color: String,
    pub blur: f64,
}

/// Underline rendering for a decorated range.
#[derive(Debug, Clone, PartialEq)]
pub enum Underline {
    Wavy { color: String },
}

/// Visual attributes of one decoration slot, interpreted by the host's
/// rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDescriptor {
    /// Text color; `None` leaves the surface's own color in place (blink).
    pub foreground: Option<String>,
    pub bold: bool,
    pub opacity: f64,
    /// Letter-spacing offset in pixels. The pulse oscillation is rendered as
    /// a tracking change because inline text has no geometric scale.
    pub letter_spacing: f64,
    /// Glow layers, innermost first.
    pub shadows: Vec<Shadow>,
    /// Background tint, already carrying its alpha suffix.
    pub background: Option<String>,
    pub underline: Option<Underline>,
}

/// Resolve the style for one palette entry.
///
/// `color_position` is the entry's index in the palette; it offsets the
/// fade/pulse oscillations so neighboring colors animate out of step.
/// `clock_ms` is wall-clock milliseconds since the engine started.
pub fn resolve(
    color: &str,
    color_position: usize,
    config: &HighlightConfig,
    clock_ms: f64,
) -> StyleDescriptor {
    let interval = config.animation_interval_ms.max(1) as f64;
    let position = color_position as f64;

    let opacity = if config.fade {
        0.7 + 0.3 * (clock_ms / interval + position).sin()
    } else {
        1.0
    };

    let letter_spacing = if config.pulse {
        let scale = 1.0 + 0.1 * (clock_ms / (interval * 0.5) + position).sin();
        (scale - 1.0) * 10.0
    } else {
        0.0
    };

    let (shadows, background) = if config.glow {
        let shadows = GLOW_BLUR_LEVELS
            .iter()
            .map(|&blur| Shadow {
                color: color.to_string(),
                blur,
            })
            .collect();
        (shadows, Some(with_alpha(color, GLOW_TINT_ALPHA)))
    } else {
        (Vec::new(), None)
    };

    let underline = config.wavy_underline.then(|| Underline::Wavy {
        color: color.to_string(),
    });

    StyleDescriptor {
        foreground: Some(color.to_string()),
        bold: true,
        opacity,
        letter_spacing,
        shadows,
        background,
        underline,
    }
}

/// Build one descriptor per palette entry.
pub fn build_style_set(config: &HighlightConfig, clock_ms: f64) -> Vec<StyleDescriptor> {
    config
        .colors
        .iter()
        .enumerate()
        .map(|(position, color)| resolve(color, position, config, clock_ms))
        .collect()
}

/// The fixed low-opacity style applied to the blinking subset of ranges.
///
/// A dim overlay only: no foreground, glow, or underline of its own, so the
/// palette styles underneath keep their colors while blinking.
pub fn blink_style() -> StyleDescriptor {
    StyleDescriptor {
        foreground: None,
        bold: false,
        opacity: BLINK_OPACITY,
        letter_spacing: 0.0,
        shadows: Vec::new(),
        background: None,
        underline: None,
    }
}

/// Expand `#rgb` to `#rrggbb` and append a two-hex-digit alpha suffix.
fn with_alpha(color: &str, alpha: &str) -> String {
    let hex = color.trim_start_matches('#');
    if hex.len() == 3 {
        let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
        format!("#{expanded}{alpha}")
    } else {
        format!("#{hex}{alpha}")
    }
}
