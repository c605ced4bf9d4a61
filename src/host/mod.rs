//! Host boundary: what an editor host supplies to the engine and what the
//! engine exposes back to the host's command layer.
//!
//! The host owns documents, rendering surfaces, and the event sources (text
//! changes, editor switches); the crate owns matching, styling, and timing.
//! [`Highlighter`] is the single object a host threads through its command
//! handlers; there is no module-level singleton.

use crate::models::{CharRange, DocumentSnapshot};
use crate::services::style::StyleDescriptor;
use rand::Rng;
use std::sync::Arc;

pub mod controller;

pub use controller::{Highlighter, DEBOUNCE_DELAY};

/// Address of one decoration slot on a surface.
///
/// Palette slots hold the steady-state keyword highlights, one per palette
/// color; the blink slot is the transient dim overlay reverted shortly after
/// it is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleSlot {
    Palette(usize),
    Blink,
}

/// One rendering surface (an editor view) owned by the host.
///
/// Applying decorations to a slot replaces that slot's previous ranges; an
/// empty range set clears it. Surfaces the host has torn down report
/// `is_live() == false` and are skipped without error.
#[cfg_attr(test, mockall::automock)]
pub trait EditorSurface: Send + Sync {
    /// Snapshot of the document this surface is displaying.
    fn document(&self) -> DocumentSnapshot;

    /// Replace `slot`'s decorated ranges with `ranges`, rendered as `style`.
    fn apply_decorations(&self, slot: StyleSlot, style: &StyleDescriptor, ranges: &[CharRange]);

    /// Remove every decoration in `slot`.
    fn clear_decorations(&self, slot: StyleSlot);

    /// False once the host has disposed the surface.
    fn is_live(&self) -> bool;
}

/// The host's view of the workspace: which editors are currently visible.
///
/// Queried fresh on every refresh pass, so the host never has to push
/// visibility diffs into the engine.
pub trait WorkspaceHost: Send + Sync {
    fn visible_editors(&self) -> Vec<Arc<dyn EditorSurface>>;
}

/// Uniform draws in `[0, 1)`, used for blink selection.
///
/// A seam rather than a direct generator call so tests can make blink
/// behavior deterministic.
pub trait RandomSource: Send + Sync {
    fn next_unit(&self) -> f64;
}

/// Default random source backed by the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn next_unit(&self) -> f64 {
        rand::rng().random::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_rng_source_in_unit_interval() {
        let source = ThreadRngSource;
        for _ in 0..100 {
            let draw = source.next_unit();
            assert!((0.0..1.0).contains(&draw));
        }
    }

    #[test]
    fn test_style_slot_equality() {
        assert_eq!(StyleSlot::Palette(3), StyleSlot::Palette(3));
        assert_ne!(StyleSlot::Palette(3), StyleSlot::Palette(4));
        assert_ne!(StyleSlot::Palette(0), StyleSlot::Blink);
    }
}
