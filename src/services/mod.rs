//! Services module - the highlight pipeline, framework-agnostic.
//!
//! This module contains the logic between a document snapshot and the
//! decorations painted onto a surface. Nothing here knows about timers or the
//! host's event loop; that wiring lives in [`crate::host`].
//!
//! # Components
//!
//! - [`MatchFinder`]: whole-word keyword matching with a compiled-pattern
//!   cache. Pure regex over raw text, no lexing.
//! - [`style`]: resolves configuration + palette position + wall clock into
//!   [`StyleDescriptor`]s, one per palette entry.
//! - [`RefreshEngine`]: plans a refresh (clears, rotating slot assignment,
//!   optional blink pulse) and applies it to a surface. Planning is pure;
//!   applying is the only decoration mutation in the crate.
//!
//! # Design Philosophy
//!
//! - **Stateless where possible**: the only caches are compiled regexes and
//!   the engine's clock epoch
//! - **Testable**: planning takes explicit inputs, randomness comes through
//!   the [`RandomSource`](crate::host::RandomSource) seam
//! - **Non-fatal**: oversized documents and dead surfaces degrade to a
//!   skipped refresh, never an error

pub mod matcher;
pub mod refresh;
pub mod style;

pub use matcher::MatchFinder;
pub use refresh::{Application, RefreshEngine, RefreshOutcome, RefreshPlan, BLINK_DURATION};
pub use style::{blink_style, build_style_set, resolve, Shadow, StyleDescriptor, Underline};
