//! Integration tests for the refresh engine against a recording surface.
//!
//! These exercise the end-to-end refresh contract: clear-then-apply, the
//! oversized-document guard, whole-word matching, slot rotation, and blink
//! behavior under deterministic random draws.

mod common;

use common::{FixedRandom, RecordingSurface, SurfaceCall};
use keyglow::metrics::Metrics;
use keyglow::models::CharRange;
use keyglow::services::{RefreshEngine, RefreshOutcome};
use keyglow::{DocumentSnapshot, HighlightConfig, RandomSource, StyleSlot};
use std::sync::Arc;

fn engine(rng: impl RandomSource + 'static) -> RefreshEngine {
    RefreshEngine::new(Arc::new(rng), Arc::new(Metrics::new()))
}

fn two_color_config() -> HighlightConfig {
    HighlightConfig {
        keywords: vec!["function".to_string(), "const".to_string()],
        colors: vec!["#111".to_string(), "#222".to_string()],
        language_specific: false,
        fade: false,
        pulse: false,
        ..HighlightConfig::default()
    }
}

fn apply_assignments(calls: &[SurfaceCall]) -> Vec<(StyleSlot, Vec<CharRange>)> {
    calls
        .iter()
        .filter_map(|call| match call {
            SurfaceCall::Apply { slot, ranges, .. } => Some((*slot, ranges.clone())),
            SurfaceCall::Clear { .. } => None,
        })
        .collect()
}

#[test]
fn test_matching_keyword_produces_nonempty_application() {
    let engine = engine(FixedRandom(0.99));
    let surface = RecordingSurface::new(DocumentSnapshot::new(
        "mem://a",
        "plaintext",
        "const value = 1;",
    ));

    let outcome = engine.refresh(surface.as_ref(), &two_color_config(), 0);

    assert_eq!(
        outcome,
        RefreshOutcome::Applied {
            applications: 1,
            blink_applied: false
        }
    );
    let applies = surface.applies();
    assert_eq!(applies.len(), 1);
    assert!(matches!(
        &applies[0],
        SurfaceCall::Apply { ranges, .. } if !ranges.is_empty()
    ));
}

#[test]
fn test_oversized_document_is_left_untouched() {
    let engine = engine(FixedRandom(0.99));
    let surface = RecordingSurface::new(DocumentSnapshot::new(
        "mem://big",
        "plaintext",
        "const ".repeat(20_000),
    ));

    let outcome = engine.refresh(surface.as_ref(), &two_color_config(), 0);

    assert_eq!(outcome, RefreshOutcome::SkippedOversize);
    assert!(surface.calls().is_empty());
}

#[test]
fn test_no_substring_highlight() {
    let engine = engine(FixedRandom(0.99));
    let config = HighlightConfig {
        keywords: vec!["class".to_string()],
        ..two_color_config()
    };
    let surface =
        RecordingSurface::new(DocumentSnapshot::new("mem://sub", "plaintext", "classify"));

    let outcome = engine.refresh(surface.as_ref(), &config, 0);

    assert_eq!(
        outcome,
        RefreshOutcome::Applied {
            applications: 0,
            blink_applied: false
        }
    );
    assert!(surface.applies().is_empty());
    // The full clear pass still ran.
    assert_eq!(RecordingSurface::refresh_count(&surface.calls()), 1);
}

#[test]
fn test_refresh_is_idempotent_for_fixed_phase() {
    let engine = engine(FixedRandom(0.99));
    let config = two_color_config();
    let surface = RecordingSurface::new(DocumentSnapshot::new(
        "mem://idem",
        "plaintext",
        "function foo() { const x = 1; }",
    ));

    engine.refresh(surface.as_ref(), &config, 3);
    let first = apply_assignments(&surface.take_calls());

    engine.refresh(surface.as_ref(), &config, 3);
    let second = apply_assignments(&surface.take_calls());

    assert_eq!(first, second);
}

#[test]
fn test_two_keyword_rotation_scenario() {
    let engine = engine(FixedRandom(0.99));
    let surface = RecordingSurface::new(DocumentSnapshot::new(
        "mem://scenario",
        "plaintext",
        "function foo() { const x = 1; }",
    ));

    engine.refresh(surface.as_ref(), &two_color_config(), 0);

    let assignments = apply_assignments(&surface.calls());
    assert_eq!(
        assignments,
        vec![
            (StyleSlot::Palette(0), vec![CharRange::new(0, 8)]),
            (StyleSlot::Palette(1), vec![CharRange::new(17, 22)]),
        ]
    );
}

#[test]
fn test_language_specific_mode_uses_rust_table() {
    let engine = engine(FixedRandom(0.99));
    let config = HighlightConfig {
        language_specific: true,
        ..two_color_config()
    };
    let surface = RecordingSurface::new(DocumentSnapshot::new("mem://rs", "rust", "fn main() {}"));

    engine.refresh(surface.as_ref(), &config, 0);

    let assignments = apply_assignments(&surface.calls());
    assert_eq!(
        assignments,
        vec![(StyleSlot::Palette(0), vec![CharRange::new(0, 2)])]
    );
}

#[test]
fn test_blink_disabled_means_no_blink_applications() {
    // A random source that would always fire the pulse.
    let engine = engine(FixedRandom(0.0));
    let config = two_color_config();
    let surface = RecordingSurface::new(DocumentSnapshot::new(
        "mem://noblink",
        "plaintext",
        "const a; const b; function c;",
    ));

    for phase in 0..10 {
        engine.refresh(surface.as_ref(), &config, phase);
    }

    assert!(!surface
        .calls()
        .iter()
        .any(|call| matches!(call, SurfaceCall::Apply { slot: StyleSlot::Blink, .. })));
}

#[test]
fn test_blink_enabled_applies_dim_overlay() {
    let engine = engine(FixedRandom(0.0));
    let config = HighlightConfig {
        blink: true,
        ..two_color_config()
    };
    let surface = RecordingSurface::new(DocumentSnapshot::new(
        "mem://blink",
        "plaintext",
        "const a; function b;",
    ));

    let outcome = engine.refresh(surface.as_ref(), &config, 0);

    assert_eq!(
        outcome,
        RefreshOutcome::Applied {
            applications: 2,
            blink_applied: true
        }
    );
    let blink = surface
        .calls()
        .into_iter()
        .find_map(|call| match call {
            SurfaceCall::Apply {
                slot: StyleSlot::Blink,
                style,
                ranges,
            } => Some((style, ranges)),
            _ => None,
        })
        .expect("blink application recorded");
    // Draws of 0.0 keep every matched range in the subset.
    assert_eq!(blink.1.len(), 2);
    assert!(blink.0.foreground.is_none());
    assert!(blink.0.opacity < 0.5);
}

#[test]
fn test_dead_surface_is_skipped() {
    let engine = engine(FixedRandom(0.99));
    let surface = RecordingSurface::new(DocumentSnapshot::new("mem://dead", "plaintext", "const"));
    surface.set_live(false);

    let outcome = engine.refresh(surface.as_ref(), &two_color_config(), 0);

    assert_eq!(outcome, RefreshOutcome::SkippedDisposed);
    assert!(surface.calls().is_empty());
}

#[test]
fn test_clears_precede_applications() {
    let engine = engine(FixedRandom(0.99));
    let surface = RecordingSurface::new(DocumentSnapshot::new(
        "mem://order",
        "plaintext",
        "const a",
    ));

    engine.refresh(surface.as_ref(), &two_color_config(), 0);

    let calls = surface.calls();
    let first_apply = calls
        .iter()
        .position(|c| matches!(c, SurfaceCall::Apply { .. }))
        .expect("one application");
    assert!(calls[..first_apply]
        .iter()
        .all(|c| matches!(c, SurfaceCall::Clear { .. })));
    assert_eq!(first_apply, 2); // both palette slots cleared first
}
