use crate::host::{EditorSurface, RandomSource, StyleSlot};
use crate::metrics::Metrics;
use crate::models::{keywords, CharRange, DocumentSnapshot, HighlightConfig};
use crate::services::matcher::MatchFinder;
use crate::services::style::{self, StyleDescriptor};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Probability that a refresh triggers a blink pulse at all.
const BLINK_REFRESH_PROBABILITY: f64 = 0.3;

/// Probability that an individual range is kept in the blinking subset.
const BLINK_RANGE_PROBABILITY: f64 = 0.2;

/// How long the blink style stays applied before the caller reverts it.
pub const BLINK_DURATION: Duration = Duration::from_millis(200);

/// One decoration application: a slot, its resolved style, and the ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    pub slot: StyleSlot,
    pub style: StyleDescriptor,
    pub ranges: Vec<CharRange>,
}

/// Everything one refresh wants to do to a surface.
///
/// Clears come first (full clear + reapply, no incremental diffing, so stale
/// highlights cannot survive a keyword or configuration change), then the
/// steady-state applications, then an optional transient blink pulse the
/// caller reverts after [`BLINK_DURATION`].
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshPlan {
    pub clears: Vec<StyleSlot>,
    pub applications: Vec<Application>,
    pub blink: Option<Application>,
}

/// What a refresh did, for callers that schedule follow-up work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Decorations were applied; `blink_applied` asks the caller to revert
    /// the blink slot after [`BLINK_DURATION`].
    Applied {
        applications: usize,
        blink_applied: bool,
    },
    /// Document over the size limit; decorations left untouched.
    SkippedOversize,
    /// Surface already torn down by the host.
    SkippedDisposed,
}

/// Orchestrates one refresh: match, assign rotating style slots, apply.
///
/// Planning ([`plan_at`](Self::plan_at)) is a pure function of the document,
/// configuration, phase, and clock; [`refresh`](Self::refresh) is the only
/// entry point that mutates decoration slots on a surface.
pub struct RefreshEngine {
    finder: Mutex<MatchFinder>,
    rng: Arc<dyn RandomSource>,
    metrics: Arc<Metrics>,
    epoch: Instant,
}

impl RefreshEngine {
    pub fn new(rng: Arc<dyn RandomSource>, metrics: Arc<Metrics>) -> Self {
        Self {
            finder: Mutex::new(MatchFinder::new()),
            rng,
            metrics,
            epoch: Instant::now(),
        }
    }

    /// Wall-clock milliseconds since the engine started, driving the
    /// fade/pulse oscillations.
    fn clock_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    /// Plan a refresh at the current wall clock.
    pub fn plan(
        &self,
        document: &DocumentSnapshot,
        config: &HighlightConfig,
        phase: usize,
    ) -> RefreshPlan {
        self.plan_at(document, config, phase, self.clock_ms())
    }

    /// Plan a refresh with an explicit clock, deterministic apart from the
    /// blink draws.
    ///
    /// The active keyword list is the language table entry when
    /// `language_specific` is set, the configured list otherwise. Matched
    /// keywords are walked in scan order and keyword number `i` lands in slot
    /// `(phase + i) mod palette length`. When more keywords match than the
    /// palette has entries, two keywords share a slot and the later
    /// application replaces the earlier ranges.
    pub fn plan_at(
        &self,
        document: &DocumentSnapshot,
        config: &HighlightConfig,
        phase: usize,
        clock_ms: f64,
    ) -> RefreshPlan {
        let palette_len = config.colors.len();
        let clears = (0..palette_len).map(StyleSlot::Palette).collect();

        let active: Vec<&str> = if config.language_specific {
            keywords::lookup(&document.language_id).to_vec()
        } else {
            config.keywords.iter().map(String::as_str).collect()
        };

        let matches = self
            .finder
            .lock()
            .unwrap()
            .find_ranges(&document.text, &active);

        let styles = style::build_style_set(config, clock_ms);
        let mut applications = Vec::with_capacity(matches.len());
        for (position, (_keyword, ranges)) in matches.iter().enumerate() {
            let slot_index = (phase + position) % palette_len;
            applications.push(Application {
                slot: StyleSlot::Palette(slot_index),
                style: styles[slot_index].clone(),
                ranges: ranges.clone(),
            });
        }

        let blink = self.plan_blink(config, &applications);

        RefreshPlan {
            clears,
            applications,
            blink,
        }
    }

    fn plan_blink(
        &self,
        config: &HighlightConfig,
        applications: &[Application],
    ) -> Option<Application> {
        if !config.blink {
            return None;
        }
        if self.rng.next_unit() >= BLINK_REFRESH_PROBABILITY {
            return None;
        }

        let kept: Vec<CharRange> = applications
            .iter()
            .flat_map(|app| app.ranges.iter().copied())
            .filter(|_| self.rng.next_unit() < BLINK_RANGE_PROBABILITY)
            .collect();

        if kept.is_empty() {
            return None;
        }

        Some(Application {
            slot: StyleSlot::Blink,
            style: style::blink_style(),
            ranges: kept,
        })
    }

    /// Run one refresh against a surface.
    ///
    /// Dead surfaces and oversized documents are skipped silently; every
    /// failure path here degrades to "skip this refresh".
    pub fn refresh(
        &self,
        surface: &dyn EditorSurface,
        config: &HighlightConfig,
        phase: usize,
    ) -> RefreshOutcome {
        if !surface.is_live() {
            self.metrics.record_refresh_skipped_disposed();
            return RefreshOutcome::SkippedDisposed;
        }

        let document = surface.document();
        if document.exceeds_size_limit() {
            tracing::debug!(document = %document.id, "skipping oversized document");
            self.metrics.record_refresh_skipped_oversize();
            return RefreshOutcome::SkippedOversize;
        }

        let plan = self.plan(&document, config, phase);

        for slot in &plan.clears {
            surface.clear_decorations(*slot);
        }

        let mut ranges_applied = 0;
        for application in &plan.applications {
            ranges_applied += application.ranges.len();
            surface.apply_decorations(application.slot, &application.style, &application.ranges);
        }

        let blink_applied = match &plan.blink {
            Some(blink) => {
                surface.apply_decorations(blink.slot, &blink.style, &blink.ranges);
                self.metrics.record_blink_pulse();
                true
            }
            None => false,
        };

        self.metrics.record_refresh_completed(ranges_applied);
        tracing::debug!(
            document = %document.id,
            keywords = plan.applications.len(),
            ranges = ranges_applied,
            phase,
            "refresh applied"
        );

        RefreshOutcome::Applied {
            applications: plan.applications.len(),
            blink_applied,
        }
    }
}
