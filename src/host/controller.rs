// Highlighter controller - wires host events to the refresh engine
//
// Owns the animation timer and the per-document debounce timers. The host's
// command layer calls into this from its own event loop; all timing runs on
// the tokio runtime whose handle is passed in at construction. Spawned tasks
// hold only a Weak reference back to the controller so a dropped highlighter
// cannot be kept alive by its own timers.

use crate::host::{EditorSurface, RandomSource, StyleSlot, ThreadRngSource, WorkspaceHost};
use crate::metrics::Metrics;
use crate::models::{ConfigError, ConfigPatch, DocumentId, HighlightConfig};
use crate::services::refresh::{RefreshEngine, RefreshOutcome, BLINK_DURATION};
use crate::state::{StateChange, StateManager};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Delay between a text change and the refresh it triggers, coalescing a
/// burst of keystrokes into one refresh.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(100);

/// The keyword highlighter as the host sees it.
///
/// One instance per host session, handed to the command layer at startup and
/// threaded through every handler. Public operations:
///
/// - [`toggle`](Self::toggle) / [`enable`](Self::enable) /
///   [`disable`](Self::disable)
/// - [`update_configuration`](Self::update_configuration)
/// - [`notify_text_changed`](Self::notify_text_changed),
///   [`notify_active_editor_changed`](Self::notify_active_editor_changed),
///   [`notify_visible_editors_changed`](Self::notify_visible_editors_changed)
/// - [`dispose`](Self::dispose)
///
/// # Related Types
///
/// - [`crate::state::StateManager`]: holds the enabled flag, configuration,
///   and phase; emits [`StateChange`] events hosts can subscribe to
/// - [`crate::services::refresh::RefreshEngine`]: performs the actual
///   decoration work
/// - [`WorkspaceHost`] / [`EditorSurface`]: the host-supplied view of visible
///   editors
pub struct Highlighter {
    state: Arc<StateManager>,
    engine: Arc<RefreshEngine>,
    workspace: Arc<dyn WorkspaceHost>,
    metrics: Arc<Metrics>,
    runtime: tokio::runtime::Handle,

    /// Animation driver task; replaced when the interval changes.
    animation: Mutex<Option<JoinHandle<()>>>,

    /// Pending debounced refresh per document. A new text change aborts and
    /// replaces the pending task, so at most one refresh is in flight per
    /// document.
    debounces: Mutex<HashMap<DocumentId, JoinHandle<()>>>,

    /// Set once by [`dispose`](Self::dispose); deferred callbacks check this
    /// before touching a surface.
    disposed: AtomicBool,
}

impl Highlighter {
    /// Build a highlighter with the default random source.
    pub fn new(
        state: Arc<StateManager>,
        workspace: Arc<dyn WorkspaceHost>,
        runtime: tokio::runtime::Handle,
    ) -> Arc<Self> {
        Self::with_random_source(state, workspace, runtime, Arc::new(ThreadRngSource))
    }

    /// Build with an explicit random source (tests inject deterministic
    /// draws for blink behavior).
    pub fn with_random_source(
        state: Arc<StateManager>,
        workspace: Arc<dyn WorkspaceHost>,
        runtime: tokio::runtime::Handle,
        rng: Arc<dyn RandomSource>,
    ) -> Arc<Self> {
        let metrics = Arc::new(Metrics::new());
        let engine = Arc::new(RefreshEngine::new(rng, Arc::clone(&metrics)));

        Arc::new(Self {
            state,
            engine,
            workspace,
            metrics,
            runtime,
            animation: Mutex::new(None),
            debounces: Mutex::new(HashMap::new()),
            disposed: AtomicBool::new(false),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.state.read(|s| s.enabled)
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// Enable if disabled, disable if enabled.
    pub fn toggle(self: &Arc<Self>) {
        if self.is_enabled() {
            self.disable();
        } else {
            self.enable();
        }
    }

    /// Start highlighting: switch on, start the animation driver, refresh
    /// every visible editor.
    pub fn enable(self: &Arc<Self>) {
        if self.is_disposed() || self.is_enabled() {
            return;
        }

        self.state.set_enabled(true);
        tracing::info!("highlighter enabled");
        self.start_animation();
        self.refresh_all();
    }

    /// Stop highlighting: cancel the timers and strip every decoration from
    /// live surfaces.
    pub fn disable(&self) {
        if !self.is_enabled() {
            return;
        }

        self.state.set_enabled(false);
        self.stop_animation();
        self.abort_debounces();
        self.clear_all_surfaces(self.state.read(|s| s.config.colors.len()));
        tracing::info!("highlighter disabled");
    }

    /// Merge `patch` over the active configuration and re-apply.
    ///
    /// Invalid patches are rejected with a [`ConfigError`] and change
    /// nothing. Valid patches swap the configuration wholesale; the animation
    /// timer is restarted when the interval changed (a running timer never
    /// adapts mid-flight), slots orphaned by a palette shrink are cleared,
    /// and a full refresh pass runs.
    pub fn update_configuration(self: &Arc<Self>, patch: &ConfigPatch) -> Result<(), ConfigError> {
        let old_palette_len = self.state.read(|s| s.config.colors.len());
        let changes = self.state.apply_patch(patch)?;
        self.metrics.record_config_update();

        let interval_changed = changes.iter().any(|change| {
            matches!(
                change,
                StateChange::ConfigurationChanged {
                    interval_changed: true
                }
            )
        });
        tracing::info!(?patch, interval_changed, "configuration updated");

        if self.is_enabled() {
            let new_palette_len = self.state.read(|s| s.config.colors.len());
            self.clear_all_surfaces(old_palette_len.max(new_palette_len));
            if interval_changed {
                self.start_animation();
            }
            self.refresh_all();
        }

        Ok(())
    }

    /// Schedule a debounced refresh for `document`.
    ///
    /// A second notification inside the debounce window rearms the timer
    /// instead of stacking a second refresh.
    pub fn notify_text_changed(self: &Arc<Self>, document: &DocumentId) {
        if self.is_disposed() || !self.is_enabled() {
            return;
        }

        let weak = Arc::downgrade(self);
        let id = document.clone();
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(DEBOUNCE_DELAY).await;
            let Some(this) = weak.upgrade() else {
                return;
            };
            if this.is_disposed() || !this.is_enabled() {
                return;
            }
            this.refresh_document(&id);
        });

        let mut debounces = self.debounces.lock().unwrap();
        if let Some(previous) = debounces.insert(document.clone(), handle) {
            if !previous.is_finished() {
                previous.abort();
                self.metrics.record_debounce_rearm();
            }
        }
    }

    /// Refresh every visible editor immediately.
    pub fn notify_active_editor_changed(self: &Arc<Self>) {
        self.refresh_all();
    }

    /// Refresh every visible editor immediately.
    pub fn notify_visible_editors_changed(self: &Arc<Self>) {
        self.refresh_all();
    }

    /// Release every owned resource. Idempotent.
    ///
    /// Cancels the animation and debounce tasks synchronously and strips
    /// decorations from live surfaces. In-flight blink reversals are not
    /// cancelled; they check the disposal flag before touching anything.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }

        self.stop_animation();
        self.abort_debounces();
        self.clear_all_surfaces(self.state.read(|s| s.config.colors.len()));
        self.state.set_enabled(false);
        self.metrics.log_summary();
        tracing::info!("highlighter disposed");
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// (Re)start the animation driver with the configured interval.
    ///
    /// Each tick advances the phase one step and refreshes every visible
    /// editor. Replacing the task is how interval changes take effect.
    fn start_animation(self: &Arc<Self>) {
        let interval = self.state.read(|s| s.config.animation_interval());
        let weak = Arc::downgrade(self);

        let handle = self.runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; consume it so the loop
            // fires on the period boundary.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(this) = weak.upgrade() else {
                    break;
                };
                if this.is_disposed() || !this.is_enabled() {
                    break;
                }

                let phase = this.state.advance_phase();
                this.metrics.record_phase_tick();
                tracing::debug!(phase, "animation tick");
                this.refresh_all();
            }
        });

        if let Some(previous) = self.animation.lock().unwrap().replace(handle) {
            previous.abort();
        }
    }

    fn stop_animation(&self) {
        if let Some(handle) = self.animation.lock().unwrap().take() {
            handle.abort();
        }
    }

    fn abort_debounces(&self) {
        for (_, handle) in self.debounces.lock().unwrap().drain() {
            handle.abort();
        }
    }

    fn refresh_all(self: &Arc<Self>) {
        if self.is_disposed() || !self.is_enabled() {
            return;
        }

        let (config, phase) = self.state.read(|s| (s.config.clone(), s.phase));
        for surface in self.workspace.visible_editors() {
            self.refresh_surface(surface, &config, phase);
        }
    }

    fn refresh_document(self: &Arc<Self>, id: &DocumentId) {
        let (config, phase) = self.state.read(|s| (s.config.clone(), s.phase));
        for surface in self.workspace.visible_editors() {
            if &surface.document().id == id {
                self.refresh_surface(surface, &config, phase);
            }
        }
    }

    fn refresh_surface(
        self: &Arc<Self>,
        surface: Arc<dyn EditorSurface>,
        config: &HighlightConfig,
        phase: usize,
    ) {
        let outcome = self.engine.refresh(surface.as_ref(), config, phase);

        if let RefreshOutcome::Applied {
            blink_applied: true,
            ..
        } = outcome
        {
            let weak = Arc::downgrade(self);
            self.runtime.spawn(async move {
                tokio::time::sleep(BLINK_DURATION).await;
                let Some(this) = weak.upgrade() else {
                    return;
                };
                if !this.is_disposed() && surface.is_live() {
                    surface.clear_decorations(StyleSlot::Blink);
                }
            });
        }
    }

    fn clear_all_surfaces(&self, palette_len: usize) {
        for surface in self.workspace.visible_editors() {
            if !surface.is_live() {
                continue;
            }
            for index in 0..palette_len {
                surface.clear_decorations(StyleSlot::Palette(index));
            }
            surface.clear_decorations(StyleSlot::Blink);
        }
    }
}
