// State management module
//
// Wraps HighlighterState with thread-safe access using Arc<RwLock<T>> and
// emits change events over a tokio broadcast channel so hosts can react to
// enable/config/phase transitions without polling.

use crate::models::{ConfigError, ConfigPatch, HighlightConfig};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// Change events emitted when highlighter state is modified
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// The highlighter was switched on or off
    EnabledChanged { enabled: bool },

    /// The configuration was replaced; `interval_changed` tells the animation
    /// driver whether its timer needs restarting
    ConfigurationChanged { interval_changed: bool },

    /// The animation phase advanced one step
    PhaseAdvanced { phase: usize },
}

/// Runtime state of the highlighter: the on/off flag, the active
/// configuration, and the animation phase counter.
///
/// The phase is an index into the color palette, advanced modulo the palette
/// length once per animation tick by the animation driver only.
#[derive(Clone, Debug, PartialEq)]
pub struct HighlighterState {
    pub enabled: bool,
    pub config: HighlightConfig,
    pub phase: usize,
}

impl Default for HighlighterState {
    fn default() -> Self {
        Self {
            enabled: false,
            config: HighlightConfig::default(),
            phase: 0,
        }
    }
}

/// Thread-safe state manager with event emission
///
/// Provides access to [`HighlighterState`] via `Arc<RwLock<T>>`, detects
/// changes on update, and emits [`StateChange`] events over a broadcast
/// channel. Timer ticks, debounce callbacks, and host notifications may run on
/// any worker thread; this is the one place they synchronize.
pub struct StateManager {
    state: Arc<RwLock<HighlighterState>>,
    state_tx: broadcast::Sender<StateChange>,
}

impl StateManager {
    pub fn new() -> Self {
        let (state_tx, _) = broadcast::channel(64);
        Self {
            state: Arc::new(RwLock::new(HighlighterState::default())),
            state_tx,
        }
    }

    /// Get a read-only snapshot of the current state
    pub fn snapshot(&self) -> HighlighterState {
        self.state.read().unwrap().clone()
    }

    /// Execute a function with read access to the state
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&HighlighterState) -> R,
    {
        let state = self.state.read().unwrap();
        f(&state)
    }

    /// Update the state and emit change events
    ///
    /// Captures the old state, applies the update function, detects what
    /// changed, and broadcasts the corresponding events. Send errors are
    /// ignored; it is fine if no one is listening.
    pub fn update<F>(&self, update_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut HighlighterState),
    {
        let mut state = self.state.write().unwrap();
        let old_state = state.clone();

        update_fn(&mut state);

        let changes = detect_changes(&old_state, &state);
        for change in &changes {
            let _ = self.state_tx.send(change.clone());
        }

        changes
    }

    /// Subscribe to state change events
    ///
    /// Returns a receiver that will get notified of all future state changes.
    /// Multiple subscribers can listen simultaneously.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_tx.subscribe()
    }

    // Convenience methods for common state updates

    /// Switch the highlighter on or off
    pub fn set_enabled(&self, enabled: bool) -> Vec<StateChange> {
        self.update(|state| state.enabled = enabled)
    }

    /// Advance the phase one step modulo the palette length; returns the new
    /// phase
    pub fn advance_phase(&self) -> usize {
        let mut next = 0;
        self.update(|state| {
            let len = state.config.colors.len().max(1);
            state.phase = (state.phase + 1) % len;
            next = state.phase;
        });
        next
    }

    /// Merge a patch over the active configuration after validating the
    /// result.
    ///
    /// On success the configuration is swapped wholesale and the phase is
    /// clamped to the new palette length (a shrink must not leave the phase
    /// pointing past the end). Invalid patches leave the state untouched.
    pub fn apply_patch(&self, patch: &ConfigPatch) -> Result<Vec<StateChange>, ConfigError> {
        let merged = self.read(|state| state.config.merged(patch));
        merged.validate()?;

        Ok(self.update(|state| {
            state.phase %= merged.colors.len();
            state.config = merged.clone();
        }))
    }
}

fn detect_changes(old: &HighlighterState, new: &HighlighterState) -> Vec<StateChange> {
    let mut changes = Vec::new();

    if old.enabled != new.enabled {
        changes.push(StateChange::EnabledChanged {
            enabled: new.enabled,
        });
    }

    if old.config != new.config {
        changes.push(StateChange::ConfigurationChanged {
            interval_changed: old.config.animation_interval_ms != new.config.animation_interval_ms,
        });
    }

    if old.phase != new.phase {
        changes.push(StateChange::PhaseAdvanced { phase: new.phase });
    }

    changes
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

// Make StateManager cloneable for sharing across tasks
impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            state_tx: self.state_tx.clone(),
        }
    }
}
