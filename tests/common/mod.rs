//! Shared fixtures for the integration tests: a recording surface, a fixed
//! random source, and a static workspace.

#![allow(dead_code)]

use keyglow::models::CharRange;
use keyglow::services::StyleDescriptor;
use keyglow::{DocumentSnapshot, EditorSurface, RandomSource, StyleSlot, WorkspaceHost};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// One recorded call against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Apply {
        slot: StyleSlot,
        style: StyleDescriptor,
        ranges: Vec<CharRange>,
    },
    Clear {
        slot: StyleSlot,
    },
}

/// Surface that records every decoration call for later assertions.
pub struct RecordingSurface {
    document: Mutex<DocumentSnapshot>,
    calls: Mutex<Vec<SurfaceCall>>,
    live: AtomicBool,
}

impl RecordingSurface {
    pub fn new(document: DocumentSnapshot) -> Arc<Self> {
        Arc::new(Self {
            document: Mutex::new(document),
            calls: Mutex::new(Vec::new()),
            live: AtomicBool::new(true),
        })
    }

    pub fn set_live(&self, live: bool) {
        self.live.store(live, Ordering::SeqCst);
    }

    pub fn set_text(&self, text: &str) {
        self.document.lock().unwrap().text = text.to_string();
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Drain the recorded calls, returning what happened since the last take.
    pub fn take_calls(&self) -> Vec<SurfaceCall> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    pub fn applies(&self) -> Vec<SurfaceCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, SurfaceCall::Apply { .. }))
            .collect()
    }

    /// Number of refreshes observed, counting each full clear pass once.
    pub fn refresh_count(calls: &[SurfaceCall]) -> usize {
        calls
            .iter()
            .filter(|call| matches!(call, SurfaceCall::Clear { slot: StyleSlot::Palette(0) }))
            .count()
    }
}

impl EditorSurface for RecordingSurface {
    fn document(&self) -> DocumentSnapshot {
        self.document.lock().unwrap().clone()
    }

    fn apply_decorations(&self, slot: StyleSlot, style: &StyleDescriptor, ranges: &[CharRange]) {
        self.calls.lock().unwrap().push(SurfaceCall::Apply {
            slot,
            style: style.clone(),
            ranges: ranges.to_vec(),
        });
    }

    fn clear_decorations(&self, slot: StyleSlot) {
        self.calls.lock().unwrap().push(SurfaceCall::Clear { slot });
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

/// Random source that always returns the same draw.
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn next_unit(&self) -> f64 {
        self.0
    }
}

/// Workspace with an explicit editor list.
pub struct StaticWorkspace {
    editors: Mutex<Vec<Arc<RecordingSurface>>>,
}

impl StaticWorkspace {
    pub fn new(editors: Vec<Arc<RecordingSurface>>) -> Arc<Self> {
        Arc::new(Self {
            editors: Mutex::new(editors),
        })
    }

    pub fn add_editor(&self, editor: Arc<RecordingSurface>) {
        self.editors.lock().unwrap().push(editor);
    }
}

impl WorkspaceHost for StaticWorkspace {
    fn visible_editors(&self) -> Vec<Arc<dyn EditorSurface>> {
        self.editors
            .lock()
            .unwrap()
            .iter()
            .map(|editor| Arc::clone(editor) as Arc<dyn EditorSurface>)
            .collect()
    }
}
