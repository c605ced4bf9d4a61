//! keyglow - animated keyword decoration engine
//!
//! Terminal demo entry point. Stands in for an editor host: it owns one
//! sample document behind an ANSI rendering surface, wires it to the
//! highlighter, and drives a short animation session.
//!
//! # Execution Flow
//!
//! 1. Initialize logging -> logs/keyglow.<date>
//! 2. Create a tokio runtime for the animation and debounce timers
//! 3. Create the StateManager and the demo workspace
//! 4. Enable the highlighter and repaint the terminal for ~10 seconds
//! 5. Patch the configuration mid-run (faster interval, blink, pulse)
//! 6. Dispose, log the metrics summary, shut the runtime down
//!
//! The console logging layer stays off because stdout is the rendering
//! canvas; diagnostics go to the log file.

use anyhow::Result;
use keyglow::models::CharRange;
use keyglow::services::StyleDescriptor;
use keyglow::{
    ConfigPatch, DocumentSnapshot, EditorSurface, Highlighter, StateManager, StyleSlot,
    WorkspaceHost, APP_NAME, VERSION,
};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const SAMPLE: &str = r#"use std::fmt;

pub struct Beacon {
    label: String,
}

impl Beacon {
    pub fn new(label: &str) -> Self {
        Beacon { label: label.to_string() }
    }

    fn describe(&self) -> String {
        return format!("beacon {}", self.label);
    }
}
"#;

/// Rendering surface that repaints the sample document with ANSI escapes.
///
/// Decorations are stored per slot and read back by the frame loop on the
/// main thread; the highlighter's timers write from worker threads.
struct AnsiSurface {
    document: DocumentSnapshot,
    slots: Mutex<HashMap<StyleSlot, (StyleDescriptor, Vec<CharRange>)>>,
    live: AtomicBool,
}

impl AnsiSurface {
    fn new(document: DocumentSnapshot) -> Self {
        Self {
            document,
            slots: Mutex::new(HashMap::new()),
            live: AtomicBool::new(true),
        }
    }

    /// Render one frame: clear screen, then the document with its current
    /// decorations.
    fn frame(&self, phase: usize) -> String {
        let slots = self.slots.lock().unwrap();
        let char_count = self.document.text.chars().count();

        let mut codes: Vec<Option<String>> = vec![None; char_count];
        for (slot, (style, ranges)) in slots.iter() {
            if matches!(slot, StyleSlot::Blink) {
                continue;
            }
            for range in ranges {
                for i in range.start..range.end.min(char_count) {
                    codes[i] = Some(style_codes(style));
                }
            }
        }
        // The blink overlay dims whatever the palette styles painted.
        if let Some((_, ranges)) = slots.get(&StyleSlot::Blink) {
            for range in ranges {
                for i in range.start..range.end.min(char_count) {
                    codes[i].get_or_insert_with(String::new).push_str("\x1b[2m");
                }
            }
        }

        let mut out = String::from("\x1b[2J\x1b[H");
        out.push_str(&format!("{} v{} (phase {})\n\n", APP_NAME, VERSION, phase));
        let mut current: Option<&str> = None;
        for (i, ch) in self.document.text.chars().enumerate() {
            let wanted = codes[i].as_deref();
            if wanted != current {
                out.push_str("\x1b[0m");
                if let Some(code) = wanted {
                    out.push_str(code);
                }
                current = wanted;
            }
            out.push(ch);
        }
        out.push_str("\x1b[0m\n");
        out
    }
}

impl EditorSurface for AnsiSurface {
    fn document(&self) -> DocumentSnapshot {
        self.document.clone()
    }

    fn apply_decorations(&self, slot: StyleSlot, style: &StyleDescriptor, ranges: &[CharRange]) {
        self.slots
            .lock()
            .unwrap()
            .insert(slot, (style.clone(), ranges.to_vec()));
    }

    fn clear_decorations(&self, slot: StyleSlot) {
        self.slots.lock().unwrap().remove(&slot);
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

struct DemoWorkspace {
    editors: Vec<Arc<AnsiSurface>>,
}

impl WorkspaceHost for DemoWorkspace {
    fn visible_editors(&self) -> Vec<Arc<dyn EditorSurface>> {
        self.editors
            .iter()
            .map(|editor| Arc::clone(editor) as Arc<dyn EditorSurface>)
            .collect()
    }
}

fn style_codes(style: &StyleDescriptor) -> String {
    let mut codes = String::new();
    if let Some((r, g, b)) = style.foreground.as_deref().and_then(hex_rgb) {
        codes.push_str(&format!("\x1b[38;2;{r};{g};{b}m"));
    }
    if style.bold {
        codes.push_str("\x1b[1m");
    }
    if style.opacity < 0.55 {
        codes.push_str("\x1b[2m");
    }
    if style.underline.is_some() {
        codes.push_str("\x1b[4m");
    }
    codes
}

fn hex_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    let pair = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut chars = hex.chars();
            let mut channel = || {
                let c = chars.next()?;
                pair(&format!("{c}{c}"))
            };
            Some((channel()?, channel()?, channel()?))
        }
        6 => Some((pair(&hex[0..2])?, pair(&hex[2..4])?, pair(&hex[4..6])?)),
        _ => None,
    }
}

/// Demo entry point: one document, one surface, a ten-second session.
fn main() -> Result<()> {
    let _guard = keyglow::logging::setup_logging("logs", "keyglow", false, false)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("keyglow-worker")
        .build()?;

    let state = Arc::new(StateManager::new());
    let surface = Arc::new(AnsiSurface::new(DocumentSnapshot::new(
        "demo://sample.rs",
        "rust",
        SAMPLE,
    )));
    let workspace = Arc::new(DemoWorkspace {
        editors: vec![Arc::clone(&surface)],
    });

    let highlighter = Highlighter::new(Arc::clone(&state), workspace, runtime.handle().clone());
    highlighter.toggle();

    for frame in 0..80u32 {
        if frame == 40 {
            highlighter.update_configuration(&ConfigPatch {
                animation_interval_ms: Some(400),
                blink: Some(true),
                pulse: Some(true),
                ..ConfigPatch::default()
            })?;
        }

        print!("{}", surface.frame(state.read(|s| s.phase)));
        io::stdout().flush()?;
        std::thread::sleep(Duration::from_millis(125));
    }

    highlighter.dispose();
    runtime.shutdown_timeout(Duration::from_secs(5));

    println!("\x1b[0mdemo finished; metrics summary written to logs/");
    Ok(())
}
