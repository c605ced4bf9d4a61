// keyglow - animated keyword decoration engine for code editors
//
// This is the library crate containing the matching, styling, and refresh
// logic. The binary crate (main.rs) provides a terminal demo host.

pub mod host;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use host::{EditorSurface, Highlighter, RandomSource, StyleSlot, ThreadRngSource, WorkspaceHost};
pub use models::{ConfigError, ConfigPatch, DocumentId, DocumentSnapshot, HighlightConfig};
pub use state::{StateChange, StateManager};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
