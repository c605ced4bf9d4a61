//! Data models for the keyglow engine.
//!
//! This module contains the core data structures used throughout the crate:
//! - [`HighlightConfig`] / [`ConfigPatch`]: the active configuration and the partial updates merged over it
//! - [`DocumentSnapshot`]: an immutable view of an open document supplied by the host
//! - [`CharRange`]: character-offset ranges produced by the match finder
//! - [`keywords`]: the static language → keyword table
//! - [`MAX_DOCUMENT_CHARS`]: the oversized-document guard constant
//!
//! # Architecture Note
//!
//! Config types derive `Serialize`/`Deserialize` so hosts can marshal settings
//! as plain data; nothing here performs I/O. The configuration is replaced
//! wholesale on update (see [`crate::state::StateManager`]), never mutated
//! field by field.

pub mod config;
pub mod document;
pub mod keywords;

pub use config::{ConfigError, ConfigPatch, HighlightConfig, DEFAULT_INTERVAL_MS, DEFAULT_PALETTE};
pub use document::{CharRange, DocumentId, DocumentSnapshot, Position, MAX_DOCUMENT_CHARS};
