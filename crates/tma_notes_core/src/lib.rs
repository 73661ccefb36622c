//! Offline-resilient client core for the TMA notes API.
//! Owns the sync policy; presentation layers only render its state.

pub mod config;
pub mod db;
pub mod launch;
pub mod logging;
pub mod mirror;
pub mod model;
pub mod remote;
pub mod store;
pub mod sync;

pub use config::{ClientConfig, ConfigError};
pub use launch::{Appearance, LaunchParams, UiPlatform};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use mirror::{MirrorError, NoteMirror, MIRROR_KEY};
pub use model::note::{
    normalize_note_text, validate_note_id, CreateNoteRequest, Note, NoteId, NoteValidationError,
    NotesEnvelope,
};
pub use remote::{
    HealthStatus, HttpNotesRemote, NotesRemote, RemoteConfig, RemoteError, RemoteResult,
};
pub use store::{KvStore, MemoryKvStore, SqliteKvStore, StoreError, StoreResult};
pub use sync::{
    Availability, AvailabilityTracker, AvailabilityTransition, LoadingFlag, MessageSeverity,
    NotesSync, SyncMessage, SyncOperation, SyncReport,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
