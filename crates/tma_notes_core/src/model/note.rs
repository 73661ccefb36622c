//! Note record, request/response envelopes and text normalization.
//!
//! # Invariants
//! - `text` is trimmed and non-empty for every note created by this crate.
//! - `timestamp` is Unix epoch milliseconds.
//! - Unknown server fields (for example `user_id`) are ignored on decode.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque note identifier assigned by the server or generated locally.
pub type NoteId = String;

/// One personal text note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub text: String,
    /// Creation time in epoch milliseconds.
    pub timestamp: i64,
}

impl Note {
    pub fn new(id: impl Into<NoteId>, text: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            timestamp,
        }
    }

    /// Builds a note that exists only on this device.
    ///
    /// The id is a fresh UUID v4, so it cannot collide with another local
    /// note. `text` is expected to be normalized already.
    pub fn local(text: impl Into<String>, timestamp: i64) -> Self {
        Self::new(Uuid::new_v4().to_string(), text, timestamp)
    }
}

/// Body of `POST /notes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNoteRequest {
    pub text: String,
}

/// Body of `GET /notes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesEnvelope {
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Text was empty or whitespace-only.
    EmptyText,
    /// Id cannot name a single resource path segment.
    UnaddressableId,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "note text must not be empty"),
            Self::UnaddressableId => write!(f, "note id must not be empty, `.` or `..`"),
        }
    }
}

impl Error for NoteValidationError {}

/// Trims user input and rejects text that is empty afterwards.
pub fn normalize_note_text(raw: &str) -> Result<String, NoteValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NoteValidationError::EmptyText);
    }
    Ok(trimmed.to_string())
}

/// Rejects ids that URL path normalization would collapse into the
/// collection route.
pub fn validate_note_id(id: &str) -> Result<&str, NoteValidationError> {
    match id {
        "" | "." | ".." => Err(NoteValidationError::UnaddressableId),
        _ => Ok(id),
    }
}
