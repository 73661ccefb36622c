//! Write-through local copy of the note list.
//!
//! # Responsibility
//! - Serialize the whole in-memory note list into one fixed store slot.
//! - Read it back for offline loads, distinguishing absent from corrupt.
//!
//! # Invariants
//! - The slot always holds a JSON array of notes, newest first.
//! - A corrupt slot is reported, never silently treated as empty.

use crate::model::note::Note;
use crate::store::{KvStore, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store key holding the mirrored note list.
pub const MIRROR_KEY: &str = "tma-notes";

#[derive(Debug)]
pub enum MirrorError {
    Store(StoreError),
    /// Slot exists but is not a valid note list.
    Corrupt(serde_json::Error),
    Encode(serde_json::Error),
}

impl Display for MirrorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "mirror store failed: {err}"),
            Self::Corrupt(err) => write!(f, "mirrored notes are unreadable: {err}"),
            Self::Encode(err) => write!(f, "failed to encode notes for mirror: {err}"),
        }
    }
}

impl Error for MirrorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Corrupt(err) | Self::Encode(err) => Some(err),
        }
    }
}

impl From<StoreError> for MirrorError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Note-list view over a key-value store.
pub struct NoteMirror<S: KvStore> {
    store: S,
}

impl<S: KvStore> NoteMirror<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Replaces the mirrored list with `notes`.
    pub fn write(&self, notes: &[Note]) -> Result<(), MirrorError> {
        let encoded = serde_json::to_string(notes).map_err(MirrorError::Encode)?;
        self.store.set(MIRROR_KEY, &encoded)?;
        Ok(())
    }

    /// Reads the mirrored list.
    ///
    /// Returns `Ok(None)` when nothing was ever mirrored on this device.
    pub fn read(&self) -> Result<Option<Vec<Note>>, MirrorError> {
        let Some(raw) = self.store.get(MIRROR_KEY)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(MirrorError::Corrupt)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
