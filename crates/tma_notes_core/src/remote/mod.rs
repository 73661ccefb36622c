//! Remote notes resource contract and HTTP implementation.
//!
//! # Responsibility
//! - Define the four operations the sync policy needs from the backend.
//! - Map every transport, status and decode problem into `RemoteError`.
//!
//! # Invariants
//! - Implementations never retry; one call is one attempt.
//! - A returned `Err` means the backend state is unknown to the caller.

use crate::model::note::Note;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

mod http;

pub use http::{HealthStatus, HttpNotesRemote, RemoteConfig, INIT_DATA_HEADER};

pub type RemoteResult<T> = Result<T, RemoteError>;

#[derive(Debug)]
pub enum RemoteError {
    /// Request could not be built or the connection failed.
    Transport(reqwest::Error),
    /// Server answered with a non-2xx status.
    Status { status: u16, body: String },
    /// Response body was not the expected JSON shape.
    Decode(serde_json::Error),
    /// Endpoint URL could not be derived from the configured base.
    InvalidUrl(String),
    /// Note id cannot be addressed as one path segment; nothing was sent.
    InvalidNoteId(String),
}

impl RemoteError {
    /// Short stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status { .. } => "status",
            Self::Decode(_) => "decode",
            Self::InvalidUrl(_) => "invalid_url",
            Self::InvalidNoteId(_) => "invalid_note_id",
        }
    }
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "notes API request failed: {err}"),
            Self::Status { status, body } if body.is_empty() => {
                write!(f, "notes API returned status {status}")
            }
            Self::Status { status, body } => {
                write!(f, "notes API returned status {status}: {body}")
            }
            Self::Decode(err) => write!(f, "notes API response is malformed: {err}"),
            Self::InvalidUrl(value) => write!(f, "invalid notes API url: {value}"),
            Self::InvalidNoteId(id) => write!(f, "note id {id:?} cannot be addressed"),
        }
    }
}

impl Error for RemoteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Status { .. } | Self::InvalidUrl(_) | Self::InvalidNoteId(_) => None,
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

/// Conventional REST notes resource.
pub trait NotesRemote {
    /// Fetches the full collection in server order.
    fn fetch_all(&self) -> RemoteResult<Vec<Note>>;
    /// Creates one note; the server assigns id and timestamp.
    fn create(&self, text: &str) -> RemoteResult<Note>;
    /// Deletes one note by id.
    fn delete(&self, id: &str) -> RemoteResult<()>;
    /// Deletes the whole collection.
    fn delete_all(&self) -> RemoteResult<()>;
}

impl<T: NotesRemote + ?Sized> NotesRemote for &T {
    fn fetch_all(&self) -> RemoteResult<Vec<Note>> {
        (**self).fetch_all()
    }

    fn create(&self, text: &str) -> RemoteResult<Note> {
        (**self).create(text)
    }

    fn delete(&self, id: &str) -> RemoteResult<()> {
        (**self).delete(id)
    }

    fn delete_all(&self) -> RemoteResult<()> {
        (**self).delete_all()
    }
}

impl<T: NotesRemote + ?Sized> NotesRemote for Box<T> {
    fn fetch_all(&self) -> RemoteResult<Vec<Note>> {
        (**self).fetch_all()
    }

    fn create(&self, text: &str) -> RemoteResult<Note> {
        (**self).create(text)
    }

    fn delete(&self, id: &str) -> RemoteResult<()> {
        (**self).delete(id)
    }

    fn delete_all(&self) -> RemoteResult<()> {
        (**self).delete_all()
    }
}

impl<T: NotesRemote + ?Sized> NotesRemote for Arc<T> {
    fn fetch_all(&self) -> RemoteResult<Vec<Note>> {
        (**self).fetch_all()
    }

    fn create(&self, text: &str) -> RemoteResult<Note> {
        (**self).create(text)
    }

    fn delete(&self, id: &str) -> RemoteResult<()> {
        (**self).delete(id)
    }

    fn delete_all(&self) -> RemoteResult<()> {
        (**self).delete_all()
    }
}
