//! Remote-first note session with local fallback.
//!
//! # Responsibility
//! - Own the in-memory note list for one UI session.
//! - Apply each intent through one "attempt remote, else apply local"
//!   combinator, then mirror the resulting list.
//!
//! # Invariants
//! - Add commits only server-confirmed notes, or a local substitute on failure.
//! - Delete and delete-all remove locally whatever the remote outcome.
//! - The mirror equals the in-memory list after every mutation.
//! - A fallback load never rewrites the mirror it just read.

use super::availability::{Availability, AvailabilityTracker, AvailabilityTransition};
use super::clock::LocalClock;
use super::loading::LoadingFlag;
use super::message::SyncMessage;
use crate::mirror::NoteMirror;
use crate::model::note::{normalize_note_text, validate_note_id, Note};
use crate::remote::{NotesRemote, RemoteResult};
use crate::store::KvStore;
use log::{debug, error, info, warn};
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Intent carried out by one sync call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOperation {
    Load,
    Add,
    Delete,
    DeleteAll,
}

impl SyncOperation {
    fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Add => "add",
            Self::Delete => "delete",
            Self::DeleteAll => "delete_all",
        }
    }
}

impl Display for SyncOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settled outcome of one sync call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub operation: SyncOperation,
    /// Whether the remote attempt succeeded.
    pub remote_ok: bool,
    /// Availability edge caused by this call, if any.
    pub transition: Option<AvailabilityTransition>,
    /// Message slot content after this call.
    pub message: Option<SyncMessage>,
}

/// What the local branch decided after a failed remote attempt.
struct LocalOutcome {
    message: Option<SyncMessage>,
    write_mirror: bool,
}

impl LocalOutcome {
    fn mirrored(message: Option<SyncMessage>) -> Self {
        Self {
            message,
            write_mirror: true,
        }
    }

    fn read_only(message: Option<SyncMessage>) -> Self {
        Self {
            message,
            write_mirror: false,
        }
    }
}

/// Session state lent to the local branch.
struct Fallback<'a, S: KvStore> {
    notes: &'a mut Vec<Note>,
    mirror: &'a NoteMirror<S>,
    clock: &'a mut LocalClock,
}

/// One notes session: list, message slot, availability and loading flag.
///
/// The remote is injected; pass `&client` to share one HTTP client value.
pub struct NotesSync<R: NotesRemote, S: KvStore> {
    remote: R,
    mirror: NoteMirror<S>,
    notes: Vec<Note>,
    message: Option<SyncMessage>,
    availability: AvailabilityTracker,
    loading: LoadingFlag,
    clock: LocalClock,
}

impl<R: NotesRemote, S: KvStore> NotesSync<R, S> {
    /// Creates an empty session without contacting the remote.
    pub fn new(remote: R, mirror: NoteMirror<S>) -> Self {
        Self {
            remote,
            mirror,
            notes: Vec::new(),
            message: None,
            availability: AvailabilityTracker::new(),
            loading: LoadingFlag::new(),
            clock: LocalClock::new(),
        }
    }

    /// Creates a session and runs the initial load.
    pub fn connect(remote: R, mirror: NoteMirror<S>) -> (Self, SyncReport) {
        let mut session = Self::new(remote, mirror);
        let report = session.load();
        (session, report)
    }

    /// Notes, newest first.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn message(&self) -> Option<SyncMessage> {
        self.message
    }

    pub fn availability(&self) -> Availability {
        self.availability.current()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Handle for observing the in-progress state from another thread.
    pub fn loading_flag(&self) -> LoadingFlag {
        self.loading.clone()
    }

    pub fn mirror(&self) -> &NoteMirror<S> {
        &self.mirror
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Replaces the list with the remote collection, or the mirror on failure.
    ///
    /// Absent mirror yields an empty list without a message; a corrupt
    /// mirror yields an empty list and `SyncMessage::LoadFailed`.
    pub fn load(&mut self) -> SyncReport {
        self.attempt(
            SyncOperation::Load,
            |remote| remote.fetch_all(),
            |notes, fetched| *notes = fetched,
            |local| match local.mirror.read() {
                Ok(Some(mirrored)) => {
                    debug!(
                        "event=mirror_read module=sync status=ok count={}",
                        mirrored.len()
                    );
                    *local.notes = mirrored;
                    LocalOutcome::read_only(None)
                }
                Ok(None) => {
                    debug!("event=mirror_read module=sync status=empty");
                    local.notes.clear();
                    LocalOutcome::read_only(None)
                }
                Err(err) => {
                    error!(
                        "event=mirror_read module=sync status=error error_code=mirror_unreadable error={err}"
                    );
                    local.notes.clear();
                    LocalOutcome::read_only(Some(SyncMessage::LoadFailed))
                }
            },
        )
    }

    /// Re-runs `load`; the only recovery path offered to the user.
    pub fn refresh(&mut self) -> SyncReport {
        self.load()
    }

    /// Adds one note at the front of the list.
    ///
    /// Returns `None` without touching any state when `text` is blank.
    pub fn add(&mut self, text: &str) -> Option<SyncReport> {
        let text = normalize_note_text(text).ok()?;
        let report = self.attempt(
            SyncOperation::Add,
            |remote| remote.create(&text),
            |notes, created| notes.insert(0, created),
            |local| {
                let note = Note::local(text.as_str(), local.clock.next_timestamp());
                debug!("event=note_local_create module=sync id={}", note.id);
                local.notes.insert(0, note);
                LocalOutcome::mirrored(Some(SyncMessage::SavedLocallyOnly))
            },
        );
        Some(report)
    }

    /// Removes the note with `id`; unknown ids leave the list unchanged.
    ///
    /// Empty, `.` and `..` ids are never sent: they would address the whole
    /// collection. Such a call only clears the message slot.
    pub fn delete(&mut self, id: &str) -> SyncReport {
        if validate_note_id(id).is_err() {
            warn!(
                "event=sync_op module=sync status=rejected op=delete error_code=invalid_note_id id={id:?}"
            );
            self.message = None;
            return SyncReport {
                operation: SyncOperation::Delete,
                remote_ok: false,
                transition: None,
                message: None,
            };
        }
        self.attempt(
            SyncOperation::Delete,
            |remote| remote.delete(id),
            |notes, ()| notes.retain(|note| note.id != id),
            |local| {
                local.notes.retain(|note| note.id != id);
                LocalOutcome::mirrored(Some(SyncMessage::DeletedLocallyOnly))
            },
        )
    }

    /// Empties the list whatever the remote outcome.
    pub fn delete_all(&mut self) -> SyncReport {
        self.attempt(
            SyncOperation::DeleteAll,
            |remote| remote.delete_all(),
            |notes, ()| notes.clear(),
            |local| {
                local.notes.clear();
                LocalOutcome::mirrored(Some(SyncMessage::DeletedAllLocallyOnly))
            },
        )
    }

    fn attempt<T>(
        &mut self,
        operation: SyncOperation,
        remote_call: impl FnOnce(&R) -> RemoteResult<T>,
        on_remote: impl FnOnce(&mut Vec<Note>, T),
        on_local: impl FnOnce(Fallback<'_, S>) -> LocalOutcome,
    ) -> SyncReport {
        let _busy = self.loading.begin();
        let started_at = Instant::now();
        self.message = None;

        let result = remote_call(&self.remote);
        let remote_ok = result.is_ok();
        let mut outcome = match result {
            Ok(value) => {
                on_remote(&mut self.notes, value);
                LocalOutcome::mirrored(None)
            }
            Err(err) => {
                warn!(
                    "event=sync_fallback module=sync op={operation} error_code={} error={err}",
                    err.code()
                );
                on_local(Fallback {
                    notes: &mut self.notes,
                    mirror: &self.mirror,
                    clock: &mut self.clock,
                })
            }
        };
        if let Some(newest) = self.notes.iter().map(|note| note.timestamp).max() {
            self.clock.observe(newest);
        }

        let transition = self.availability.observe(remote_ok);
        if let Some(transition) = transition {
            info!(
                "event=availability_changed module=sync op={operation} transition=\"{transition}\""
            );
        }

        if outcome.write_mirror {
            if let Err(err) = self.mirror.write(&self.notes) {
                error!(
                    "event=mirror_write module=sync status=error op={operation} error_code=mirror_write_failed error={err}"
                );
                outcome.message = outcome.message.or(Some(SyncMessage::MirrorWriteFailed));
            }
        }
        self.message = outcome.message;

        info!(
            "event=sync_op module=sync status={} op={operation} count={} duration_ms={}",
            if remote_ok { "remote" } else { "local" },
            self.notes.len(),
            started_at.elapsed().as_millis()
        );

        SyncReport {
            operation,
            remote_ok,
            transition,
            message: self.message,
        }
    }
}
