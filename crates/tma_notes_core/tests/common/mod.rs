#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use tma_notes_core::{Note, NotesRemote, RemoteError, RemoteResult};

const SERVER_EPOCH_MS: i64 = 1_700_000_000_000;

/// In-process notes backend with scriptable reachability.
///
/// Each call consumes one scripted outcome; once the script is exhausted
/// the `online` switch decides.
pub struct FakeRemote {
    online: Cell<bool>,
    script: RefCell<VecDeque<bool>>,
    server: RefCell<Vec<Note>>,
    next_id: Cell<u64>,
    calls: Cell<usize>,
}

impl FakeRemote {
    pub fn online() -> Self {
        Self::with_state(true, &[])
    }

    pub fn offline() -> Self {
        Self::with_state(false, &[])
    }

    pub fn scripted(outcomes: &[bool]) -> Self {
        Self::with_state(true, outcomes)
    }

    fn with_state(online: bool, outcomes: &[bool]) -> Self {
        Self {
            online: Cell::new(online),
            script: RefCell::new(outcomes.iter().copied().collect()),
            server: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            calls: Cell::new(0),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.set(online);
    }

    pub fn seed(&self, notes: Vec<Note>) {
        *self.server.borrow_mut() = notes;
    }

    pub fn server_notes(&self) -> Vec<Note> {
        self.server.borrow().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    fn reachable(&self) -> RemoteResult<()> {
        self.calls.set(self.calls.get() + 1);
        let up = self
            .script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| self.online.get());
        if up {
            Ok(())
        } else {
            Err(RemoteError::Status {
                status: 503,
                body: "Service Unavailable".to_string(),
            })
        }
    }
}

impl NotesRemote for FakeRemote {
    fn fetch_all(&self) -> RemoteResult<Vec<Note>> {
        self.reachable()?;
        Ok(self.server_notes())
    }

    fn create(&self, text: &str) -> RemoteResult<Note> {
        self.reachable()?;
        let n = self.next_id.get();
        self.next_id.set(n + 1);
        let note = Note::new(format!("srv-{n}"), text, SERVER_EPOCH_MS + n as i64);
        self.server.borrow_mut().insert(0, note.clone());
        Ok(note)
    }

    fn delete(&self, id: &str) -> RemoteResult<()> {
        self.reachable()?;
        let mut server = self.server.borrow_mut();
        let before = server.len();
        server.retain(|note| note.id != id);
        if server.len() == before {
            return Err(RemoteError::Status {
                status: 404,
                body: "Note not found".to_string(),
            });
        }
        Ok(())
    }

    fn delete_all(&self) -> RemoteResult<()> {
        self.reachable()?;
        self.server.borrow_mut().clear();
        Ok(())
    }
}
