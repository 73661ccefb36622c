//! Offline-fallback synchronization policy.
//!
//! # Responsibility
//! - Run every note intent remote-first with a local-equivalent fallback.
//! - Keep the in-memory list and the local mirror reconciled.
//! - Report backend availability changes as edge-triggered transitions.
//!
//! # Invariants
//! - No operation panics or returns `Err`; failures become `SyncMessage`s.
//! - Operations take `&mut self`, so one session runs one intent at a time.

mod availability;
mod clock;
mod loading;
mod message;
mod policy;

pub use availability::{Availability, AvailabilityTracker, AvailabilityTransition};
pub use clock::LocalClock;
pub use loading::LoadingFlag;
pub use message::{MessageSeverity, SyncMessage};
pub use policy::{NotesSync, SyncOperation, SyncReport};
