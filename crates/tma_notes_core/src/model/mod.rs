//! Note domain model and wire shapes.
//!
//! # Responsibility
//! - Define the note record shared by the remote resource and the mirror.
//! - Own text normalization rules applied before any create attempt.
//!
//! # Invariants
//! - Note ids are opaque strings; only equality is meaningful.
//! - Stored note text is never empty after trimming.

pub mod note;
