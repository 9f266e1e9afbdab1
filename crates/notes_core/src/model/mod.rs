//! Domain model for notes and their identity.
//!
//! # Responsibility
//! - Define the canonical `Note` record and its status state machine.
//! - Own process-wide identifier generation.
//!
//! # Invariants
//! - Every note is identified by a `NoteId` that is never reused.
//! - `DELETED` is the terminal status a note passes through on delete.

pub mod id;
pub mod note;
