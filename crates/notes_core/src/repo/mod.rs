//! Repository layer abstractions and the in-memory store.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for notes.
//! - Own the single guarded mutation point for note status.
//!
//! # Invariants
//! - Repository writes must enforce `Note::validate()` before mutation.
//! - Repository APIs return semantic errors (`NotFound`,
//!   `InvalidStatusTransition`) rather than silently ignoring bad input.

pub mod note_repo;
