//! Note use-case service.
//!
//! # Responsibility
//! - Provide the synchronous note API consumed by presentation layers.
//! - Parse and validate plain input values (names, deadline text).
//! - Run deadline sweeps against the wall clock.
//!
//! # Invariants
//! - Every failure is returned as a distinguishable `NoteServiceError`.
//! - Display listing puts closed notes last and is otherwise stable.
//! - Logs carry ids and counts only, never note names or descriptions.

use crate::model::note::{
    parse_deadline, validate_name, DeadlineParseError, Note, NoteId, NoteStatus,
    NoteValidationError,
};
use crate::repo::note_repo::{NewNote, NoteRepository, RepoError};
use chrono::{Local, NaiveDateTime};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteServiceError {
    /// Required field is missing or blank.
    InvalidInput(String),
    /// No live note has this id.
    NotFound(NoteId),
    /// Deadline text is not `yyyy-MM-dd HH:mm`.
    InvalidDeadlineFormat(String),
    /// Requested status change is not an edge of the state machine.
    InvalidStatusTransition { from: NoteStatus, to: NoteStatus },
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(details) => write!(f, "invalid input: {details}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidDeadlineFormat(value) => write!(
                f,
                "invalid deadline `{value}`; expected format yyyy-MM-dd HH:mm"
            ),
            Self::InvalidStatusTransition { from, to } => {
                write!(f, "invalid status transition: {from} -> {to}")
            }
        }
    }
}

impl Error for NoteServiceError {}

impl From<NoteValidationError> for NoteServiceError {
    fn from(value: NoteValidationError) -> Self {
        Self::InvalidInput(value.to_string())
    }
}

impl From<DeadlineParseError> for NoteServiceError {
    fn from(value: DeadlineParseError) -> Self {
        Self::InvalidDeadlineFormat(value.input)
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => err.into(),
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::InvalidStatusTransition { from, to } => {
                Self::InvalidStatusTransition { from, to }
            }
        }
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one note from plain input values.
    ///
    /// `deadline` uses `yyyy-MM-dd HH:mm`; blank text means no deadline.
    pub fn create_note(
        &self,
        name: &str,
        description: &str,
        deadline: &str,
    ) -> Result<Note, NoteServiceError> {
        let deadline = parse_deadline(deadline)?;
        self.create_note_with_deadline(name, description, deadline)
    }

    /// Creates one note with an already-parsed deadline.
    pub fn create_note_with_deadline(
        &self,
        name: &str,
        description: &str,
        deadline: Option<NaiveDateTime>,
    ) -> Result<Note, NoteServiceError> {
        validate_name(name)?;
        let mut draft = NewNote::new(name, description);
        draft.deadline = deadline;

        let note = self.repo.create_note(draft)?;
        info!(
            "event=note_create module=service status=ok note_id={} has_deadline={}",
            note.id,
            note.deadline.is_some()
        );
        Ok(note)
    }

    /// Lists live notes in insertion order.
    pub fn get_all_notes(&self) -> Result<Vec<Note>, NoteServiceError> {
        Ok(self.repo.list_notes()?)
    }

    /// Lists live notes with closed notes moved to the end.
    pub fn list_notes_for_display(&self) -> Result<Vec<Note>, NoteServiceError> {
        let mut notes = self.repo.list_notes()?;
        sort_closed_last(&mut notes);
        Ok(notes)
    }

    /// Gets one live note by id.
    pub fn get_note_by_id(&self, id: NoteId) -> Result<Option<Note>, NoteServiceError> {
        Ok(self.repo.get_note(id)?)
    }

    /// Gets all live notes whose name equals `name` exactly.
    pub fn get_notes_by_name(&self, name: &str) -> Result<Vec<Note>, NoteServiceError> {
        Ok(self.repo.find_notes_by_name(name)?)
    }

    /// Deletes one live note. Returns `false` when no live note matched.
    pub fn delete_note_by_id(&self, id: NoteId) -> Result<bool, NoteServiceError> {
        let deleted = self.repo.delete_note(id)?;
        info!(
            "event=note_delete module=service status={} note_id={}",
            if deleted { "ok" } else { "not_found" },
            id
        );
        Ok(deleted)
    }

    /// Overwrites name, description and deadline of a live note.
    ///
    /// `note.status == CLOSED` also closes the note. Any other status in
    /// `note` is ignored and the stored status is kept, so an edit made on a
    /// copy read before a deadline sweep does not undo `OVERDUE`.
    ///
    /// # Errors
    /// - `InvalidInput` when the name is blank.
    /// - `NotFound` when the note is absent or already deleted.
    pub fn update_note(&self, note: &Note) -> Result<Note, NoteServiceError> {
        match self.repo.update_note(note) {
            Ok(updated) => {
                info!(
                    "event=note_update module=service status=ok note_id={} note_status={}",
                    updated.id, updated.status
                );
                Ok(updated)
            }
            Err(err) => {
                warn!(
                    "event=note_update module=service status=error note_id={} error={}",
                    note.id, err
                );
                Err(err.into())
            }
        }
    }

    /// Marks one live note complete.
    pub fn close_note(&self, id: NoteId) -> Result<Note, NoteServiceError> {
        let closed = self.repo.close_note(id)?;
        info!(
            "event=note_close module=service status=ok note_id={}",
            closed.id
        );
        Ok(closed)
    }

    /// Moves every due `NEW` note to `OVERDUE` using the local wall clock.
    ///
    /// Returns the number of notes that changed status.
    pub fn check_deadlines(&self) -> Result<usize, NoteServiceError> {
        self.check_deadlines_at(Local::now().naive_local())
    }

    /// Same as `check_deadlines`, evaluated at `now`.
    pub fn check_deadlines_at(&self, now: NaiveDateTime) -> Result<usize, NoteServiceError> {
        let moved = self.repo.mark_overdue(now)?;
        if moved > 0 {
            info!("event=deadline_check module=service status=ok moved={moved}");
        } else {
            debug!("event=deadline_check module=service status=ok moved=0");
        }
        Ok(moved)
    }
}

/// Stable sort that moves `CLOSED` notes after every other note.
pub fn sort_closed_last(notes: &mut [Note]) {
    notes.sort_by_key(|note| note.status.is_closed());
}
