//! Note repository contract and in-memory implementation.
//!
//! # Responsibility
//! - Provide CRUD and deadline-sweep APIs over one note collection.
//! - Hand out owned snapshots only; no caller ever aliases stored notes.
//!
//! # Invariants
//! - Deleting moves a note to `DELETED` and removes it from the collection
//!   under the same write lock; readers never see a deleted note.
//! - Every status write goes through `apply_transition` under the write lock.
//! - A deleted note cannot be updated back to life; delete wins.
//! - `update_note` only drives the `CLOSED` edge; any other requested status
//!   keeps the stored one so field edits survive a concurrent sweep.

use crate::model::id::NoteIdGenerator;
use crate::model::note::{
    truncate_to_minute, validate_name, Note, NoteId, NoteStatus, NoteValidationError,
};
use chrono::NaiveDateTime;
use parking_lot::RwLock;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    Validation(NoteValidationError),
    NotFound(NoteId),
    InvalidStatusTransition { from: NoteStatus, to: NoteStatus },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidStatusTransition { from, to } => {
                write!(f, "invalid status transition: {from} -> {to}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidStatusTransition { .. } => None,
        }
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Input for note creation; the id and status are assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewNote {
    pub name: String,
    pub description: String,
    pub deadline: Option<NaiveDateTime>,
}

impl NewNote {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: NaiveDateTime) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Repository interface for note CRUD and deadline evaluation.
pub trait NoteRepository {
    /// Creates one `New` note and returns a copy including its id.
    fn create_note(&self, draft: NewNote) -> RepoResult<Note>;
    /// Lists live notes in insertion order.
    fn list_notes(&self) -> RepoResult<Vec<Note>>;
    /// Gets one live note by id.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Lists live notes whose name equals `name` exactly, in insertion order.
    fn find_notes_by_name(&self, name: &str) -> RepoResult<Vec<Note>>;
    /// Marks one live note `Deleted` and drops it. Returns `false` when none matched.
    fn delete_note(&self, id: NoteId) -> RepoResult<bool>;
    /// Overwrites name, description and deadline of a live note.
    ///
    /// A requested `Closed` status closes the note; other status values
    /// leave the stored status untouched.
    fn update_note(&self, note: &Note) -> RepoResult<Note>;
    /// Moves one live note to `Closed`.
    fn close_note(&self, id: NoteId) -> RepoResult<Note>;
    /// Moves every due `New` note to `Overdue`; returns how many moved.
    fn mark_overdue(&self, now: NaiveDateTime) -> RepoResult<usize>;
}

/// Lock-guarded in-memory note collection.
pub struct InMemoryNoteRepository {
    ids: &'static NoteIdGenerator,
    notes: RwLock<Vec<Note>>,
}

impl Default for InMemoryNoteRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryNoteRepository {
    /// Creates an empty store drawing ids from the process-wide generator.
    pub fn new() -> Self {
        Self::with_id_generator(NoteIdGenerator::global())
    }

    /// Creates an empty store drawing ids from `ids`.
    pub fn with_id_generator(ids: &'static NoteIdGenerator) -> Self {
        Self {
            ids,
            notes: RwLock::new(Vec::new()),
        }
    }

    /// Number of live notes.
    pub fn live_count(&self) -> usize {
        self.notes.read().len()
    }
}

impl NoteRepository for InMemoryNoteRepository {
    fn create_note(&self, draft: NewNote) -> RepoResult<Note> {
        let NewNote {
            name,
            description,
            deadline,
        } = draft;

        validate_name(&name)?;

        let mut notes = self.notes.write();
        // Issued under the write lock so insertion order matches id order.
        let note = Note::new(self.ids.generate_id(), name, description, deadline);
        notes.push(note.clone());
        Ok(note)
    }

    fn list_notes(&self) -> RepoResult<Vec<Note>> {
        Ok(self
            .notes
            .read()
            .iter()
            .filter(|note| note.is_live())
            .cloned()
            .collect())
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        Ok(self
            .notes
            .read()
            .iter()
            .find(|note| note.id == id && note.is_live())
            .cloned())
    }

    fn find_notes_by_name(&self, name: &str) -> RepoResult<Vec<Note>> {
        Ok(self
            .notes
            .read()
            .iter()
            .filter(|note| note.is_live() && note.name == name)
            .cloned()
            .collect())
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<bool> {
        let mut notes = self.notes.write();
        let Some(index) = notes.iter().position(|note| note.id == id && note.is_live()) else {
            return Ok(false);
        };
        apply_transition(&mut notes[index], NoteStatus::Deleted)?;
        notes.remove(index);
        Ok(true)
    }

    fn update_note(&self, note: &Note) -> RepoResult<Note> {
        note.validate()?;

        let mut notes = self.notes.write();
        let stored = find_live_mut(&mut notes, note.id)?;
        // `Overdue` and `Deleted` belong to the sweep and to delete; a stale
        // copy that still says `New` must not undo the sweep.
        if note.status == NoteStatus::Closed {
            apply_transition(stored, NoteStatus::Closed)?;
        }
        overwrite_fields(stored, note);
        Ok(stored.clone())
    }

    fn close_note(&self, id: NoteId) -> RepoResult<Note> {
        let mut notes = self.notes.write();
        let stored = find_live_mut(&mut notes, id)?;
        apply_transition(stored, NoteStatus::Closed)?;
        Ok(stored.clone())
    }

    fn mark_overdue(&self, now: NaiveDateTime) -> RepoResult<usize> {
        let mut notes = self.notes.write();
        let mut moved = 0;
        for note in notes.iter_mut().filter(|note| note.is_due(now)) {
            // A note that cannot move is skipped; the sweep keeps going.
            if apply_transition(note, NoteStatus::Overdue).is_ok() {
                moved += 1;
            }
        }
        Ok(moved)
    }
}

fn find_live_mut(notes: &mut [Note], id: NoteId) -> RepoResult<&mut Note> {
    notes
        .iter_mut()
        .find(|note| note.id == id && note.is_live())
        .ok_or(RepoError::NotFound(id))
}

fn overwrite_fields(stored: &mut Note, source: &Note) {
    stored.name = source.name.clone();
    stored.description = source.description.clone();
    stored.deadline = source.deadline.map(truncate_to_minute);
}

/// Single mutation point for `Note::status`.
fn apply_transition(note: &mut Note, next: NoteStatus) -> RepoResult<()> {
    if !note.status.can_transition_to(next) {
        return Err(RepoError::InvalidStatusTransition {
            from: note.status,
            to: next,
        });
    }
    note.status = next;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{apply_transition, InMemoryNoteRepository, NewNote, NoteRepository, RepoError};
    use crate::model::note::{Note, NoteId, NoteStatus};
    use chrono::NaiveDate;

    #[test]
    fn apply_transition_rejects_leaving_closed() {
        let mut note = Note::new(NoteId::new(1), "a", "", None);
        apply_transition(&mut note, NoteStatus::Closed).unwrap();

        let err = apply_transition(&mut note, NoteStatus::New).unwrap_err();
        assert_eq!(
            err,
            RepoError::InvalidStatusTransition {
                from: NoteStatus::Closed,
                to: NoteStatus::New,
            }
        );
        assert_eq!(note.status, NoteStatus::Closed);
    }

    #[test]
    fn mark_overdue_only_touches_due_new_notes() {
        let repo = InMemoryNoteRepository::new();
        let noon = NaiveDate::from_ymd_opt(2026, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let early = noon - chrono::Duration::minutes(5);
        let late = noon + chrono::Duration::minutes(5);

        let due = repo
            .create_note(NewNote::new("due", "").with_deadline(early))
            .unwrap();
        let exact = repo
            .create_note(NewNote::new("exact", "").with_deadline(noon))
            .unwrap();
        let future = repo
            .create_note(NewNote::new("future", "").with_deadline(late))
            .unwrap();
        let undated = repo.create_note(NewNote::new("undated", "")).unwrap();
        let closed = repo
            .create_note(NewNote::new("closed", "").with_deadline(early))
            .unwrap();
        repo.close_note(closed.id).unwrap();

        assert_eq!(repo.mark_overdue(noon).unwrap(), 2);
        let status_of = |id| repo.get_note(id).unwrap().unwrap().status;
        assert_eq!(status_of(due.id), NoteStatus::Overdue);
        assert_eq!(status_of(exact.id), NoteStatus::Overdue);
        assert_eq!(status_of(future.id), NoteStatus::New);
        assert_eq!(status_of(undated.id), NoteStatus::New);
        assert_eq!(status_of(closed.id), NoteStatus::Closed);

        // second pass finds nothing new
        assert_eq!(repo.mark_overdue(noon).unwrap(), 0);
    }

    #[test]
    fn returned_snapshots_do_not_alias_store() {
        let repo = InMemoryNoteRepository::new();
        let created = repo.create_note(NewNote::new("keep", "body")).unwrap();

        let mut listed = repo.list_notes().unwrap();
        listed[0].name = "mutated".to_string();
        listed.clear();

        let stored = repo.get_note(created.id).unwrap().unwrap();
        assert_eq!(stored.name, "keep");
        assert_eq!(repo.live_count(), 1);
    }

    #[test]
    fn delete_drops_note_from_collection() {
        let repo = InMemoryNoteRepository::new();
        let gone = repo.create_note(NewNote::new("gone", "")).unwrap();
        let kept = repo.create_note(NewNote::new("kept", "")).unwrap();

        assert!(repo.delete_note(gone.id).unwrap());
        assert_eq!(repo.live_count(), 1);
        assert_eq!(repo.notes.read()[0].id, kept.id);
        assert!(!repo.delete_note(gone.id).unwrap());
    }

    #[test]
    fn stale_copy_update_keeps_overdue_and_applies_edits() {
        let repo = InMemoryNoteRepository::new();
        let nine = NaiveDate::from_ymd_opt(2026, 5, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let created = repo
            .create_note(NewNote::new("task", "old").with_deadline(nine))
            .unwrap();

        let mut copy = repo.get_note(created.id).unwrap().unwrap();
        copy.description = "new".to_string();
        assert_eq!(repo.mark_overdue(nine + chrono::Duration::minutes(1)).unwrap(), 1);

        let updated = repo.update_note(&copy).unwrap();
        assert_eq!(updated.status, NoteStatus::Overdue);
        assert_eq!(updated.description, "new");
    }
}
