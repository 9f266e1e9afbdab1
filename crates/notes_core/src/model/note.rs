//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record handed across the core boundary.
//! - Define the status state machine and deadline text format.
//!
//! # Invariants
//! - `id` is assigned once by the store and never changes.
//! - `name` must not be blank.
//! - `deadline` carries minute precision; seconds are always zero.
//! - `DELETED` is terminal and `CLOSED` only leads to `DELETED`.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Text format accepted and rendered for deadlines (`yyyy-MM-dd HH:mm`).
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Stable integer identifier of one note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(u64);

impl NoteId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle stage of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteStatus {
    /// Initial state of every created note.
    New,
    /// Marked complete by the user.
    Closed,
    /// Deadline elapsed while the note was still `New`.
    Overdue,
    /// Tombstone; invisible to every query.
    Deleted,
}

impl NoteStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Closed => "CLOSED",
            Self::Overdue => "OVERDUE",
            Self::Deleted => "DELETED",
        }
    }

    /// Returns whether notes in this status are visible to queries.
    pub fn is_live(self) -> bool {
        self != Self::Deleted
    }

    pub fn is_closed(self) -> bool {
        self == Self::Closed
    }

    /// Returns whether `self -> next` is an edge of the state machine.
    ///
    /// Staying in the same live status is not a transition and is accepted.
    pub fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Deleted, _) => false,
            (current, target) if current == target => true,
            (Self::New, Self::Overdue) | (Self::New, Self::Closed) => true,
            (Self::Overdue, Self::Closed) => true,
            (_, Self::Deleted) => true,
            _ => false,
        }
    }
}

impl Display for NoteStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteStatus {
    type Err = NoteStatusParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "NEW" => Ok(Self::New),
            "CLOSED" => Ok(Self::Closed),
            "OVERDUE" => Ok(Self::Overdue),
            "DELETED" => Ok(Self::Deleted),
            _ => Err(NoteStatusParseError(value.to_string())),
        }
    }
}

/// Unknown status text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteStatusParseError(pub String);

impl Display for NoteStatusParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown note status `{}`; expected NEW|CLOSED|OVERDUE|DELETED",
            self.0
        )
    }
}

impl Error for NoteStatusParseError {}

/// Validation failures for note content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Name is empty or whitespace only.
    BlankName,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "note name must not be blank"),
        }
    }
}

impl Error for NoteValidationError {}

/// Deadline text that does not match `DEADLINE_FORMAT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadlineParseError {
    pub input: String,
}

impl Display for DeadlineParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid deadline `{}`; expected format yyyy-MM-dd HH:mm",
            self.input
        )
    }
}

impl Error for DeadlineParseError {}

/// One user note.
///
/// Values of this type are always owned copies; mutating one never changes
/// store state until it is passed back through an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub name: String,
    pub description: String,
    /// Serialized in `DEADLINE_FORMAT`, `null` when absent.
    #[serde(with = "deadline_text")]
    pub deadline: Option<NaiveDateTime>,
    pub status: NoteStatus,
}

impl Note {
    /// Creates a `New` note with the given id.
    ///
    /// The deadline is truncated to whole minutes.
    pub fn new(
        id: NoteId,
        name: impl Into<String>,
        description: impl Into<String>,
        deadline: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            deadline: deadline.map(truncate_to_minute),
            status: NoteStatus::New,
        }
    }

    /// Validates user-controlled fields.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        validate_name(&self.name)
    }

    pub fn is_live(&self) -> bool {
        self.status.is_live()
    }

    /// Returns whether the deadline sweep should move this note to `Overdue`.
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        self.status == NoteStatus::New && self.deadline.is_some_and(|deadline| deadline <= now)
    }
}

/// Rejects blank names.
pub fn validate_name(name: &str) -> Result<(), NoteValidationError> {
    if name.trim().is_empty() {
        return Err(NoteValidationError::BlankName);
    }
    Ok(())
}

/// Parses deadline text in `DEADLINE_FORMAT`.
///
/// Blank input means "no deadline" and yields `Ok(None)`. Dates that do not
/// exist on the calendar (`2026-02-30`) are rejected, not clamped.
pub fn parse_deadline(input: &str) -> Result<Option<NaiveDateTime>, DeadlineParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDateTime::parse_from_str(trimmed, DEADLINE_FORMAT)
        .map(Some)
        .map_err(|_| DeadlineParseError {
            input: input.to_string(),
        })
}

/// Renders a deadline in `DEADLINE_FORMAT`.
pub fn format_deadline(deadline: &NaiveDateTime) -> String {
    deadline.format(DEADLINE_FORMAT).to_string()
}

/// Drops seconds and sub-second precision.
pub fn truncate_to_minute(value: NaiveDateTime) -> NaiveDateTime {
    value
        .with_second(0)
        .and_then(|value| value.with_nanosecond(0))
        .unwrap_or(value)
}

mod deadline_text {
    use super::{format_deadline, DEADLINE_FORMAT};
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(deadline) => serializer.serialize_some(&format_deadline(deadline)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => NaiveDateTime::parse_from_str(text.trim(), DEADLINE_FORMAT)
                .map(Some)
                .map_err(de::Error::custom),
            None => Ok(None),
        }
    }
}
