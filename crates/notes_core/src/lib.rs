//! Core domain logic for the notes store.
//! This crate is the single source of truth for note invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod monitor;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig, DEFAULT_DEADLINE_CHECK_INTERVAL};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::id::NoteIdGenerator;
pub use model::note::{
    format_deadline, parse_deadline, DeadlineParseError, Note, NoteId, NoteStatus,
    NoteStatusParseError, NoteValidationError, DEADLINE_FORMAT,
};
pub use monitor::deadline_monitor::{DeadlineMonitor, DeadlineMonitorError, DeadlineSweeper};
pub use repo::note_repo::{InMemoryNoteRepository, NewNote, NoteRepository, RepoError, RepoResult};
pub use service::note_service::{sort_closed_last, NoteService, NoteServiceError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
