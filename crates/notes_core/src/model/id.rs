//! Process-wide note identifier generation.
//!
//! # Invariants
//! - Every issued id is strictly greater than all ids issued before it.
//! - The counter starts at zero at process start and is never reset.

use crate::model::note::NoteId;
use std::sync::atomic::{AtomicU64, Ordering};

static GLOBAL_GENERATOR: NoteIdGenerator = NoteIdGenerator::new();

/// Monotonic id source backed by a single atomic counter.
#[derive(Debug, Default)]
pub struct NoteIdGenerator {
    last_issued: AtomicU64,
}

impl NoteIdGenerator {
    /// Creates a generator whose first id is `1`.
    pub const fn new() -> Self {
        Self {
            last_issued: AtomicU64::new(0),
        }
    }

    /// Returns the generator shared by every store in this process.
    pub fn global() -> &'static Self {
        &GLOBAL_GENERATOR
    }

    /// Issues the next id.
    ///
    /// The increment and read happen in one `fetch_add`, so concurrent
    /// callers never observe the same value.
    pub fn generate_id(&self) -> NoteId {
        NoteId::new(self.last_issued.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Returns the most recently issued id, or `None` before the first call.
    pub fn last_issued(&self) -> Option<NoteId> {
        match self.last_issued.load(Ordering::Relaxed) {
            0 => None,
            value => Some(NoteId::new(value)),
        }
    }
}
