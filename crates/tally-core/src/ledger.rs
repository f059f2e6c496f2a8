//! The entry ledger: the ordered collection of recorded entries and the
//! global hourly rate.
//!
//! All mutation of entries and the rate routes through this type, so the
//! cost invariant (`cost == duration / 3600 * rate` at the last
//! recompute) holds after every operation and the caller always sees a
//! fully-updated ledger, never a partially recomputed one.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::cost::cost;
use crate::entry::{TimeEntry, duration_between};
use crate::timer::Completion;
use crate::types::{EntryId, Rate, ValidationError};

/// Errors from ledger operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LedgerError {
    /// The referenced entry does not exist (stale reference).
    #[error("no entry with id {id}")]
    NotFound { id: EntryId },

    /// The supplied fields failed validation; nothing was mutated.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Ordered entries (newest first) plus the global hourly rate.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ledger {
    entries: Vec<TimeEntry>,
    rate: Rate,
}

impl Ledger {
    /// Creates a ledger from previously persisted state.
    #[must_use]
    pub const fn from_parts(entries: Vec<TimeEntry>, rate: Rate) -> Self {
        Self { entries, rate }
    }

    /// The entries, newest first.
    #[must_use]
    pub fn entries(&self) -> &[TimeEntry] {
        &self.entries
    }

    /// The current global hourly rate.
    #[must_use]
    pub const fn rate(&self) -> Rate {
        self.rate
    }

    /// Looks up an entry by id.
    #[must_use]
    pub fn get(&self, id: &EntryId) -> Option<&TimeEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    /// Inserts an entry at the head of the ledger.
    ///
    /// The caller guarantees the id is unique within the ledger.
    pub fn append(&mut self, entry: TimeEntry) {
        debug_assert!(
            self.get(&entry.id).is_none(),
            "duplicate entry id {}",
            entry.id
        );
        self.entries.insert(0, entry);
    }

    /// Records a timer completion as a new entry at the current rate.
    ///
    /// Returns the freshly appended entry.
    pub fn record(&mut self, completion: Completion) -> &TimeEntry {
        let entry = TimeEntry {
            id: EntryId::generate(),
            title: completion.title,
            start_time: completion.started_at,
            end_time: completion.ended_at,
            duration_secs: completion.duration_secs,
            cost: cost(completion.duration_secs, self.rate),
        };
        self.append(entry);
        &self.entries[0]
    }

    /// Replaces an entry's title and time span, recomputing its duration
    /// and cost.
    ///
    /// The duration is recomputed as whole seconds between the new pair,
    /// and the cost from that duration at the current rate. The entry
    /// keeps its position. On any error nothing is mutated.
    pub fn update(
        &mut self,
        id: &EntryId,
        title: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<&TimeEntry, LedgerError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::Empty { field: "title" }.into());
        }
        let duration_secs = duration_between(start, end)?;

        let entry = self
            .entries
            .iter_mut()
            .find(|entry| &entry.id == id)
            .ok_or_else(|| LedgerError::NotFound { id: id.clone() })?;

        entry.title = title.to_string();
        entry.start_time = start;
        entry.end_time = end;
        entry.duration_secs = duration_secs;
        entry.cost = cost(duration_secs, self.rate);
        Ok(entry)
    }

    /// Removes an entry by id.
    ///
    /// A stale id is silently ignored; the return value reports whether
    /// an entry was actually removed.
    pub fn delete(&mut self, id: &EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| &entry.id != id);
        before != self.entries.len()
    }

    /// Sets the global rate and recomputes every entry's cost.
    ///
    /// Durations are untouched. Idempotent for a given rate.
    pub fn set_rate(&mut self, rate: Rate) {
        self.rate = rate;
        for entry in &mut self.entries {
            entry.cost = cost(entry.duration_secs, rate);
        }
    }
}
