//! Completed time entries and duration arithmetic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{EntryId, ValidationError};

/// A completed, recorded span of work.
///
/// `duration_secs` and `cost` are derived fields: the duration comes from
/// the timer's tick count (or from the start/end pair on edit), and the
/// cost is always `duration / 3600 * rate` at the last recompute. Neither
/// is ever edited independently; mutation goes through the ledger, which
/// replaces the entry wholesale with both fields recomputed.
///
/// Serialized field names match the persisted shape (`startTime`,
/// `endTime`, `duration`, `cost`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    /// Unique identifier, assigned at creation and never reused.
    pub id: EntryId,
    /// Non-empty display title.
    pub title: String,
    /// When the work started.
    pub start_time: DateTime<Utc>,
    /// When the work ended. Always >= `start_time`.
    pub end_time: DateTime<Utc>,
    /// Elapsed whole seconds.
    #[serde(rename = "duration")]
    pub duration_secs: u64,
    /// Monetary cost at the rate of the last recompute.
    pub cost: f64,
}

/// Computes the whole-second duration between two instants.
///
/// Sub-second remainders are truncated. An end before the start is
/// rejected rather than clamped, so a negative duration can never enter
/// the ledger.
pub fn duration_between(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<u64, ValidationError> {
    let seconds = (end - start).num_seconds();
    u64::try_from(seconds).map_err(|_| ValidationError::EndBeforeStart { start, end })
}
