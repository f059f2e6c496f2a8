//! Read-only filtered projection of the ledger for display.

use crate::entry::TimeEntry;

/// A filtered view of the ledger with aggregate totals.
///
/// Totals cover exactly the filtered subset, not the whole ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection<'a> {
    /// Matching entries in ledger order.
    pub entries: Vec<&'a TimeEntry>,
    /// Sum of durations over the matching entries, in seconds.
    pub total_duration_secs: u64,
    /// Sum of costs over the matching entries.
    pub total_cost: f64,
}

/// Projects the entries whose title contains `filter` as a
/// case-insensitive substring.
///
/// An empty filter matches everything. Pure and re-derived on every
/// call; ledger order is preserved.
#[must_use]
pub fn project<'a>(entries: &'a [TimeEntry], filter: &str) -> Projection<'a> {
    let needle = filter.to_lowercase();
    let entries: Vec<&TimeEntry> = entries
        .iter()
        .filter(|entry| entry.title.to_lowercase().contains(&needle))
        .collect();

    let total_duration_secs = entries.iter().map(|entry| entry.duration_secs).sum();
    let total_cost = entries.iter().map(|entry| entry.cost).sum();

    Projection {
        entries,
        total_duration_secs,
        total_cost,
    }
}
