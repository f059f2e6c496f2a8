//! Presentation formatting for the interactive session.
//!
//! Rounding to two decimals happens only here; stored costs keep full
//! precision. Timestamps render in UTC.

use chrono::{DateTime, Utc};

use tally_core::Projection;

/// Formats a live timer readout as `HH:MM:SS`.
#[must_use]
pub fn format_clock(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Formats a recorded duration as `Xh Ym`, truncating seconds.
#[must_use]
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    format!("{hours}h {minutes}m")
}

/// Formats a cost as `€N.NN`.
#[must_use]
pub fn format_cost(cost: f64) -> String {
    format!("€{cost:.2}")
}

/// Formats an instant for table display.
#[must_use]
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d %H:%M").to_string()
}

/// Length of the shortened entry id shown in tables.
const SHORT_ID_LEN: usize = 8;

/// Renders the filtered entries as a table with totals.
///
/// Entry ids are shortened to their first eight characters; commands
/// accept any unambiguous prefix.
#[must_use]
pub fn render_table(projection: &Projection<'_>) -> String {
    if projection.entries.is_empty() {
        return "No entries.\n".to_string();
    }

    let mut out = format!(
        "Total time: {}    Total earnings: {}\n\n",
        format_duration(projection.total_duration_secs),
        format_cost(projection.total_cost),
    );

    let title_width = projection
        .entries
        .iter()
        .map(|entry| entry.title.len())
        .chain(std::iter::once("TITLE".len()))
        .max()
        .unwrap_or(0);

    out.push_str(&format!(
        "{:<id$}  {:<title$}  {:<16}  {:<16}  {:<9}  COST\n",
        "ID",
        "TITLE",
        "START",
        "END",
        "DURATION",
        id = SHORT_ID_LEN,
        title = title_width,
    ));
    for entry in &projection.entries {
        let short_id: String = entry.id.as_str().chars().take(SHORT_ID_LEN).collect();
        out.push_str(&format!(
            "{:<id$}  {:<title$}  {:<16}  {:<16}  {:<9}  {}\n",
            short_id,
            entry.title,
            format_timestamp(entry.start_time),
            format_timestamp(entry.end_time),
            format_duration(entry.duration_secs),
            format_cost(entry.cost),
            id = SHORT_ID_LEN,
            title = title_width,
        ));
    }
    out
}
