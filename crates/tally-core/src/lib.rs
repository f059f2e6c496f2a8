//! Core domain logic for the tally time tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Timer: a tick-driven start/stop stopwatch
//! - Ledger: the ordered collection of recorded entries and the global rate
//! - Cost: deriving monetary cost from duration and hourly rate
//! - View: filtered projections of the ledger with aggregate totals
//!
//! The crate is pure: it owns no clock, performs no I/O, and leaves
//! persistence and presentation to its hosts. All state lives in a
//! [`Ledger`] and a [`Timer`] owned by the caller, and every mutation
//! routes through their methods.

mod cost;
mod entry;
mod ledger;
mod timer;
mod types;
mod view;

pub use cost::cost;
pub use entry::{TimeEntry, duration_between};
pub use ledger::{Ledger, LedgerError};
pub use timer::{Completion, Timer};
pub use types::{EntryId, Rate, ValidationError};
pub use view::{Projection, project};
