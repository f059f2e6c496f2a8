//! Interactive session: the single-threaded event loop that owns all
//! mutable state.
//!
//! The timer, ledger, and rate are only touched from this loop, fed by
//! one channel carrying both clock ticks and input lines. Every mutation
//! is mirrored to the store before the next prompt; a failed save is
//! logged and the in-memory ledger stays authoritative for the session.

use std::io::Write;
use std::sync::mpsc::{Receiver, Sender};

use anyhow::Result;
use chrono::{DateTime, Utc};

use tally_core::{EntryId, Ledger, Rate, Timer, project};
use tally_store::Store;

use crate::clock::Ticker;
use crate::render;

/// Events consumed by the session loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// One second elapsed on the clock source.
    Tick,
    /// A line of user input.
    Line(String),
    /// Input ended; the session should quit.
    Eof,
}

/// Whether the loop should keep running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Session state plus the output sink.
pub struct Session<W> {
    ledger: Ledger,
    timer: Timer,
    filter: String,
    store: Store,
    out: W,
}

impl<W: Write> Session<W> {
    /// Creates a session over previously loaded ledger state.
    pub const fn new(ledger: Ledger, store: Store, out: W) -> Self {
        Self {
            ledger,
            timer: Timer::new(),
            filter: String::new(),
            store,
            out,
        }
    }

    /// The current ledger state.
    #[must_use]
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// True while the timer is running.
    #[must_use]
    pub const fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Handles one event, returning whether the loop should continue.
    pub fn handle(&mut self, event: &AppEvent) -> Result<Flow> {
        match event {
            AppEvent::Tick => {
                self.timer.tick();
                if self.timer.is_running() {
                    write!(
                        self.out,
                        "\r  {}",
                        render::format_clock(self.timer.elapsed_secs())
                    )?;
                    self.out.flush()?;
                }
                Ok(Flow::Continue)
            }
            AppEvent::Line(line) => self.handle_line(line),
            AppEvent::Eof => self.quit(),
        }
    }

    fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }
        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(command, rest)| (command, rest.trim()));

        match command {
            "start" => self.cmd_start(rest)?,
            "stop" => self.cmd_stop()?,
            "rate" => self.cmd_rate(rest)?,
            "filter" => self.cmd_filter(rest)?,
            "list" | "ls" => self.cmd_list()?,
            "edit" => self.cmd_edit(rest)?,
            "delete" | "rm" => self.cmd_delete(rest)?,
            "status" => self.cmd_status()?,
            "help" | "?" => self.cmd_help()?,
            "quit" | "exit" | "q" => return self.quit(),
            other => writeln!(self.out, "unknown command: {other} (try `help`)")?,
        }
        Ok(Flow::Continue)
    }

    fn cmd_start(&mut self, title: &str) -> Result<()> {
        if self.timer.is_running() {
            writeln!(
                self.out,
                "timer already running for '{}'",
                self.timer.title().unwrap_or_default()
            )?;
            return Ok(());
        }
        match self.timer.arm(title, Utc::now()) {
            Ok(()) => writeln!(
                self.out,
                "timer started: {}",
                self.timer.title().unwrap_or_default()
            )?,
            Err(error) => writeln!(self.out, "error: {error}")?,
        }
        Ok(())
    }

    fn cmd_stop(&mut self) -> Result<()> {
        if !self.timer.is_running() {
            writeln!(self.out, "timer is not running")?;
            return Ok(());
        }
        match self.timer.stop(Utc::now()) {
            Some(completion) => {
                let entry = self.ledger.record(completion);
                writeln!(
                    self.out,
                    "\nrecorded '{}': {} at {}",
                    entry.title,
                    render::format_duration(entry.duration_secs),
                    render::format_cost(entry.cost),
                )?;
                self.persist()?;
            }
            None => writeln!(self.out, "\nnothing recorded (stopped before one second)")?,
        }
        Ok(())
    }

    fn cmd_rate(&mut self, value: &str) -> Result<()> {
        if value.is_empty() {
            writeln!(self.out, "hourly rate: {}", self.ledger.rate())?;
            return Ok(());
        }
        let Ok(parsed) = value.parse::<f64>() else {
            writeln!(self.out, "error: '{value}' is not a number")?;
            return Ok(());
        };
        match Rate::new(parsed) {
            Ok(rate) => {
                self.ledger.set_rate(rate);
                writeln!(self.out, "hourly rate set to {rate}, costs recomputed")?;
                self.persist()?;
            }
            Err(error) => writeln!(self.out, "error: {error}")?,
        }
        Ok(())
    }

    fn cmd_filter(&mut self, text: &str) -> Result<()> {
        self.filter = text.to_string();
        if self.filter.is_empty() {
            writeln!(self.out, "filter cleared")?;
        } else {
            writeln!(self.out, "filter set to '{}'", self.filter)?;
        }
        self.cmd_list()
    }

    fn cmd_list(&mut self) -> Result<()> {
        let projection = project(self.ledger.entries(), &self.filter);
        write!(self.out, "{}", render::render_table(&projection))?;
        Ok(())
    }

    fn cmd_edit(&mut self, args: &str) -> Result<()> {
        let mut parts = args.splitn(4, char::is_whitespace);
        let (Some(id), Some(start), Some(end), Some(title)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            writeln!(self.out, "usage: edit <id> <start> <end> <title>")?;
            return Ok(());
        };
        let Some(id) = self.resolve_id(id)? else {
            return Ok(());
        };
        let (Some(start), Some(end)) = (self.parse_instant(start)?, self.parse_instant(end)?)
        else {
            return Ok(());
        };

        match self.ledger.update(&id, title, start, end) {
            Ok(entry) => {
                writeln!(
                    self.out,
                    "updated '{}': {} at {}",
                    entry.title,
                    render::format_duration(entry.duration_secs),
                    render::format_cost(entry.cost),
                )?;
                self.persist()?;
            }
            Err(error) => writeln!(self.out, "error: {error}")?,
        }
        Ok(())
    }

    fn cmd_delete(&mut self, id: &str) -> Result<()> {
        if id.is_empty() {
            writeln!(self.out, "usage: delete <id>")?;
            return Ok(());
        }
        let Some(id) = self.resolve_id(id)? else {
            return Ok(());
        };
        // Stale ids are a silent no-op in the ledger; report either way.
        if self.ledger.delete(&id) {
            writeln!(self.out, "deleted {id}")?;
            self.persist()?;
        } else {
            writeln!(self.out, "no entry with id {id}")?;
        }
        Ok(())
    }

    fn cmd_status(&mut self) -> Result<()> {
        if self.timer.is_running() {
            writeln!(
                self.out,
                "running '{}' for {}",
                self.timer.title().unwrap_or_default(),
                render::format_clock(self.timer.elapsed_secs()),
            )?;
        } else {
            writeln!(self.out, "idle")?;
        }
        writeln!(
            self.out,
            "{} entries, hourly rate {}",
            self.ledger.entries().len(),
            self.ledger.rate(),
        )?;
        Ok(())
    }

    fn cmd_help(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "commands:\n  \
             start <title>                 arm the timer\n  \
             stop                          stop the timer and record an entry\n  \
             rate [value]                  show or set the hourly rate\n  \
             filter [text]                 filter entries by title\n  \
             list                          show filtered entries and totals\n  \
             edit <id> <start> <end> <title>  replace an entry (RFC 3339 times)\n  \
             delete <id>                   remove an entry\n  \
             status                        show timer state\n  \
             quit                          save and exit"
        )?;
        Ok(())
    }

    fn quit(&mut self) -> Result<Flow> {
        if self.timer.is_running() {
            writeln!(self.out, "timer was running; the open session is discarded")?;
        }
        self.persist()?;
        writeln!(self.out, "bye")?;
        Ok(Flow::Quit)
    }

    /// Resolves a full id or unambiguous prefix against the ledger.
    fn resolve_id(&mut self, text: &str) -> Result<Option<EntryId>> {
        let matches: Vec<&EntryId> = self
            .ledger
            .entries()
            .iter()
            .map(|entry| &entry.id)
            .filter(|id| id.as_str().starts_with(text))
            .collect();
        match matches.as_slice() {
            [] => {
                // Fall through with the raw id so stale full ids still hit
                // the ledger's own not-found/no-op handling.
                match EntryId::new(text) {
                    Ok(id) => Ok(Some(id)),
                    Err(error) => {
                        writeln!(self.out, "error: {error}")?;
                        Ok(None)
                    }
                }
            }
            [id] => Ok(Some((*id).clone())),
            _ => {
                writeln!(self.out, "id prefix '{text}' is ambiguous")?;
                Ok(None)
            }
        }
    }

    fn parse_instant(&mut self, text: &str) -> Result<Option<DateTime<Utc>>> {
        match text.parse::<DateTime<Utc>>() {
            Ok(instant) => Ok(Some(instant)),
            Err(_) => {
                writeln!(
                    self.out,
                    "error: '{text}' is not a valid RFC 3339 timestamp"
                )?;
                Ok(None)
            }
        }
    }

    /// Mirrors the ledger and rate to the store, best-effort.
    fn persist(&mut self) -> Result<()> {
        if let Err(error) = self
            .store
            .save(self.ledger.entries(), self.ledger.rate())
        {
            tracing::warn!(%error, "failed to persist state");
            writeln!(self.out, "warning: could not save: {error}")?;
        }
        Ok(())
    }
}

/// Runs the session loop until quit or EOF.
///
/// The ticker is acquired when the timer starts running and released as
/// soon as it stops, and unconditionally when this function returns.
pub fn run<W: Write>(
    session: &mut Session<W>,
    events: &Receiver<AppEvent>,
    tick_sink: &Sender<AppEvent>,
) -> Result<()> {
    let mut ticker: Option<Ticker> = None;
    loop {
        let Ok(event) = events.recv() else {
            // All producers disconnected; treat as end of input.
            session.handle(&AppEvent::Eof)?;
            break;
        };
        let flow = session.handle(&event)?;
        if session.timer_running() {
            if ticker.is_none() {
                ticker = Some(Ticker::start(tick_sink.clone()));
            }
        } else {
            ticker = None;
        }
        if flow == Flow::Quit {
            break;
        }
    }
    Ok(())
}
