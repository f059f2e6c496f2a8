//! Start/stop stopwatch driven by an external one-second tick source.
//!
//! The timer itself owns no clock: the host arms it, feeds it one `tick`
//! per elapsed second while it runs, and stops it. Elapsed time is the
//! tick count, while the completion's `started_at`/`ended_at` are wall
//! clock instants captured at arm and stop. The two may disagree by
//! sub-second rounding; the tick count is authoritative for duration.

use chrono::{DateTime, Utc};

use crate::types::ValidationError;

/// Emitted exactly once per running→idle transition with elapsed time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// The title supplied when the timer was armed.
    pub title: String,
    /// Wall clock instant captured at arm time.
    pub started_at: DateTime<Utc>,
    /// Wall clock instant captured at stop time.
    pub ended_at: DateTime<Utc>,
    /// Number of ticks observed while running.
    pub duration_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Idle,
    Running {
        title: String,
        started_at: DateTime<Utc>,
        elapsed_secs: u64,
    },
}

/// Single-purpose stopwatch with two states, `Idle` and `Running`.
///
/// Session state is transient: it is never persisted, and every stop
/// resets the elapsed count to zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    state: State,
}

impl Timer {
    /// Creates an idle timer.
    #[must_use]
    pub const fn new() -> Self {
        Self { state: State::Idle }
    }

    /// Returns true while the timer is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, State::Running { .. })
    }

    /// Seconds elapsed in the current run, or 0 when idle.
    #[must_use]
    pub const fn elapsed_secs(&self) -> u64 {
        match self.state {
            State::Idle => 0,
            State::Running { elapsed_secs, .. } => elapsed_secs,
        }
    }

    /// The title of the current run, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match &self.state {
            State::Idle => None,
            State::Running { title, .. } => Some(title),
        }
    }

    /// Arms the timer, capturing `now` as the run's start instant.
    ///
    /// Fails with [`ValidationError::Empty`] when the trimmed title is
    /// empty, leaving the state untouched. Arming an already-running
    /// timer is a no-op.
    pub fn arm(&mut self, title: &str, now: DateTime<Utc>) -> Result<(), ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }
        if self.is_running() {
            return Ok(());
        }
        self.state = State::Running {
            title: title.to_string(),
            started_at: now,
            elapsed_secs: 0,
        };
        Ok(())
    }

    /// Advances the elapsed count by one second.
    ///
    /// Ticks arriving while idle are stale (the tick source is cancelled
    /// asynchronously) and are ignored.
    pub fn tick(&mut self) {
        if let State::Running { elapsed_secs, .. } = &mut self.state {
            *elapsed_secs += 1;
        }
    }

    /// Stops the timer, capturing `now` as the run's end instant.
    ///
    /// Returns `Some(Completion)` exactly once when at least one tick was
    /// observed; a run stopped before its first tick completes silently.
    /// Always leaves the timer idle with elapsed reset to zero.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Option<Completion> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle
            | State::Running {
                elapsed_secs: 0, ..
            } => None,
            State::Running {
                title,
                started_at,
                elapsed_secs,
            } => Some(Completion {
                title,
                started_at,
                ended_at: now,
                duration_secs: elapsed_secs,
            }),
        }
    }

    /// Flips between idle and running.
    ///
    /// From idle this arms with `title`; from running it stops, and the
    /// returned completion (if any) should be recorded by the caller.
    pub fn toggle(
        &mut self,
        title: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Completion>, ValidationError> {
        if self.is_running() {
            Ok(self.stop(now))
        } else {
            self.arm(title, now)?;
            Ok(None)
        }
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant() -> DateTime<Utc> {
        "2025-03-01T09:00:00Z".parse().unwrap()
    }

    #[test]
    fn arm_rejects_empty_title_and_stays_idle() {
        let mut timer = Timer::new();
        assert_eq!(
            timer.arm("", instant()),
            Err(ValidationError::Empty { field: "title" })
        );
        assert_eq!(
            timer.arm("   ", instant()),
            Err(ValidationError::Empty { field: "title" })
        );
        assert!(!timer.is_running());
        assert_eq!(timer.elapsed_secs(), 0);
    }

    #[test]
    fn five_ticks_complete_with_five_seconds() {
        let mut timer = Timer::new();
        timer.arm("Design review", instant()).unwrap();
        for _ in 0..5 {
            timer.tick();
        }

        let ended = instant() + chrono::TimeDelta::seconds(5);
        let completion = timer.stop(ended).unwrap();
        assert_eq!(completion.title, "Design review");
        assert_eq!(completion.started_at, instant());
        assert_eq!(completion.ended_at, ended);
        assert_eq!(completion.duration_secs, 5);

        assert!(!timer.is_running());
        assert_eq!(timer.elapsed_secs(), 0);
    }

    #[test]
    fn immediate_stop_emits_no_completion() {
        let mut timer = Timer::new();
        timer.arm("quick", instant()).unwrap();
        assert_eq!(timer.stop(instant()), None);
        assert!(!timer.is_running());
    }

    #[test]
    fn stop_while_idle_emits_nothing() {
        let mut timer = Timer::new();
        assert_eq!(timer.stop(instant()), None);
    }

    #[test]
    fn stale_tick_after_stop_is_ignored() {
        let mut timer = Timer::new();
        timer.arm("work", instant()).unwrap();
        timer.tick();
        timer.stop(instant()).unwrap();

        timer.tick();
        assert_eq!(timer.elapsed_secs(), 0);
        assert_eq!(timer.stop(instant()), None);
    }

    #[test]
    fn arm_while_running_is_a_noop() {
        let mut timer = Timer::new();
        timer.arm("first", instant()).unwrap();
        timer.tick();
        timer.arm("second", instant()).unwrap();

        assert_eq!(timer.title(), Some("first"));
        assert_eq!(timer.elapsed_secs(), 1);
    }

    #[test]
    fn toggle_cycles_between_states() {
        let mut timer = Timer::new();
        assert_eq!(timer.toggle("task", instant()).unwrap(), None);
        assert!(timer.is_running());

        timer.tick();
        let completion = timer.toggle("task", instant()).unwrap().unwrap();
        assert_eq!(completion.duration_secs, 1);
        assert!(!timer.is_running());
    }

    #[test]
    fn title_is_trimmed_on_arm() {
        let mut timer = Timer::new();
        timer.arm("  padded title  ", instant()).unwrap();
        assert_eq!(timer.title(), Some("padded title"));
    }
}
