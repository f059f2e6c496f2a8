//! Scoped one-second tick source.
//!
//! The ticker is acquired when the timer is armed and dropped when it
//! stops or the session tears down. Dropping the handle signals the
//! background thread and joins it, so no tick fires after teardown. A
//! tick already queued in the event channel at stop time is delivered to
//! an idle timer, which ignores it.

use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::session::AppEvent;

/// Handle to a running tick thread. The thread stops when this drops.
pub struct Ticker {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawns a thread emitting [`AppEvent::Tick`] once per second into
    /// `events` until the returned handle is dropped.
    #[must_use]
    pub fn start(events: Sender<AppEvent>) -> Self {
        let (stop_tx, stop_rx) = channel::<()>();
        let handle = std::thread::spawn(move || tick_loop(&stop_rx, &events));
        tracing::debug!("tick source started");
        Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        }
    }
}

fn tick_loop(stop: &Receiver<()>, events: &Sender<AppEvent>) {
    loop {
        match stop.recv_timeout(Duration::from_secs(1)) {
            // The stop channel only ever disconnects or signals; either ends the loop.
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                if events.send(AppEvent::Tick).is_err() {
                    break;
                }
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        drop(self.stop.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        tracing::debug!("tick source stopped");
    }
}
