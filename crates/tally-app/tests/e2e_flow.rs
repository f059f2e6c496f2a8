//! End-to-end test for the complete tracking flow: timed session →
//! recorded entry → edit → rate change → delete, with state mirrored to
//! the store throughout.
//!
//! Clock ticks are injected as events, so no wall-clock time passes.

use tally_app::session::{AppEvent, Flow, Session};
use tally_core::{Ledger, Rate, project};
use tally_store::Store;

fn line(session: &mut Session<Vec<u8>>, text: &str) {
    let flow = session.handle(&AppEvent::Line(text.to_string())).unwrap();
    assert_eq!(flow, Flow::Continue);
}

fn tick(session: &mut Session<Vec<u8>>, count: usize) {
    for _ in 0..count {
        session.handle(&AppEvent::Tick).unwrap();
    }
}

#[test]
fn full_tracking_flow() {
    let temp = tempfile::tempdir().unwrap();
    let db_path = temp.path().join("tally.db");

    let store = Store::open(&db_path).unwrap();
    let (entries, rate) = store.load().unwrap();
    assert_eq!(rate, Rate::DEFAULT);
    let mut session = Session::new(Ledger::from_parts(entries, rate), store, Vec::new());

    // A 1h 1m 1s session at the default rate of 20.
    line(&mut session, "start Design review");
    tick(&mut session, 3661);
    line(&mut session, "stop");

    let entry = session.ledger().entries()[0].clone();
    assert_eq!(entry.title, "Design review");
    assert_eq!(entry.duration_secs, 3661);
    assert!((entry.cost - 3661.0 / 3600.0 * 20.0).abs() < 1e-9);

    // The stop was mirrored to disk immediately.
    {
        let mirror = Store::open(&db_path).unwrap();
        let (persisted, persisted_rate) = mirror.load().unwrap();
        assert_eq!(persisted, vec![entry.clone()]);
        assert_eq!(persisted_rate, Rate::DEFAULT);
    }

    // Push the end time out by exactly one hour; duration and cost follow.
    let new_end = entry.start_time + chrono::TimeDelta::seconds(7261);
    line(
        &mut session,
        &format!(
            "edit {} {} {} Design review",
            entry.id,
            entry.start_time.to_rfc3339(),
            new_end.to_rfc3339(),
        ),
    );
    let edited = session.ledger().entries()[0].clone();
    assert_eq!(edited.duration_secs, 7261);
    assert!((edited.cost - 7261.0 / 3600.0 * 20.0).abs() < 1e-9);

    // Raising the rate from 20 to 30 scales the cost without touching
    // the duration.
    line(&mut session, "rate 30");
    let repriced = session.ledger().entries()[0].clone();
    assert_eq!(repriced.duration_secs, 7261);
    assert!((repriced.cost - edited.cost * 30.0 / 20.0).abs() < 1e-9);

    // Deleting removes the entry from the ledger and from the totals.
    line(&mut session, &format!("delete {}", entry.id));
    assert!(session.ledger().entries().is_empty());
    let projection = project(session.ledger().entries(), "");
    assert_eq!(projection.total_duration_secs, 0);
    assert!(projection.total_cost.abs() < 1e-9);

    // Quit saves the final (empty) state and the raised rate.
    let flow = session.handle(&AppEvent::Eof).unwrap();
    assert_eq!(flow, Flow::Quit);
    drop(session);

    let store = Store::open(&db_path).unwrap();
    let (persisted, persisted_rate) = store.load().unwrap();
    assert!(persisted.is_empty());
    assert_eq!(persisted_rate, Rate::new(30.0).unwrap());
}

#[test]
fn state_survives_restart_in_ledger_order() {
    let temp = tempfile::tempdir().unwrap();
    let db_path = temp.path().join("tally.db");

    {
        let store = Store::open(&db_path).unwrap();
        let (entries, rate) = store.load().unwrap();
        let mut session = Session::new(Ledger::from_parts(entries, rate), store, Vec::new());
        for title in ["first task", "second task"] {
            line(&mut session, &format!("start {title}"));
            tick(&mut session, 60);
            line(&mut session, "stop");
        }
    }

    // A fresh session sees the same entries, newest first.
    let store = Store::open(&db_path).unwrap();
    let (entries, rate) = store.load().unwrap();
    let session = Session::new(Ledger::from_parts(entries, rate), store, Vec::new());

    let titles: Vec<_> = session
        .ledger()
        .entries()
        .iter()
        .map(|entry| entry.title.as_str())
        .collect();
    assert_eq!(titles, ["second task", "first task"]);
    assert_eq!(session.ledger().rate(), Rate::DEFAULT);
}
