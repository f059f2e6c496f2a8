use std::io::BufRead;
use std::sync::mpsc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tally_app::session::{AppEvent, Session};
use tally_app::{Cli, Config, session};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let database_path = cli.database.unwrap_or(config.database_path);
    if let Some(parent) = database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let store = tally_store::Store::open(&database_path)
        .with_context(|| format!("failed to open {}", database_path.display()))?;
    let (entries, rate) = store.load().context("failed to load persisted state")?;
    let ledger = tally_core::Ledger::from_parts(entries, rate);

    let (tx, rx) = mpsc::channel::<AppEvent>();

    // Stdin reader; lines and clock ticks share one channel so all
    // mutation stays on the loop thread.
    let input_tx = tx.clone();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if input_tx.send(AppEvent::Line(line)).is_err() {
                return;
            }
        }
        let _ = input_tx.send(AppEvent::Eof);
    });

    let stdout = std::io::stdout();
    let mut session = Session::new(ledger, store, stdout.lock());
    println!("tally — type `help` for commands");
    session::run(&mut session, &rx, &tx)
}
