//! Interactive terminal host for the tally time tracker.

pub mod cli;
pub mod clock;
pub mod config;
pub mod render;
pub mod session;

pub use cli::Cli;
pub use config::Config;
