//! Command-line interface for the tempo coding-activity tracker.

mod cli;
pub mod commands;
mod config;
pub mod detect;
pub mod format;

pub use cli::{ApiArgs, Cli, Commands, TrackArgs};
pub use config::Config;
