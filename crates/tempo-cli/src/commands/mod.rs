//! Subcommand implementations.

pub mod api;
pub mod info;
pub mod optimize;
pub mod projects;
pub mod rebuild;
pub mod stats;
pub mod today;
pub mod track;

use anyhow::{Context, Result};
use chrono::Local;
use tempo_db::Database;

use crate::Config;

/// Opens the configured database with the local UTC offset for rollup days.
pub fn open_database(config: &Config) -> Result<Database> {
    let offset = *Local::now().offset();
    Database::open_with_offset(&config.database_path, offset).with_context(|| {
        format!(
            "failed to open database at {}",
            config.database_path.display()
        )
    })
}
