//! `tempo rebuild-summaries` — replay the event log into the rollup tables.

use std::time::Instant;

use anyhow::{Context, Result};
use tempo_core::Store;

use crate::{commands, Config};

pub fn run(config: &Config) -> Result<()> {
    let mut db = commands::open_database(config)?;

    let started = Instant::now();
    db.rebuild_rollups()
        .context("failed to rebuild summary tables")?;

    println!(
        "Summary tables rebuilt in {:.2}s",
        started.elapsed().as_secs_f64()
    );
    println!("  daily_summary");
    println!("  daily_language_summary");
    println!("  daily_project_summary");
    println!("  daily_editor_summary");
    Ok(())
}
