//! `tempo optimize` — database maintenance.

use std::time::Instant;

use anyhow::{Context, Result};
use tempo_core::Store;

use crate::{commands, Config};

pub fn run(config: &Config) -> Result<()> {
    let mut db = commands::open_database(config)?;

    let started = Instant::now();
    db.optimize().context("failed to optimize database")?;

    println!(
        "Database optimized in {:.2}s (rebuilt indexes, reclaimed space)",
        started.elapsed().as_secs_f64()
    );
    Ok(())
}
