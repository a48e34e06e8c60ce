//! `tempo info` — database information.

use anyhow::{Context, Result};
use tempo_core::Store;

use crate::{commands, Config};

pub fn run(config: &Config) -> Result<()> {
    let db = commands::open_database(config)?;
    let count = db.activity_count().context("failed to count activities")?;
    let size = std::fs::metadata(&config.database_path)
        .map(|meta| meta.len())
        .unwrap_or(0);

    println!("Database information");
    println!("  Location:   {}", config.database_path.display());
    println!("  Activities: {count}");
    println!("  Size:       {:.2} MB", size as f64 / (1024.0 * 1024.0));
    if count > 0 {
        println!("  Avg/row:    {:.2} KB", size as f64 / count as f64 / 1024.0);
    }
    println!();
    println!("Tip: run 'tempo optimize' monthly to maintain performance");
    Ok(())
}
