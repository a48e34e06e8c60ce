//! `tempo api` — emit the full report as JSON.

use anyhow::{Context, Result};
use chrono::Local;
use tempo_core::{CalculateOptions, Calculator, ReportCache};

use crate::cli::ApiArgs;
use crate::{commands, Config};

pub fn run(config: &Config, args: &ApiArgs) -> Result<()> {
    let db = commands::open_database(config)?;
    let calculator = Calculator::new(Local);
    let cache = ReportCache::default();
    let opts = CalculateOptions {
        load_recent_days: args.days.unwrap_or(config.lookback_days),
    };

    let report = calculator
        .calculate(&db, &cache, opts)
        .context("failed to calculate statistics")?;

    let output = if args.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{output}");
    Ok(())
}
