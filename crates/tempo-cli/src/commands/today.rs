//! `tempo today` — today's activity only.

use anyhow::Result;

use crate::commands::stats;
use crate::Config;

/// A two-day window is enough for today plus the streak anchor.
const TODAY_WINDOW_DAYS: i64 = 2;

pub fn run(config: &Config) -> Result<()> {
    let report = stats::load_report(config, TODAY_WINDOW_DAYS)?;
    print!("{}", stats::render_today(&report));
    Ok(())
}
