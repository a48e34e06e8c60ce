//! `tempo projects` — project breakdown.

use std::fmt::Write;

use anyhow::Result;

use crate::commands::stats;
use crate::format::format_duration;
use crate::Config;

const PROJECTS_WINDOW_DAYS: i64 = 90;

pub fn run(config: &Config) -> Result<()> {
    let report = stats::load_report(config, PROJECTS_WINDOW_DAYS)?;

    let mut out = String::new();
    writeln!(out, "PROJECTS (last {PROJECTS_WINDOW_DAYS} days)").unwrap();
    writeln!(out, "───────────────────────").unwrap();

    if report.all_time.projects.is_empty() {
        writeln!(out).unwrap();
        writeln!(out, "No projects tracked yet.").unwrap();
        print!("{out}");
        return Ok(());
    }

    for (i, project) in report.all_time.projects.iter().take(10).enumerate() {
        writeln!(out).unwrap();
        writeln!(out, "{}. {}", i + 1, project.name).unwrap();
        writeln!(out, "   Time:     {}", format_duration(project.time)).unwrap();
        writeln!(out, "   Lines:    {}", project.lines).unwrap();
        writeln!(out, "   Files:    {}", project.files).unwrap();
        writeln!(out, "   Language: {}", project.main_lang).unwrap();
    }
    print!("{out}");
    Ok(())
}
