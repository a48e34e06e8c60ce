//! `tempo stats` — pretty-printed overview.

use std::fmt::Write;

use anyhow::{Context, Result};
use chrono::Local;
use tempo_core::{AllReport, CalculateOptions, Calculator, ReportCache};

use crate::format::format_duration;
use crate::{commands, Config};

pub fn run(config: &Config, today_only: bool) -> Result<()> {
    let report = load_report(config, config.lookback_days)?;
    if today_only {
        print!("{}", render_today(&report));
    } else {
        print!("{}", render_overview(&report));
    }
    Ok(())
}

pub(crate) fn load_report(config: &Config, days: i64) -> Result<AllReport> {
    let db = commands::open_database(config)?;
    let calculator = Calculator::new(Local);
    let cache = ReportCache::default();
    calculator
        .calculate(&db, &cache, CalculateOptions { load_recent_days: days })
        .context("failed to calculate statistics")
}

pub(crate) fn render_overview(report: &AllReport) -> String {
    let mut out = String::new();
    writeln!(out, "TEMPO STATISTICS").unwrap();
    writeln!(out, "────────────────").unwrap();

    if report.all_time.total_time == 0.0 {
        writeln!(out).unwrap();
        writeln!(out, "No activity tracked yet.").unwrap();
        writeln!(out).unwrap();
        writeln!(out, "Hint: wire your editor to 'tempo track'.").unwrap();
        return out;
    }

    writeln!(out).unwrap();
    writeln!(out, "Overview").unwrap();
    writeln!(
        out,
        "  Today:      {} ({} lines)",
        format_duration(report.today.total_time),
        report.today.total_lines
    )
    .unwrap();
    writeln!(
        out,
        "  This week:  {} ({} lines)",
        format_duration(report.this_week.total_time),
        report.this_week.total_lines
    )
    .unwrap();
    writeln!(
        out,
        "  All time:   {} ({} lines)",
        format_duration(report.all_time.total_time),
        report.all_time.total_lines
    )
    .unwrap();

    if report.streak_info.current > 0 {
        writeln!(out).unwrap();
        writeln!(out, "Streak").unwrap();
        writeln!(out, "  Current: {} days", report.streak_info.current).unwrap();
        writeln!(out, "  Longest: {} days", report.streak_info.longest).unwrap();
        if report.streak_info.is_active {
            writeln!(out, "  Active today").unwrap();
        }
    }

    if !report.all_time.languages.is_empty() {
        writeln!(out).unwrap();
        writeln!(out, "Top languages (all time)").unwrap();
        for lang in report.all_time.languages.iter().take(5) {
            writeln!(
                out,
                "  {:<15} {:>8}  [{}]",
                lang.name,
                format_duration(lang.time),
                lang.proficiency
            )
            .unwrap();
        }
    }

    if !report.all_time.projects.is_empty() {
        writeln!(out).unwrap();
        writeln!(out, "Top projects (all time)").unwrap();
        for project in report.all_time.projects.iter().take(5) {
            writeln!(
                out,
                "  {:<20} {:>8}  ({})",
                project.name,
                format_duration(project.time),
                project.main_lang
            )
            .unwrap();
        }
    }

    let unlocked = report.achievements.iter().filter(|a| a.unlocked).count();
    if unlocked > 0 {
        writeln!(out).unwrap();
        writeln!(
            out,
            "Achievements: {unlocked}/{} unlocked",
            report.achievements.len()
        )
        .unwrap();
        for achievement in report.achievements.iter().filter(|a| a.unlocked).take(3) {
            writeln!(out, "  {} {}", achievement.icon, achievement.name).unwrap();
        }
    }

    writeln!(out).unwrap();
    writeln!(
        out,
        "Query: {:.0}ms ({}/{} activities, {})",
        report.meta.query_time_ms,
        report.meta.loaded_activities,
        report.meta.total_activities,
        report.meta.data_window
    )
    .unwrap();
    out
}

pub(crate) fn render_today(report: &AllReport) -> String {
    let today = &report.today;
    let mut out = String::new();
    writeln!(out, "TODAY").unwrap();
    writeln!(out, "─────").unwrap();

    if today.total_time == 0.0 {
        writeln!(out).unwrap();
        writeln!(out, "No activity tracked yet today.").unwrap();
        return out;
    }

    writeln!(out).unwrap();
    writeln!(out, "  Time:  {}", format_duration(today.total_time)).unwrap();
    writeln!(out, "  Lines: {}", today.total_lines).unwrap();
    if today.session_count > 0 {
        writeln!(
            out,
            "  Sessions: {} (focus {})",
            today.session_count, today.focus_score
        )
        .unwrap();
    }

    if !today.languages.is_empty() {
        writeln!(out).unwrap();
        writeln!(out, "  Languages:").unwrap();
        for lang in today.languages.iter().take(5) {
            writeln!(
                out,
                "    {:<15} {:>8} ({:.1}%)",
                lang.name,
                format_duration(lang.time),
                lang.percent_total
            )
            .unwrap();
        }
    }

    if !today.projects.is_empty() {
        writeln!(out).unwrap();
        writeln!(out, "  Projects:").unwrap();
        for project in today.projects.iter().take(5) {
            writeln!(
                out,
                "    {:<15} {:>8}",
                project.name,
                format_duration(project.time)
            )
            .unwrap();
        }
    }

    if let Some(goals) = &today.daily_goals {
        writeln!(out).unwrap();
        writeln!(out, "  Daily goals:").unwrap();
        writeln!(
            out,
            "    Time:  {:.1}% of {}",
            goals.time_progress,
            format_duration(goals.time_goal)
        )
        .unwrap();
        writeln!(
            out,
            "    Lines: {:.1}% of {}",
            goals.lines_progress, goals.lines_goal
        )
        .unwrap();
        if goals.on_track {
            writeln!(out, "    On track").unwrap();
        }
    }

    out
}
