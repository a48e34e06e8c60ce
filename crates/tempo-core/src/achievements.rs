//! Achievement rules and their evaluation.
//!
//! Rules are a fixed table of tagged variants; evaluation is a single match
//! against all-time figures. Output preserves table order.

use serde::Serialize;

use crate::classifier;
use crate::period::PeriodReport;
use crate::streak::StreakInfo;

/// The condition a rule checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleKind {
    /// Current or longest streak reaches the threshold in days.
    Streak { threshold: u32 },
    /// All-time lines written reach the threshold.
    Lines { threshold: i64 },
    /// All-time tracked seconds reach the threshold.
    Hours { threshold: f64 },
    /// Distinct code languages in the all-time list reach the threshold.
    Languages { threshold: usize },
    /// Any activity in one of the listed local hours.
    Habit { hours: &'static [u32] },
    /// Any single session lasting at least this many seconds.
    Session { min_duration: f64 },
}

/// One achievement definition.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub kind: RuleKind,
}

/// The full rule table, in display order.
pub const RULES: &[Rule] = &[
    Rule {
        id: "streak_5",
        name: "5-Day Fire",
        description: "Code for 5 days in a row",
        icon: "🔥",
        kind: RuleKind::Streak { threshold: 5 },
    },
    Rule {
        id: "streak_30",
        name: "30-Day Streak",
        description: "Code consistently for 30 days",
        icon: "🧨",
        kind: RuleKind::Streak { threshold: 30 },
    },
    Rule {
        id: "streak_90",
        name: "90-Day Inferno",
        description: "Maintain a 90-day coding streak",
        icon: "💥",
        kind: RuleKind::Streak { threshold: 90 },
    },
    Rule {
        id: "streak_180",
        name: "180-Day Blaze",
        description: "Code for 180 consecutive days",
        icon: "🌋",
        kind: RuleKind::Streak { threshold: 180 },
    },
    Rule {
        id: "streak_365",
        name: "365-Day Eternal Flame",
        description: "Maintain a full year coding streak",
        icon: "🕯️",
        kind: RuleKind::Streak { threshold: 365 },
    },
    Rule {
        id: "lines_1000",
        name: "1K Line Wave",
        description: "Write 1,000 lines of code",
        icon: "🌊",
        kind: RuleKind::Lines { threshold: 1_000 },
    },
    Rule {
        id: "lines_10000",
        name: "10K Line Surge",
        description: "Write 10,000 lines of code",
        icon: "💦",
        kind: RuleKind::Lines { threshold: 10_000 },
    },
    Rule {
        id: "lines_50000",
        name: "50K Line Flood",
        description: "Write 50,000 lines of code",
        icon: "🌧️",
        kind: RuleKind::Lines { threshold: 50_000 },
    },
    Rule {
        id: "lines_100000",
        name: "100K Line Ocean",
        description: "Write 100,000 lines of code",
        icon: "🏝️",
        kind: RuleKind::Lines { threshold: 100_000 },
    },
    Rule {
        id: "hours_50",
        name: "50h Spark",
        description: "Code for 50 hours total",
        icon: "⚡",
        kind: RuleKind::Hours { threshold: 180_000.0 },
    },
    Rule {
        id: "hours_1000",
        name: "1K h Lightning",
        description: "Code for 1000 hours total",
        icon: "🌩️",
        kind: RuleKind::Hours { threshold: 3_600_000.0 },
    },
    Rule {
        id: "hours_5000",
        name: "5K h Thunder",
        description: "Code for 5000 hours total",
        icon: "⛈️",
        kind: RuleKind::Hours { threshold: 18_000_000.0 },
    },
    Rule {
        id: "hours_10000",
        name: "10K h Storm",
        description: "Code for 10000 hours total",
        icon: "🌀",
        kind: RuleKind::Hours { threshold: 36_000_000.0 },
    },
    Rule {
        id: "hours_100000",
        name: "100K h Powerhouse",
        description: "Code for 100000 hours total",
        icon: "💡",
        kind: RuleKind::Hours { threshold: 360_000_000.0 },
    },
    Rule {
        id: "polyglot_2",
        name: "Bilingual",
        description: "Code in 2 different languages",
        icon: "🚀",
        kind: RuleKind::Languages { threshold: 2 },
    },
    Rule {
        id: "polyglot_5",
        name: "Polyglot",
        description: "Code in 5 different languages",
        icon: "🌍",
        kind: RuleKind::Languages { threshold: 5 },
    },
    Rule {
        id: "polyglot_10",
        name: "Polyglot Master",
        description: "Code in 10 different languages",
        icon: "🧠",
        kind: RuleKind::Languages { threshold: 10 },
    },
    Rule {
        id: "polyglot_15",
        name: "Code Polymath",
        description: "Code in 15 different languages",
        icon: "🎓",
        kind: RuleKind::Languages { threshold: 15 },
    },
    Rule {
        id: "early_bird",
        name: "Dawn Coder",
        description: "Code before 6 AM",
        icon: "🌅",
        kind: RuleKind::Habit { hours: &[4, 5] },
    },
    Rule {
        id: "night_owl",
        name: "Night Coder",
        description: "Code after midnight",
        icon: "🌌",
        kind: RuleKind::Habit { hours: &[0, 1, 2] },
    },
    Rule {
        id: "session_3h",
        name: "3h Focus",
        description: "Code for 3+ hours in a single session",
        icon: "👁️",
        kind: RuleKind::Session { min_duration: 10_800.0 },
    },
    Rule {
        id: "session_5h",
        name: "5h Zone",
        description: "Code for 5+ hours in a single session",
        icon: "🎯",
        kind: RuleKind::Session { min_duration: 18_000.0 },
    },
    Rule {
        id: "session_8h",
        name: "8h Deep Zone",
        description: "Code for 8+ hours in a single session",
        icon: "🧠",
        kind: RuleKind::Session { min_duration: 28_800.0 },
    },
];

/// One evaluated achievement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub unlocked: bool,
}

/// Evaluates the rule table against the all-time period and streaks.
pub fn evaluate(all_time: &PeriodReport, streaks: &StreakInfo) -> Vec<Achievement> {
    RULES
        .iter()
        .map(|rule| {
            let unlocked = match rule.kind {
                RuleKind::Streak { threshold } => {
                    streaks.current.max(streaks.longest) >= threshold
                }
                RuleKind::Lines { threshold } => all_time.total_lines >= threshold,
                RuleKind::Hours { threshold } => all_time.total_time >= threshold,
                RuleKind::Languages { threshold } => {
                    all_time
                        .languages
                        .iter()
                        .filter(|l| classifier::is_code(&l.name))
                        .count()
                        >= threshold
                }
                RuleKind::Habit { hours } => hours
                    .iter()
                    .any(|&h| all_time.hourly_activity[h as usize].duration > 0.0),
                RuleKind::Session { min_duration } => all_time
                    .sessions
                    .iter()
                    .any(|s| s.duration >= min_duration),
            };
            Achievement {
                id: rule.id,
                name: rule.name,
                description: rule.description,
                icon: rule.icon,
                unlocked,
            }
        })
        .collect()
}
