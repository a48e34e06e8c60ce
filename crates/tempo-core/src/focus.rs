//! Composite focus score over a period's sessions.

use crate::session::Session;

const LONG_BREAK_SECS: f64 = 2.0 * 3600.0;
const SHORT_BREAK_SECS: f64 = 15.0 * 60.0;

/// Scores 0..=100 from session length, count, consistency and break pattern.
///
/// An empty session list scores zero.
pub fn focus_score(sessions: &[Session]) -> u8 {
    if sessions.is_empty() {
        return 0;
    }

    let count = sessions.len();
    let total: f64 = sessions.iter().map(|s| s.duration).sum();
    let mean = total / count as f64;

    let base: i32 = if mean >= 7_200.0 {
        90
    } else if mean >= 5_400.0 {
        80
    } else if mean >= 3_600.0 {
        70
    } else if mean >= 2_700.0 {
        60
    } else if mean >= 1_800.0 {
        50
    } else if mean >= 900.0 {
        40
    } else {
        30
    };

    let count_bonus: i32 = match count {
        1 if mean >= 5_400.0 => 10,
        1 => -5,
        2..=5 => 10,
        6..=8 => 0,
        _ => -10,
    };

    let variance = sessions
        .iter()
        .map(|s| {
            let diff = s.duration - mean;
            diff * diff
        })
        .sum::<f64>()
        / count as f64;
    let std_dev = variance.sqrt();
    let consistency_bonus: i32 = if std_dev < mean * 0.3 {
        10
    } else if std_dev < mean * 0.5 {
        5
    } else {
        -5
    };

    let mut break_penalty: i32 = 0;
    if count > 1 {
        let mut long_breaks = 0usize;
        let mut short_breaks = 0usize;
        for session in &sessions[..count - 1] {
            if session.break_after > LONG_BREAK_SECS {
                long_breaks += 1;
            } else if session.break_after > 0.0 && session.break_after < SHORT_BREAK_SECS {
                short_breaks += 1;
            }
        }
        if long_breaks > count / 2 {
            break_penalty = -10;
        }
        if short_breaks > count / 2 {
            break_penalty = -5;
        }
    }

    (base + count_bonus + consistency_bonus + break_penalty).clamp(0, 100) as u8
}
