//! Streak derivations.
//!
//! The streak is the continuous span since the most recent session. Its
//! start is persisted as a scalar but is a derived quantity: the store calls
//! [`latest_timestamp`] synchronously after every session mutation so that
//! `streak_start == max(timestamp)` holds the moment a mutation returns.

use crate::common::Millis;
use crate::models::Session;

/// The timestamp the streak start must equal: the maximum over all sessions.
///
/// Returns `None` for an empty collection, in which case the stored value
/// (the first-launch seed, or whatever import provided) is left untouched.
pub fn latest_timestamp(sessions: &[Session]) -> Option<Millis> {
    // Max, not last element: callers keep the collection sorted, but the
    // streak must not depend on that.
    sessions.iter().map(|s| s.timestamp).max()
}

/// Elapsed streak duration at `now`. Never negative.
pub fn current_duration(streak_start: Millis, now: Millis) -> Millis {
    (now - streak_start).max(0)
}

/// Longest streak ever: the current one, or the largest `previous_streak`
/// snapshot recorded on any session.
///
/// Reads the stored snapshots rather than recomputing them, so edits to
/// earlier sessions do not retroactively correct later records.
pub fn longest_streak(sessions: &[Session], current: Millis) -> Millis {
    sessions
        .iter()
        .map(|s| s.previous_streak)
        .fold(current, Millis::max)
}

/// Mean gap (ms) between consecutive sessions over the whole log, or `None`
/// when fewer than two sessions exist.
pub fn average_gap(sessions: &[Session]) -> Option<f64> {
    if sessions.len() < 2 {
        return None;
    }

    let mut sorted: Vec<Millis> = sessions.iter().map(|s| s.timestamp).collect();
    sorted.sort_unstable();

    let total: i64 = sorted.windows(2).map(|w| w[1] - w[0]).sum();
    Some(total as f64 / (sorted.len() - 1) as f64)
}
