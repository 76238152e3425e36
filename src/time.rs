//! Game clock helpers.
//!
//! Timestamps are milliseconds since the Unix epoch as `u64`. The reducers
//! never read the clock themselves; `now_ms` is only the default "now" for
//! the `*_now` convenience wrappers.

use web_time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in ms since the Unix epoch.
/// A clock set before 1970 reads as 0. Safe to call on wasm32.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Elapsed ms between `last` and `now`, clamped to `[0, ceiling]`.
///
/// A clock that moved backwards yields 0; a long gap (tab backgrounded,
/// device asleep) yields `ceiling`.
pub fn clamped_delta_ms(last: u64, now: u64, ceiling: u64) -> u64 {
    now.saturating_sub(last).min(ceiling)
}
