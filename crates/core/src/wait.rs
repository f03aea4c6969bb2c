//! Wall-clock timing primitives.

use chrono::{Local, NaiveDateTime};
use std::time::Duration;
use tracing::debug;

/// Signed milliseconds from `now` until `target`. Negative once past.
pub fn ms_until(target: NaiveDateTime, now: NaiveDateTime) -> i64 {
    target.signed_duration_since(now).num_milliseconds()
}

/// Sleep until a wall-clock instant with millisecond precision.
///
/// Sleeps in one coarse step to about 200ms before the target, then in
/// 10ms steps across the final stretch. Every step is an await point, so
/// the wait stays cancellable and never busy-spins while keeping
/// sub-second accuracy at the instant itself.
pub async fn sleep_until_wall(target: NaiveDateTime) {
    let mut logged = false;
    loop {
        let remaining = ms_until(target, Local::now().naive_local());
        if remaining <= 0 {
            return;
        }
        if !logged {
            debug!(remaining_ms = remaining, "sleeping toward wall-clock target");
            logged = true;
        }
        let step = if remaining > 250 {
            (remaining - 200) as u64
        } else {
            remaining.min(10) as u64
        };
        tokio::time::sleep(Duration::from_millis(step)).await;
    }
}
