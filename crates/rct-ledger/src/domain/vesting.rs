//! # Linear Vesting
//!
//! `claimable = floor(granted * min(elapsed, duration) / duration)`
//!
//! Elapsed time is clamped to the duration, so the claimable amount never
//! exceeds the grant no matter how late a claim arrives.

use super::entities::VestingSchedule;
use super::value_objects::{Amount, Height};

/// Height units elapsed since `start`, clamped to `[0, duration]`.
#[must_use]
pub fn effective_elapsed(schedule: &VestingSchedule, now: Height) -> Height {
    now.saturating_sub(schedule.start).min(schedule.duration)
}

/// Total units vested at `now` (claimed or not).
///
/// Computed as `(g / d) * e + (g % d) * e / d`, which equals
/// `floor(g * e / d)` without a 256-bit intermediate: `e <= d` keeps the
/// first term `<= g` and `(g % d) * e < d * d <= u128::MAX`.
#[must_use]
pub fn vested_amount(schedule: &VestingSchedule, now: Height) -> Amount {
    if schedule.duration == 0 {
        return schedule.granted;
    }
    let elapsed = Amount::from(effective_elapsed(schedule, now));
    let duration = Amount::from(schedule.duration);
    let whole = (schedule.granted / duration) * elapsed;
    let partial = (schedule.granted % duration) * elapsed / duration;
    whole + partial
}

/// Units that a claim at `now` would credit.
#[must_use]
pub fn claimable_now(schedule: &VestingSchedule, now: Height) -> Amount {
    vested_amount(schedule, now).saturating_sub(schedule.claimed)
}
