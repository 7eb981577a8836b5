//! Identity tokens and random dates.
//!
//! Identities are UUID-shaped but drawn from the run's own stream,
//! so a fixed seed reproduces every id byte for byte.

use crate::{
    error::{GenError, GenResult},
    rng::StreamRng,
    types::EntityId,
};
use chrono::{Days, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Builder;

const SECONDS_PER_DAY: u64 = 86_400;

/// Mint a fresh 128-bit identity in canonical hyphenated form.
pub fn new_identity(rng: &mut StreamRng) -> EntityId {
    Builder::from_random_bytes(rng.next_bytes_16())
        .into_uuid()
        .hyphenated()
        .to_string()
}

/// A date uniformly distributed over the inclusive day range [start, end].
pub fn random_date(rng: &mut StreamRng, start: NaiveDate, end: NaiveDate) -> GenResult<NaiveDate> {
    if start > end {
        return Err(GenError::InvalidDateRange { start, end });
    }
    let span = (end - start).num_days();
    let offset = rng.range_inclusive(0, span);
    Ok(start + Duration::days(offset))
}

/// A random date in [start, end] at a uniformly random second of that day.
pub fn random_datetime(
    rng: &mut StreamRng,
    start: NaiveDate,
    end: NaiveDate,
) -> GenResult<NaiveDateTime> {
    let day = random_date(rng, start, end)?;
    let secs = rng.next_u64_below(SECONDS_PER_DAY) as u32;
    let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)
        .ok_or_else(|| GenError::Other(anyhow::anyhow!("second of day out of range: {secs}")))?;
    Ok(day.and_time(time))
}

/// `date` shifted by a signed number of days. Errors instead of
/// wrapping when the result leaves chrono's representable range.
pub fn shift_days(date: NaiveDate, days: i64) -> GenResult<NaiveDate> {
    let step = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        date.checked_add_days(step)
    } else {
        date.checked_sub_days(step)
    };
    shifted.ok_or_else(|| {
        GenError::InvalidConfig(format!("{date} shifted by {days} days is out of range"))
    })
}
