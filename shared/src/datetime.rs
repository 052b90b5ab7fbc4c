use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{AppError, AppResult};

/// First instant of the calendar day containing `now`, in `tz`.
///
/// An identity registered before this instant belongs to a previous day.
pub fn start_of_day(tz: Tz, now: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
    let date = now.with_timezone(&tz).date_naive();
    tz.from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AppError::ConversionEntityError("invalid local day start".into()))
}

/// Last instant of the calendar day containing `now`, in `tz`.
///
/// Identities registered today expire here.
pub fn end_of_day(tz: Tz, now: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
    let next = now
        .with_timezone(&tz)
        .date_naive()
        .succ_opt()
        .ok_or_else(|| AppError::ConversionEntityError("date out of range".into()))?;
    tz.from_local_datetime(&next.and_time(NaiveTime::MIN))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc) - Duration::milliseconds(1))
        .ok_or_else(|| AppError::ConversionEntityError("invalid local day end".into()))
}
