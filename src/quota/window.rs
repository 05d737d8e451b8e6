use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::error::{AppError, AppResult};

/// A half-open counting window `[start, end)`.
///
/// Daily quotas use a calendar day bounded at midnight in a fixed UTC offset
/// (the audience's timezone, UTC-3 by default, no DST). With offset -3 the
/// boundary falls at 03:00 UTC. All daily subjects share this rule, including
/// the registration throttle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// Builds a window from explicit boundaries, rejecting inverted ones
    /// before any store access.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Self> {
        if start >= end {
            return Err(AppError::InvalidWindow(format!(
                "start {} must precede end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// The reference day containing `now` for the given fixed UTC offset.
    pub fn containing(now: DateTime<Utc>, offset_hours: i32) -> Self {
        let offset = Duration::hours(i64::from(offset_hours));
        // Shift into the reference timezone, floor to midnight, shift back.
        let local_midnight = (now + offset).date_naive().and_time(NaiveTime::MIN);
        let start = local_midnight.and_utc() - offset;
        Self {
            start,
            end: start + Duration::hours(24),
        }
    }

    /// Whether an instant falls inside the window (`start` inclusive,
    /// `end` exclusive).
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Seconds until the window rolls over, floored at 1 (Retry-After value)
    pub fn retry_after_secs(&self, now: DateTime<Utc>) -> u64 {
        (self.end - now).num_seconds().max(1) as u64
    }
}
