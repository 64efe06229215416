use chrono::{NaiveDate, NaiveDateTime};
use lovenest_types::models::Stats;

/// Upper bound of the love level score.
pub const MAX_LOVE_LEVEL: i64 = 100;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Whole days from midnight of `start` to `now`, rounded down.
pub fn days_since(start: NaiveDate, now: NaiveDateTime) -> i64 {
    (now - start.and_time(chrono::NaiveTime::MIN))
        .num_seconds()
        .div_euclid(SECONDS_PER_DAY)
}

/// `min(100, days / 10 + photos * 5 + messages * 3)` with floor division.
pub fn love_level(days_together: i64, photos_shared: u64, messages_sent: u64) -> i64 {
    let photos = i64::try_from(photos_shared).unwrap_or(i64::MAX);
    let messages = i64::try_from(messages_sent).unwrap_or(i64::MAX);

    days_together
        .div_euclid(10)
        .saturating_add(photos.saturating_mul(5))
        .saturating_add(messages.saturating_mul(3))
        .min(MAX_LOVE_LEVEL)
}

pub fn compute(start: NaiveDate, now: NaiveDateTime, messages_sent: u64, photos_shared: u64) -> Stats {
    let days_together = days_since(start, now);
    Stats {
        days_together,
        messages_sent,
        photos_shared,
        love_level: love_level(days_together, photos_shared, messages_sent),
    }
}
