//! ISO-week time bucketing shared by every stage (§4.1). Weeks start Monday
//! 00:00 UTC and end Sunday 23:59:59.999 UTC.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc, Weekday};

/// A single weekly planning bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekBucket {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Monday 00:00 UTC of `d`'s ISO week, with time-of-day stripped.
pub fn week_start(d: DateTime<Utc>) -> DateTime<Utc> {
    let days_from_monday = d.weekday().num_days_from_monday() as i64;
    let midnight = Utc
        .with_ymd_and_hms(d.year(), d.month(), d.day(), 0, 0, 0)
        .unwrap();
    midnight - Duration::days(days_from_monday)
}

/// `n` contiguous weekly buckets starting at `start` (which should already be
/// a week-start instant).
pub fn weekly_buckets(start: DateTime<Utc>, n: usize) -> Vec<WeekBucket> {
    (0..n)
        .map(|k| {
            let bucket_start = start + Duration::days(7 * k as i64);
            let bucket_end = bucket_start + Duration::days(7) - Duration::milliseconds(1);
            WeekBucket {
                start: bucket_start,
                end: bucket_end,
            }
        })
        .collect()
}

/// True if `instant` falls within `[bucket.start, bucket.end]`.
pub fn in_bucket(instant: DateTime<Utc>, bucket: &WeekBucket) -> bool {
    instant >= bucket.start && instant <= bucket.end
}

/// True if `weekday`'s weekly bit (Monday=1 .. Sunday=7) is a member of `set`.
pub fn weekday_in_set(weekday: Weekday, set: &[u8]) -> bool {
    let iso = weekday.number_from_monday() as u8;
    set.contains(&iso)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_start_of_monday_is_itself() {
        let monday = Utc.with_ymd_and_hms(2026, 3, 2, 14, 30, 0).unwrap();
        let start = week_start(monday);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn week_start_of_sunday_is_prior_monday() {
        let sunday = Utc.with_ymd_and_hms(2026, 3, 8, 23, 0, 0).unwrap();
        let start = week_start(sunday);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn weekly_buckets_are_contiguous() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        let buckets = weekly_buckets(start, 3);
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].start, start);
        assert_eq!(buckets[1].start, start + Duration::days(7));
        assert_eq!(buckets[0].end + Duration::milliseconds(1), buckets[1].start);
    }
}
