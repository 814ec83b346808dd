use chrono::{DateTime, NaiveTime, Timelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalendarDayType {
    Working,
    NonWorking,
}

/// Whether a given UTC date contributes capacity at all (§3: "Only WORKING
/// days contribute capacity").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: chrono::NaiveDate,
    pub day_type: CalendarDayType,
}

/// A weekday- and time-scoped interval of working capacity (§3, §4.9).
/// `end < start` means the shift runs past midnight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub start: NaiveTime,
    pub end: NaiveTime,
    /// ISO weekday numbers, Monday = 1 .. Sunday = 7.
    pub weekdays: Vec<u8>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
}

impl Shift {
    pub fn new(start: NaiveTime, end: NaiveTime, weekdays: Vec<u8>) -> Self {
        Self {
            start,
            end,
            weekdays,
            valid_from: None,
            valid_to: None,
        }
    }

    pub fn is_overnight(&self) -> bool {
        self.end <= self.start
    }

    /// Shift length in hours, accounting for the overnight case (§4.9:
    /// "adding one day if end <= start").
    pub fn duration_hours(&self) -> Decimal {
        let start_secs = self.start.num_seconds_from_midnight() as i64;
        let mut end_secs = self.end.num_seconds_from_midnight() as i64;
        if self.is_overnight() {
            end_secs += 24 * 3600;
        }
        Decimal::from(end_secs - start_secs) / Decimal::from(3600)
    }

    pub fn covers_date(&self, date: DateTime<Utc>) -> bool {
        let after_start = self.valid_from.map(|f| date >= f).unwrap_or(true);
        let before_end = self.valid_to.map(|t| date <= t).unwrap_or(true);
        after_start && before_end
    }
}

/// An absolute downtime window that clips available capacity (§4.9).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledStop {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ScheduledStop {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Hours of overlap between this stop and `[window_start, window_end)`.
    pub fn overlap_hours(&self, window_start: DateTime<Utc>, window_end: DateTime<Utc>) -> Decimal {
        let start = self.start.max(window_start);
        let end = self.end.min(window_end);
        if end <= start {
            return Decimal::ZERO;
        }
        Decimal::from((end - start).num_milliseconds()) / Decimal::from(3_600_000)
    }
}

/// A resource that consumes routing time (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkCenter {
    pub id: String,
    pub code: String,
    pub name: String,
    pub efficiency_percent: Decimal,
    pub cost_per_hour: Option<Decimal>,
    pub shifts: Vec<Shift>,
    pub scheduled_stops: Vec<ScheduledStop>,
}

impl WorkCenter {
    pub fn new(id: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            name: String::new(),
            efficiency_percent: Decimal::from(100),
            cost_per_hour: None,
            shifts: Vec::new(),
            scheduled_stops: Vec::new(),
        }
    }

    pub fn with_efficiency_percent(mut self, pct: Decimal) -> Self {
        self.efficiency_percent = pct;
        self
    }

    pub fn with_cost_per_hour(mut self, cost: Decimal) -> Self {
        self.cost_per_hour = Some(cost);
        self
    }

    pub fn cost_per_hour(&self) -> Option<Decimal> {
        self.cost_per_hour
    }

    pub fn with_shift(mut self, shift: Shift) -> Self {
        self.shifts.push(shift);
        self
    }

    pub fn with_scheduled_stop(mut self, stop: ScheduledStop) -> Self {
        self.scheduled_stops.push(stop);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn overnight_shift_duration() {
        let shift = Shift::new(
            NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            vec![1, 2, 3, 4, 5],
        );
        assert!(shift.is_overnight());
        assert_eq!(shift.duration_hours(), Decimal::from(8));
    }

    #[test]
    fn day_shift_duration() {
        let shift = Shift::new(
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(16, 30, 0).unwrap(),
            vec![1, 2, 3, 4, 5],
        );
        assert!(!shift.is_overnight());
        assert_eq!(shift.duration_hours(), Decimal::new(85, 1));
    }

    #[test]
    fn stop_overlap_clips_to_window() {
        let stop = ScheduledStop::new(
            Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 1, 5, 14, 0, 0).unwrap(),
        );
        let window_start = Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap();
        let window_end = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();
        assert_eq!(stop.overlap_hours(window_start, window_end), Decimal::from(2));
    }

    #[test]
    fn stop_outside_window_has_no_overlap() {
        let stop = ScheduledStop::new(
            Utc.with_ymd_and_hms(2026, 1, 6, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 1, 6, 4, 0, 0).unwrap(),
        );
        let window_start = Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap();
        let window_end = Utc.with_ymd_and_hms(2026, 1, 5, 23, 59, 59).unwrap();
        assert_eq!(stop.overlap_hours(window_start, window_end), Decimal::ZERO);
    }
}
