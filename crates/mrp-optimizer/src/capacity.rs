//! Capacity requirements planning (§4.9): available vs. planned hours per
//! work center per week, with an overload-suggestion table.

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};
use mrp_core::{CalendarDay, CalendarDayType, CapacityLoad, OrderKind, PlannedOrder, RoutingStep, Suggestion, WorkCenter};
use rust_decimal::Decimal;

/// Hours a work center can actually deliver in `[week_start, week_start+7d)`:
/// sum of active shift durations on WORKING calendar days whose weekday the
/// shift covers, scaled by efficiency, minus any scheduled-stop overlap.
/// Floored at 0.
pub fn available_hours(
    work_center: &WorkCenter,
    calendar_days: &[CalendarDay],
    week_start: DateTime<Utc>,
) -> Decimal {
    let week_end = week_start + Duration::days(7);
    let mut total = Decimal::ZERO;

    for day in calendar_days {
        if day.day_type != CalendarDayType::Working {
            continue;
        }
        let day_start = Utc
            .with_ymd_and_hms(day.date.year(), day.date.month(), day.date.day(), 0, 0, 0)
            .unwrap();
        if day_start < week_start || day_start >= week_end {
            continue;
        }
        let weekday = day_start.weekday().number_from_monday() as u8;

        for shift in &work_center.shifts {
            if !shift.weekdays.contains(&weekday) || !shift.covers_date(day_start) {
                continue;
            }
            let shift_start = day_start + Duration::seconds(shift.start.num_seconds_from_midnight() as i64);
            let mut shift_end = day_start + Duration::seconds(shift.end.num_seconds_from_midnight() as i64);
            if shift.is_overnight() {
                shift_end += Duration::days(1);
            }

            let mut hours = shift.duration_hours();
            for stop in &work_center.scheduled_stops {
                hours -= stop.overlap_hours(shift_start, shift_end);
            }
            total += hours.max(Decimal::ZERO);
        }
    }

    (total * work_center.efficiency_percent / Decimal::from(100)).max(Decimal::ZERO)
}

/// Planned hours a work center must deliver in a week, summed from every
/// MAKE order whose `needed_by` falls in that week, over every routing step
/// assigned to this work center for that order's product.
pub fn planned_hours(
    work_center_id: &str,
    week_start: DateTime<Utc>,
    orders: &[PlannedOrder],
    routing_steps: &[RoutingStep],
) -> Decimal {
    let week_end = week_start + Duration::days(7);
    let mut total = Decimal::ZERO;

    for order in orders {
        if order.kind != OrderKind::Make {
            continue;
        }
        if order.needed_by < week_start || order.needed_by >= week_end {
            continue;
        }
        for step in routing_steps {
            if step.work_center_id != work_center_id || step.product_id != order.product_id {
                continue;
            }
            total += (step.minutes_for(order.quantity) / Decimal::from(60)).round_dp(4);
        }
    }

    total
}

/// Builds the `CapacityLoad` row and suggestion for one work center/week
/// (§4.9: 0 -> null/OK, (0,100] OK, (100,110] OVERTIME, (110,130] EXPEDITE,
/// >130 SUBCONTRACT).
pub fn build_capacity_load(
    execution_id: &str,
    work_center_id: &str,
    week_start: DateTime<Utc>,
    available: Decimal,
    planned: Decimal,
) -> CapacityLoad {
    let load = CapacityLoad::new(execution_id, work_center_id, week_start, available, planned);
    let suggestion = suggest(load.utilization_percent);
    load.with_suggestion(suggestion)
}

fn suggest(utilization_percent: Decimal) -> Suggestion {
    if utilization_percent <= Decimal::ZERO {
        Suggestion::Ok
    } else if utilization_percent <= Decimal::from(100) {
        Suggestion::Ok
    } else if utilization_percent <= Decimal::from(110) {
        Suggestion::Overtime
    } else if utilization_percent <= Decimal::from(130) {
        Suggestion::Expedite
    } else {
        Suggestion::Subcontract
    }
}
