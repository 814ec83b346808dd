//! Action messages (§4.8): diff freshly planned orders against the existing
//! FIRM/RELEASED order book.

use chrono::{DateTime, Duration, Utc};
use mrp_core::{OrderKind, OrderStatus, PlannedOrder};
use rust_decimal::Decimal;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    New,
    Cancel,
    Expedite,
    Increase,
    Reduce,
}

#[derive(Debug, Clone)]
pub struct ActionMessage {
    pub order_id: String,
    pub kind: ActionKind,
    pub text: String,
}

/// Matches planned orders against existing FIRM/RELEASED orders for the
/// same (product, kind) key within a ±3 day window, and emits one message
/// per delta. Returns messages keyed by the order id they mutate.
pub fn diff_orders(planned: &[PlannedOrder], existing: &[PlannedOrder]) -> Vec<ActionMessage> {
    let comparable_existing: Vec<&PlannedOrder> = existing
        .iter()
        .filter(|o| matches!(o.status, OrderStatus::Firm | OrderStatus::Released))
        .collect();

    let mut planned_by_key: HashMap<(String, OrderKindKey), Vec<&PlannedOrder>> = HashMap::new();
    for o in planned {
        planned_by_key.entry(key_of(o)).or_default().push(o);
    }
    let mut existing_by_key: HashMap<(String, OrderKindKey), Vec<&PlannedOrder>> = HashMap::new();
    for o in &comparable_existing {
        existing_by_key.entry(key_of(o)).or_default().push(o);
    }

    let mut all_keys: Vec<(String, OrderKindKey)> = planned_by_key.keys().cloned().collect();
    for k in existing_by_key.keys() {
        if !all_keys.contains(k) {
            all_keys.push(k.clone());
        }
    }
    all_keys.sort();

    let mut messages = Vec::new();

    for key in all_keys {
        let planned_group = planned_by_key.get(&key).cloned().unwrap_or_default();
        let existing_group = existing_by_key.get(&key).cloned().unwrap_or_default();

        if existing_group.is_empty() {
            for p in &planned_group {
                messages.push(ActionMessage {
                    order_id: p.id.clone(),
                    kind: ActionKind::New,
                    text: format!("NEW: {} units needed by {}", p.quantity, fmt_date(p.needed_by)),
                });
            }
            continue;
        }
        if planned_group.is_empty() {
            for e in &existing_group {
                messages.push(ActionMessage {
                    order_id: e.id.clone(),
                    kind: ActionKind::Cancel,
                    text: "CANCEL: no longer required".to_string(),
                });
            }
            continue;
        }

        let mut matched_existing_ids: Vec<&str> = Vec::new();

        for p in &planned_group {
            let matches: Vec<&&PlannedOrder> = existing_group
                .iter()
                .filter(|e| (e.needed_by - p.needed_by).num_days().unsigned_abs() <= 3)
                .collect();

            if matches.is_empty() {
                messages.push(ActionMessage {
                    order_id: p.id.clone(),
                    kind: ActionKind::New,
                    text: format!("NEW: {} units needed by {}", p.quantity, fmt_date(p.needed_by)),
                });
                continue;
            }

            for m in &matches {
                matched_existing_ids.push(&m.id);
            }

            let existing_qty: Decimal = matches.iter().map(|e| e.quantity).sum();
            let latest_existing_delivery = matches.iter().map(|e| e.expected_receipt).max().unwrap();

            if latest_existing_delivery > p.needed_by {
                let delta_days = days_ceil(latest_existing_delivery - p.needed_by);
                messages.push(ActionMessage {
                    order_id: p.id.clone(),
                    kind: ActionKind::Expedite,
                    text: format!("EXPEDITE: pull in by {} days to {}", delta_days, fmt_date(p.needed_by)),
                });
            } else if existing_qty < p.quantity {
                let delta = p.quantity - existing_qty;
                messages.push(ActionMessage {
                    order_id: p.id.clone(),
                    kind: ActionKind::Increase,
                    text: format!("INCREASE: add {} units", delta),
                });
            } else if existing_qty > p.quantity {
                let delta = existing_qty - p.quantity;
                messages.push(ActionMessage {
                    order_id: p.id.clone(),
                    kind: ActionKind::Reduce,
                    text: format!("REDUCE: remove {} units", delta),
                });
            }
        }

        for e in &existing_group {
            if !matched_existing_ids.contains(&e.id.as_str()) {
                messages.push(ActionMessage {
                    order_id: e.id.clone(),
                    kind: ActionKind::Cancel,
                    text: "CANCEL: no longer required".to_string(),
                });
            }
        }
    }

    messages
}

type OrderKindKey = String;

fn key_of(o: &PlannedOrder) -> (String, OrderKindKey) {
    let kind = match o.kind {
        OrderKind::Buy => "BUY",
        OrderKind::Make => "MAKE",
    };
    (o.product_id.clone(), kind.to_string())
}

fn days_ceil(duration: Duration) -> i64 {
    let millis = duration.num_milliseconds();
    let day_millis = 86_400_000;
    (millis + day_millis - 1) / day_millis
}

fn fmt_date(d: DateTime<Utc>) -> String {
    d.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn order(id: &str, product: &str, kind: OrderKind, qty: i64, needed_by: DateTime<Utc>, status: OrderStatus) -> PlannedOrder {
        PlannedOrder::new(id, "E1", product, kind, Decimal::from(qty), needed_by, 0).with_status(status)
    }

    #[test]
    fn unmatched_planned_is_new() {
        let planned = vec![order("P1", "A", OrderKind::Buy, 10, day(2026, 1, 10), OrderStatus::Planned)];
        let messages = diff_orders(&planned, &[]);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].kind, ActionKind::New);
    }

    #[test]
    fn unmatched_existing_is_cancel() {
        let existing = vec![order("E1", "A", OrderKind::Buy, 10, day(2026, 1, 10), OrderStatus::Firm)];
        let messages = diff_orders(&[], &existing);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].kind, ActionKind::Cancel);
    }

    #[test]
    fn planned_and_cancelled_existing_ignored() {
        let existing = vec![order("E1", "A", OrderKind::Buy, 10, day(2026, 1, 10), OrderStatus::Cancelled)];
        let messages = diff_orders(&[], &existing);
        assert!(messages.is_empty());
    }

    #[test]
    fn increase_when_planned_exceeds_matched_existing() {
        let planned = vec![order("P1", "A", OrderKind::Buy, 100, day(2026, 1, 10), OrderStatus::Planned)];
        let existing = vec![order("E1", "A", OrderKind::Buy, 60, day(2026, 1, 11), OrderStatus::Firm)];
        let messages = diff_orders(&planned, &existing);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].kind, ActionKind::Increase);
        assert_eq!(messages[0].order_id, "P1");
    }

    #[test]
    fn reduce_when_planned_less_than_matched_existing() {
        let planned = vec![order("P1", "A", OrderKind::Buy, 40, day(2026, 1, 10), OrderStatus::Planned)];
        let existing = vec![order("E1", "A", OrderKind::Buy, 60, day(2026, 1, 11), OrderStatus::Firm)];
        let messages = diff_orders(&planned, &existing);
        assert_eq!(messages[0].kind, ActionKind::Reduce);
    }

    #[test]
    fn expedite_takes_priority_over_quantity_delta() {
        let planned = vec![order("P1", "A", OrderKind::Buy, 100, day(2026, 1, 10), OrderStatus::Planned)];
        let mut e = order("E1", "A", OrderKind::Buy, 60, day(2026, 1, 10), OrderStatus::Firm);
        e.expected_receipt = day(2026, 1, 15);
        let messages = diff_orders(&planned, &[e]);
        assert_eq!(messages[0].kind, ActionKind::Expedite);
    }

    #[test]
    fn outside_window_is_unmatched() {
        let planned = vec![order("P1", "A", OrderKind::Buy, 100, day(2026, 1, 10), OrderStatus::Planned)];
        let existing = vec![order("E1", "A", OrderKind::Buy, 100, day(2026, 1, 20), OrderStatus::Firm)];
        let messages = diff_orders(&planned, &existing);
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().any(|m| m.kind == ActionKind::New && m.order_id == "P1"));
        assert!(messages.iter().any(|m| m.kind == ActionKind::Cancel && m.order_id == "E1"));
    }
}
