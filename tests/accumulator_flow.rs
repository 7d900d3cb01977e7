//! Accumulator behavior: locate-or-create by period window, idempotent
//! replay via event ids, monotonic totals, and period rollover that
//! zeroes the new period while leaving the prior row untouched.

mod helpers;

use rust_decimal::Decimal;
use uuid::Uuid;

use helpers::*;
use wellnecity_edm::error::EdmError;
use wellnecity_edm::model::{Accumulator, AccumulatorScope, PeriodType};
use wellnecity_edm::ops::{apply_accumulator_event, rollover_accumulator, AccumulatorEvent};

fn deductible_event(stack: &PlanStack, amount: &str, service: (i32, u32, u32)) -> AccumulatorEvent {
    AccumulatorEvent {
        event_id: Uuid::new_v4(),
        plan_limit_id: stack.plan_limit_id,
        scope: AccumulatorScope::Member(stack.subscriber_member_id),
        amount: Some(amount.parse().unwrap()),
        count: Some(1),
        service_date: date(service.0, service.1, service.2),
    }
}

#[test]
fn first_event_creates_the_covering_period_row() {
    let store = open_store();
    let stack = seed_plan_stack(&store, PeriodType::CalendarYear);

    let update =
        apply_accumulator_event(&store, &deductible_event(&stack, "250.00", (2025, 3, 12)))
            .unwrap();
    assert!(update.applied);

    let (accumulator, _) = store
        .get::<Accumulator>(update.accumulator_id)
        .unwrap()
        .unwrap();
    assert_eq!(accumulator.period_start, date(2025, 1, 1));
    assert_eq!(accumulator.period_end, date(2026, 1, 1));
    assert_eq!(accumulator.accumulated_amount, "250.00".parse::<Decimal>().unwrap());
    assert_eq!(accumulator.accumulated_count, 1);
}

#[test]
fn later_events_in_the_same_period_increment_the_same_row() {
    let store = open_store();
    let stack = seed_plan_stack(&store, PeriodType::CalendarYear);

    let first =
        apply_accumulator_event(&store, &deductible_event(&stack, "250.00", (2025, 3, 12)))
            .unwrap();
    let second =
        apply_accumulator_event(&store, &deductible_event(&stack, "125.50", (2025, 9, 30)))
            .unwrap();
    assert_eq!(first.accumulator_id, second.accumulator_id);

    let (accumulator, _) = store
        .get::<Accumulator>(first.accumulator_id)
        .unwrap()
        .unwrap();
    assert_eq!(
        accumulator.accumulated_amount,
        "375.50".parse::<Decimal>().unwrap()
    );
    assert_eq!(accumulator.accumulated_count, 2);
}

#[test]
fn replaying_an_event_id_is_a_noop() {
    let store = open_store();
    let stack = seed_plan_stack(&store, PeriodType::CalendarYear);

    let event = deductible_event(&stack, "250.00", (2025, 3, 12));
    let first = apply_accumulator_event(&store, &event).unwrap();
    assert!(first.applied);

    let replay = apply_accumulator_event(&store, &event).unwrap();
    assert!(!replay.applied);

    let (accumulator, _) = store
        .get::<Accumulator>(first.accumulator_id)
        .unwrap()
        .unwrap();
    assert_eq!(
        accumulator.accumulated_amount,
        "250.00".parse::<Decimal>().unwrap()
    );
    assert_eq!(accumulator.accumulated_count, 1);
}

#[test]
fn negative_increments_are_rejected() {
    let store = open_store();
    let stack = seed_plan_stack(&store, PeriodType::CalendarYear);

    let mut event = deductible_event(&stack, "250.00", (2025, 3, 12));
    event.amount = Some("-10.00".parse().unwrap());
    assert!(matches!(
        apply_accumulator_event(&store, &event),
        Err(EdmError::InvalidOperation { .. })
    ));
}

#[test]
fn plan_year_periods_anchor_on_the_plan_effective_date() {
    let store = open_store();
    // Plan effective 2025-07-01; a March 2026 service date falls in the
    // plan year that started 2025-07-01.
    let stack = seed_plan_stack(&store, PeriodType::PlanYear);

    let update =
        apply_accumulator_event(&store, &deductible_event(&stack, "80.00", (2026, 3, 4)))
            .unwrap();
    let (accumulator, _) = store
        .get::<Accumulator>(update.accumulator_id)
        .unwrap()
        .unwrap();
    assert_eq!(accumulator.period_start, date(2025, 7, 1));
    assert_eq!(accumulator.period_end, date(2026, 7, 1));
}

#[test]
fn rollover_zeroes_the_new_period_and_preserves_the_old_row() {
    let store = open_store();
    let stack = seed_plan_stack(&store, PeriodType::CalendarYear);

    let update =
        apply_accumulator_event(&store, &deductible_event(&stack, "990.00", (2025, 11, 20)))
            .unwrap();

    let next_id = rollover_accumulator(&store, update.accumulator_id, date(2026, 1, 1)).unwrap();

    let (next, _) = store.get::<Accumulator>(next_id).unwrap().unwrap();
    assert_eq!(next.accumulated_amount, Decimal::ZERO);
    assert_eq!(next.accumulated_count, 0);
    assert_eq!(next.period_start, date(2026, 1, 1));
    assert_eq!(next.period_end, date(2027, 1, 1));

    // Prior period is unchanged and still queryable.
    let (prior, _) = store
        .get::<Accumulator>(update.accumulator_id)
        .unwrap()
        .unwrap();
    assert_eq!(
        prior.accumulated_amount,
        "990.00".parse::<Decimal>().unwrap()
    );
    assert_eq!(prior.period_end, date(2026, 1, 1));

    // New-year events land in the new row.
    let january = apply_accumulator_event(
        &store,
        &deductible_event(&stack, "45.00", (2026, 1, 15)),
    )
    .unwrap();
    assert_eq!(january.accumulator_id, next_id);
}

#[test]
fn rollover_before_the_period_ends_is_rejected() {
    let store = open_store();
    let stack = seed_plan_stack(&store, PeriodType::CalendarYear);
    let update =
        apply_accumulator_event(&store, &deductible_event(&stack, "10.00", (2025, 2, 1)))
            .unwrap();

    assert!(matches!(
        rollover_accumulator(&store, update.accumulator_id, date(2025, 6, 1)),
        Err(EdmError::InvalidOperation { .. })
    ));
}

#[test]
fn family_scope_accumulates_independently_of_member_scope() {
    let store = open_store();
    let stack = seed_plan_stack(&store, PeriodType::CalendarYear);

    let member_update =
        apply_accumulator_event(&store, &deductible_event(&stack, "100.00", (2025, 5, 5)))
            .unwrap();

    let family_event = AccumulatorEvent {
        event_id: Uuid::new_v4(),
        plan_limit_id: stack.plan_limit_id,
        scope: AccumulatorScope::Family(stack.coverage_id),
        amount: Some("100.00".parse().unwrap()),
        count: None,
        service_date: date(2025, 5, 5),
    };
    let family_update = apply_accumulator_event(&store, &family_event).unwrap();

    assert_ne!(member_update.accumulator_id, family_update.accumulator_id);
}
