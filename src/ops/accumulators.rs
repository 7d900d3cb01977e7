//! Accumulator updates
//!
//! Applies monetary/count events against a plan limit for an individual
//! (plan member) or family (coverage) scope: locate or create the row
//! whose [period_start, period_end) window contains the service date,
//! then increment. Events carry an explicit id and the store's
//! applied-event ledger makes replays no-ops. Totals never decrement;
//! a period rollover creates a fresh zeroed row and leaves the prior
//! period untouched.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::error::{ConcurrencyConflict, EdmError, RelationshipViolation, Result};
use crate::model::{Accumulator, AccumulatorScope, BenefitPlan, PeriodType, PlanLimit};
use crate::store::retry::with_retries;
use crate::store::{CommitOutcome, MemoryStore, WriteBatch};

/// One spend/utilization event against a plan limit.
#[derive(Debug, Clone)]
pub struct AccumulatorEvent {
    /// Idempotency key; replaying the same event id changes nothing.
    pub event_id: Uuid,
    pub plan_limit_id: Uuid,
    pub scope: AccumulatorScope,
    pub amount: Option<Decimal>,
    pub count: Option<i32>,
    pub service_date: NaiveDate,
}

/// Result of applying an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccumulatorUpdate {
    pub accumulator_id: Uuid,
    /// False when the event id had already been applied.
    pub applied: bool,
}

fn invalid(operation: &str, reason: String) -> EdmError {
    EdmError::InvalidOperation {
        operation: operation.to_string(),
        reason,
    }
}

/// Apply an event: locate or create the covering accumulator row and
/// increment its totals.
pub fn apply_accumulator_event(
    store: &MemoryStore,
    event: &AccumulatorEvent,
) -> Result<AccumulatorUpdate> {
    if event.amount.map(|a| a < Decimal::ZERO).unwrap_or(false)
        || event.count.map(|c| c < 0).unwrap_or(false)
    {
        return Err(invalid(
            "apply_accumulator_event",
            "accumulated totals never decrement outside a period rollover".into(),
        ));
    }

    with_retries(store.config(), "apply_accumulator_event", || {
        let existing = store
            .find::<Accumulator, _>(|a| {
                a.plan_limit_id == event.plan_limit_id
                    && a.scope == event.scope
                    && a.covers(event.service_date)
            })?
            .into_iter()
            .next();

        let now = Utc::now();
        let (accumulator_id, batch) = match existing {
            Some((mut accumulator, revision)) => {
                if let Some(amount) = event.amount {
                    accumulator.accumulated_amount += amount;
                }
                if let Some(count) = event.count {
                    accumulator.accumulated_count += count;
                }
                accumulator.updated_at = now;
                (
                    accumulator.id,
                    WriteBatch::new().update(&accumulator, revision)?,
                )
            }
            None => {
                let (period_start, period_end) =
                    derive_period(store, event.plan_limit_id, event.service_date)?;
                let accumulator = Accumulator {
                    id: Uuid::new_v4(),
                    plan_limit_id: event.plan_limit_id,
                    scope: event.scope,
                    accumulated_amount: event.amount.unwrap_or(Decimal::ZERO),
                    accumulated_count: event.count.unwrap_or(0),
                    period_start,
                    period_end,
                    created_at: now,
                    updated_at: now,
                };
                (accumulator.id, WriteBatch::new().insert(&accumulator)?)
            }
        };

        let outcome = match store.commit(batch.with_event(event.event_id)) {
            Ok(outcome) => outcome,
            // A concurrent writer opened the same period first; retry
            // finds and increments that row instead.
            Err(EdmError::Relationship(RelationshipViolation::PeriodOverlap {
                accumulator_id,
                other_id,
            })) => {
                return Err(EdmError::Conflict(ConcurrencyConflict::DuplicateInsert {
                    collection: "accumulator".into(),
                    id: if accumulator_id == Uuid::nil() {
                        other_id
                    } else {
                        accumulator_id
                    },
                }));
            }
            Err(err) => return Err(err),
        };
        let applied = outcome == CommitOutcome::Applied;
        if applied {
            info!(
                %accumulator_id,
                event_id = %event.event_id,
                "applied accumulator event"
            );
        }
        Ok(AccumulatorUpdate {
            accumulator_id,
            applied,
        })
    })
}

/// Open the next period at a boundary: a fresh zeroed row for the window
/// containing `new_period_start`; the prior period's row is untouched.
pub fn rollover_accumulator(
    store: &MemoryStore,
    accumulator_id: Uuid,
    new_period_start: NaiveDate,
) -> Result<Uuid> {
    with_retries(store.config(), "rollover_accumulator", || {
        let Some((previous, _)) = store.get::<Accumulator>(accumulator_id)? else {
            return Err(invalid(
                "rollover_accumulator",
                format!("accumulator {accumulator_id} not found"),
            ));
        };
        if new_period_start < previous.period_end {
            return Err(invalid(
                "rollover_accumulator",
                format!(
                    "new period start {new_period_start} falls before the current period ends ({})",
                    previous.period_end
                ),
            ));
        }
        let already_open = store
            .find::<Accumulator, _>(|a| {
                a.plan_limit_id == previous.plan_limit_id
                    && a.scope == previous.scope
                    && a.covers(new_period_start)
            })?
            .into_iter()
            .next();
        if let Some((open, _)) = already_open {
            return Err(invalid(
                "rollover_accumulator",
                format!("period containing {new_period_start} already open as {}", open.id),
            ));
        }

        let (period_start, period_end) =
            derive_period(store, previous.plan_limit_id, new_period_start)?;
        let now = Utc::now();
        let next = Accumulator {
            id: Uuid::new_v4(),
            plan_limit_id: previous.plan_limit_id,
            scope: previous.scope,
            accumulated_amount: Decimal::ZERO,
            accumulated_count: 0,
            period_start,
            period_end,
            created_at: now,
            updated_at: now,
        };
        store.commit(WriteBatch::new().insert(&next)?)?;
        info!(previous = %accumulator_id, next = %next.id, "rolled accumulator period");
        Ok(next.id)
    })
}

/// The accumulation window containing `service_date` for a plan limit:
/// calendar years, plan years anchored on the benefit plan's effective
/// date, or a single lifetime window.
fn derive_period(
    store: &MemoryStore,
    plan_limit_id: Uuid,
    service_date: NaiveDate,
) -> Result<(NaiveDate, NaiveDate)> {
    let Some((limit, _)) = store.get::<PlanLimit>(plan_limit_id)? else {
        return Err(invalid(
            "derive_period",
            format!("plan_limit {plan_limit_id} not found"),
        ));
    };

    match limit.period_type {
        PeriodType::CalendarYear => {
            let start = ymd(service_date.year(), 1, 1);
            let end = ymd(service_date.year() + 1, 1, 1);
            Ok((start, end))
        }
        PeriodType::PlanYear => {
            let Some((plan, _)) = store.get::<BenefitPlan>(limit.benefit_plan_id)? else {
                return Err(invalid(
                    "derive_period",
                    format!("benefit_plan {} not found", limit.benefit_plan_id),
                ));
            };
            let anchor = plan.effective_date;
            let mut start = anniversary(anchor, service_date.year());
            if start > service_date {
                start = anniversary(anchor, service_date.year() - 1);
            }
            let end = anniversary(anchor, start.year() + 1);
            Ok((start, end))
        }
        PeriodType::Lifetime => Ok((ymd(1900, 1, 1), ymd(9999, 12, 31))),
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    // Unreachable fallback keeps this total without panicking paths.
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or(NaiveDate::MIN)
}

/// The anchor's anniversary in `year`; Feb 29 anchors land on Mar 1 in
/// non-leap years.
fn anniversary(anchor: NaiveDate, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, anchor.month(), anchor.day())
        .unwrap_or_else(|| ymd(year, 3, 1))
}
