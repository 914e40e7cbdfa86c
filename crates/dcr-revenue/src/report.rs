//! Order aggregation into a revenue report.
//!
//! # Determinism
//! `aggregate` is pure: no IO, no clock, no shared state. The same order
//! sequence and policy always produce the same report, including breakdown
//! order (first encounter).
//!
//! # Failure
//! The first order that fails validation aborts the whole batch with an
//! [`AggregateError`] naming its index. Partial reports are never returned.

use chrono::NaiveDate;

use crate::breakdown::Breakdown;
use crate::error::{AggregateError, RevenueError};
use crate::money::Money;
use crate::split::{compute_split, SplitPolicy};
use crate::types::Order;

/// Per-doctor or per-broker totals.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PartyTotals {
    pub orders: u64,
    pub total_revenue: Money,
    pub commission: Money,
}

/// Per-day totals.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DailyTotals {
    pub total_amount: Money,
    pub paid_amount: Money,
    pub due_amount: Money,
}

/// Aggregate over a set of orders.
///
/// `total_revenue == hospital_revenue + doctor_revenue + broker_revenue + unallocated_revenue`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RevenueReport {
    pub order_count: u64,
    pub total_revenue: Money,
    pub hospital_revenue: Money,
    pub doctor_revenue: Money,
    pub broker_revenue: Money,
    pub unallocated_revenue: Money,
    pub doctor_breakdown: Breakdown<String, PartyTotals>,
    pub broker_breakdown: Breakdown<String, PartyTotals>,
    pub daily_breakdown: Breakdown<NaiveDate, DailyTotals>,
}

impl RevenueReport {
    /// Reorder the doctor and broker breakdowns by total revenue, highest
    /// first. Ties keep first-encounter order. The daily breakdown is sorted
    /// by date ascending.
    pub fn sort_by_revenue_desc(&mut self) {
        let by_revenue =
            |a: &(String, PartyTotals), b: &(String, PartyTotals)| b.1.total_revenue.cmp(&a.1.total_revenue);
        self.doctor_breakdown.sort_by(by_revenue);
        self.broker_breakdown.sort_by(by_revenue);
        self.daily_breakdown.sort_by(|a, b| a.0.cmp(&b.0));
    }
}

/// Build a [`RevenueReport`] from `orders` under `policy`.
///
/// The caller is responsible for any date-range or doctor filtering; every
/// order passed in is counted.
pub fn aggregate<'a, I>(orders: I, policy: &SplitPolicy) -> Result<RevenueReport, AggregateError>
where
    I: IntoIterator<Item = &'a Order>,
{
    let mut report = RevenueReport::default();

    for (index, order) in orders.into_iter().enumerate() {
        accumulate(&mut report, order, policy).map_err(|source| AggregateError {
            index,
            order_id: order.id.clone(),
            source,
        })?;
    }

    Ok(report)
}

/// Validate every order up front, so an invalid order fails the batch even
/// when a later filter would have excluded it. Indices are positions in
/// `orders`.
pub fn validate_orders<'a, I>(orders: I) -> Result<(), AggregateError>
where
    I: IntoIterator<Item = &'a Order>,
{
    for (index, order) in orders.into_iter().enumerate() {
        order.validate().map_err(|source| AggregateError {
            index,
            order_id: order.id.clone(),
            source,
        })?;
    }
    Ok(())
}

fn accumulate(report: &mut RevenueReport, order: &Order, policy: &SplitPolicy) -> Result<(), RevenueError> {
    order.validate()?;
    let split = compute_split(order.amount, order.has_doctor(), order.has_broker(), policy)?;

    add(&mut report.total_revenue, order.amount)?;
    add(&mut report.hospital_revenue, split.hospital)?;
    add(&mut report.doctor_revenue, split.doctor)?;
    add(&mut report.broker_revenue, split.broker)?;
    add(&mut report.unallocated_revenue, split.unallocated)?;
    report.order_count += 1;

    if let Some(name) = order.doctor() {
        let e = report.doctor_breakdown.upsert(name.to_string());
        e.orders += 1;
        add(&mut e.total_revenue, order.amount)?;
        add(&mut e.commission, split.doctor)?;
    }

    if let Some(name) = order.broker() {
        let e = report.broker_breakdown.upsert(name.to_string());
        e.orders += 1;
        add(&mut e.total_revenue, order.amount)?;
        add(&mut e.commission, split.broker)?;
    }

    let (paid, due) = match order.payment {
        Some(p) => (p.paid, p.due),
        None => (order.amount, Money::ZERO),
    };
    let day = report.daily_breakdown.upsert(order.date);
    add(&mut day.total_amount, order.amount)?;
    add(&mut day.paid_amount, paid)?;
    add(&mut day.due_amount, due)?;

    Ok(())
}

fn add(acc: &mut Money, v: Money) -> Result<(), RevenueError> {
    *acc = acc
        .checked_add(v)
        .ok_or_else(|| RevenueError::invalid_amount("running total out of range"))?;
    Ok(())
}
