//! JSON wire types for the revenue service.
//!
//! Field names are camelCase. The referral party is canonically called
//! **broker** on the wire (`brokerName`, `brokerRevenue`, `brokerBreakdown`).
//! Older order documents call the same party an agent, so `agentName` is
//! accepted as an input alias; outputs never use the agent spelling.

mod amount;
mod ordered;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use dcr_revenue::{
    AggregateError, DailyTotals, Money, Order, OrderFilter, PartyTotals, RevenueError,
    RevenueReport, RevenueSplit, TestLine,
};

pub use amount::{RawAmount, WireMoney};
pub use ordered::OrderedEntries;

// ---------------------------------------------------------------------------
// Orders (inbound)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTestLine {
    pub name: String,
    pub price: RawAmount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireOrder {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub amount: RawAmount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(default, alias = "agentName", skip_serializing_if = "Option::is_none")]
    pub broker_name: Option<String>,
    #[serde(deserialize_with = "de_order_date")]
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tests: Vec<WireTestLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_amount: Option<RawAmount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_amount: Option<RawAmount>,
}

impl WireOrder {
    /// Convert to the core order, parsing every amount.
    ///
    /// A lone `paidAmount` or `dueAmount` is completed from the order amount
    /// (`due = amount - paid`, `paid = amount - due`); negative results are
    /// rejected by [`Order::validate`] during aggregation.
    pub fn to_order(&self) -> Result<Order, RevenueError> {
        let amount = self.amount.parse()?;

        let mut tests = Vec::with_capacity(self.tests.len());
        for t in &self.tests {
            tests.push(TestLine::new(t.name.clone(), t.price.parse()?));
        }

        let paid = self.paid_amount.as_ref().map(RawAmount::parse).transpose()?;
        let due = self.due_amount.as_ref().map(RawAmount::parse).transpose()?;
        let out_of_range = || RevenueError::invalid_amount("payment pair out of range");
        let payment = match (paid, due) {
            (Some(p), Some(d)) => Some((p, d)),
            (Some(p), None) => Some((p, amount.checked_sub(p).ok_or_else(out_of_range)?)),
            (None, Some(d)) => Some((amount.checked_sub(d).ok_or_else(out_of_range)?, d)),
            (None, None) => None,
        };

        let mut order = Order::new(amount, self.date).with_tests(tests);
        order.id = self.id.clone();
        order.doctor_name = self.doctor_name.clone();
        order.broker_name = self.broker_name.clone();
        if let Some((paid, due)) = payment {
            order = order.with_payment(paid, due);
        }
        Ok(order)
    }
}

/// Convert a batch of wire orders, locating the first failure by index.
pub fn orders_from_wire(orders: &[WireOrder]) -> Result<Vec<Order>, AggregateError> {
    orders
        .iter()
        .enumerate()
        .map(|(index, w)| {
            w.to_order().map_err(|source| AggregateError {
                index,
                order_id: w.id.clone(),
                source,
            })
        })
        .collect()
}

/// Accepts `YYYY-MM-DD` or a full timestamp (`2024-01-01T09:30:00Z`,
/// `2024-01-01T09:30:00`), keeping only the calendar date.
fn de_order_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_order_date(&raw).map_err(serde::de::Error::custom)
}

pub fn parse_order_date(raw: &str) -> Result<NaiveDate, String> {
    let s = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt.date());
    }
    Err(format!("invalid order date: {raw:?}"))
}

// ---------------------------------------------------------------------------
// Split
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitRequest {
    pub amount: RawAmount,
    #[serde(default)]
    pub has_doctor: bool,
    #[serde(default, alias = "hasAgent")]
    pub has_broker: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSplit {
    pub amount: WireMoney,
    pub hospital_share: WireMoney,
    pub doctor_share: WireMoney,
    pub broker_share: WireMoney,
    pub unallocated_share: WireMoney,
}

impl WireSplit {
    pub fn new(amount: Money, split: &RevenueSplit) -> Self {
        Self {
            amount: amount.into(),
            hospital_share: split.hospital.into(),
            doctor_share: split.doctor.into(),
            broker_share: split.broker.into(),
            unallocated_share: split.unallocated.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Breakdown presentation order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// First encounter in the order sequence.
    #[default]
    Insertion,
    /// Doctors and brokers by total revenue (highest first), days ascending.
    RevenueDesc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Insertion => "insertion",
            SortOrder::RevenueDesc => "revenue_desc",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "insertion" => Ok(SortOrder::Insertion),
            "revenue_desc" | "revenue-desc" => Ok(SortOrder::RevenueDesc),
            other => Err(format!(
                "invalid sort '{other}'. expected one of: insertion | revenue_desc"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
}

impl From<WireFilter> for OrderFilter {
    fn from(w: WireFilter) -> Self {
        OrderFilter {
            from: w.from,
            to: w.to,
            doctor_name: w.doctor_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub orders: Vec<WireOrder>,
    #[serde(default)]
    pub filter: WireFilter,
    #[serde(default)]
    pub sort: Option<SortOrder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePartyTotals {
    pub orders: u64,
    pub total_revenue: WireMoney,
    pub commission: WireMoney,
}

impl From<&PartyTotals> for WirePartyTotals {
    fn from(t: &PartyTotals) -> Self {
        Self {
            orders: t.orders,
            total_revenue: t.total_revenue.into(),
            commission: t.commission.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDailyTotals {
    pub total_amount: WireMoney,
    pub paid_amount: WireMoney,
    pub due_amount: WireMoney,
}

impl From<&DailyTotals> for WireDailyTotals {
    fn from(t: &DailyTotals) -> Self {
        Self {
            total_amount: t.total_amount.into(),
            paid_amount: t.paid_amount.into(),
            due_amount: t.due_amount.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireReport {
    pub currency: String,
    pub order_count: u64,
    pub total_revenue: WireMoney,
    pub hospital_revenue: WireMoney,
    pub doctor_revenue: WireMoney,
    pub broker_revenue: WireMoney,
    pub unallocated_revenue: WireMoney,
    pub doctor_breakdown: OrderedEntries<WirePartyTotals>,
    pub broker_breakdown: OrderedEntries<WirePartyTotals>,
    pub daily_breakdown: OrderedEntries<WireDailyTotals>,
}

impl WireReport {
    pub fn new(report: &RevenueReport, currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            order_count: report.order_count,
            total_revenue: report.total_revenue.into(),
            hospital_revenue: report.hospital_revenue.into(),
            doctor_revenue: report.doctor_revenue.into(),
            broker_revenue: report.broker_revenue.into(),
            unallocated_revenue: report.unallocated_revenue.into(),
            doctor_breakdown: OrderedEntries(
                report
                    .doctor_breakdown
                    .iter()
                    .map(|(k, v)| (k.clone(), v.into()))
                    .collect(),
            ),
            broker_breakdown: OrderedEntries(
                report
                    .broker_breakdown
                    .iter()
                    .map(|(k, v)| (k.clone(), v.into()))
                    .collect(),
            ),
            daily_breakdown: OrderedEntries(
                report
                    .daily_breakdown
                    .iter()
                    .map(|(d, v)| (d.format("%Y-%m-%d").to_string(), v.into()))
                    .collect(),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    /// "INVALID_AMOUNT" | "INVALID_POLICY" | "INVALID_DATE_RANGE"
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
}

impl From<&RevenueError> for ErrorResponse {
    fn from(e: &RevenueError) -> Self {
        Self {
            error: e.to_string(),
            code: e.code().to_string(),
            order_index: None,
            order_id: None,
        }
    }
}

impl From<&AggregateError> for ErrorResponse {
    fn from(e: &AggregateError) -> Self {
        Self {
            error: e.to_string(),
            code: e.source.code().to_string(),
            order_index: Some(e.index),
            order_id: e.order_id.clone(),
        }
    }
}
