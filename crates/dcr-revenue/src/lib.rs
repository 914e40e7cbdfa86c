//! dcr-revenue
//!
//! Revenue allocation for the diagnostic center.
//! - Fixed-point Taka amounts (`Money`, minor units)
//! - Fixed-percentage hospital / doctor / broker split
//! - Aggregation of orders into totals and per-doctor, per-broker, per-day
//!   breakdowns
//! - Pure deterministic logic (no IO, no time, no persistence)

mod error;
mod money;
mod split;
mod types;

pub mod breakdown;
pub mod filter;
pub mod report;

pub use breakdown::Breakdown;
pub use error::{AggregateError, RevenueError};
pub use filter::OrderFilter;
pub use money::{Money, BPS_SCALE, MINOR_PER_TAKA};
pub use report::{aggregate, validate_orders, DailyTotals, PartyTotals, RevenueReport};
pub use split::{compute_split, SplitPolicy, DEFAULT_BROKER_BPS, DEFAULT_DOCTOR_BPS};
pub use types::{Order, Payment, RevenueSplit, TestLine};
