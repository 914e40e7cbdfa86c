use chrono::NaiveDate;

use crate::error::RevenueError;
use crate::types::Order;

/// Caller-side order selection applied before [`aggregate`](crate::aggregate).
///
/// Date bounds are inclusive. `doctor_name` matches the trimmed doctor name
/// exactly; orders without a doctor never match a doctor filter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub doctor_name: Option<String>,
}

impl OrderFilter {
    /// Rejects `from > to`. Equal bounds select a single day.
    pub fn validate(&self) -> Result<(), RevenueError> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => Err(RevenueError::InvalidDateRange { from, to }),
            _ => Ok(()),
        }
    }

    fn doctor(&self) -> Option<&str> {
        self.doctor_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }

    pub fn matches(&self, order: &Order) -> bool {
        if let Some(from) = self.from {
            if order.date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if order.date > to {
                return false;
            }
        }
        match self.doctor() {
            Some(want) => order.doctor() == Some(want),
            None => true,
        }
    }

    /// Borrowing view of the matching orders, in input order.
    pub fn apply<'a>(&'a self, orders: &'a [Order]) -> impl Iterator<Item = &'a Order> + 'a {
        orders.iter().filter(move |o| self.matches(o))
    }
}
