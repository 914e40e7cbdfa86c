use chrono::NaiveDate;

use crate::error::RevenueError;
use crate::money::Money;

/// One priced diagnostic test on an order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestLine {
    pub name: String,
    pub price: Money,
}

impl TestLine {
    pub fn new<S: Into<String>>(name: S, price: Money) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// Explicit paid/due pair carried by some orders.
///
/// Orders without one are treated as fully paid when summarised per day.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Payment {
    pub paid: Money,
    pub due: Money,
}

/// A billable event: a consultation or a panel of diagnostic tests.
///
/// `amount` is the order total. When `tests` is non-empty it must equal the
/// sum of test prices; consultation-only orders carry no tests and the
/// amount is the flat doctor fee.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    /// Caller-side identifier, echoed back in aggregation errors.
    pub id: Option<String>,
    pub amount: Money,
    pub doctor_name: Option<String>,
    pub broker_name: Option<String>,
    pub date: NaiveDate,
    pub tests: Vec<TestLine>,
    pub payment: Option<Payment>,
}

impl Order {
    /// Minimal order: amount and date, no attribution, no tests.
    pub fn new(amount: Money, date: NaiveDate) -> Self {
        Self {
            id: None,
            amount,
            doctor_name: None,
            broker_name: None,
            date,
            tests: Vec::new(),
            payment: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_doctor(mut self, name: impl Into<String>) -> Self {
        self.doctor_name = Some(name.into());
        self
    }

    pub fn with_broker(mut self, name: impl Into<String>) -> Self {
        self.broker_name = Some(name.into());
        self
    }

    pub fn with_tests(mut self, tests: Vec<TestLine>) -> Self {
        self.tests = tests;
        self
    }

    pub fn with_payment(mut self, paid: Money, due: Money) -> Self {
        self.payment = Some(Payment { paid, due });
        self
    }

    /// Trimmed doctor name, `None` when absent or blank.
    pub fn doctor(&self) -> Option<&str> {
        present(self.doctor_name.as_deref())
    }

    /// Trimmed broker name, `None` when absent or blank.
    pub fn broker(&self) -> Option<&str> {
        present(self.broker_name.as_deref())
    }

    pub fn has_doctor(&self) -> bool {
        self.doctor().is_some()
    }

    pub fn has_broker(&self) -> bool {
        self.broker().is_some()
    }

    /// Check the amount invariants of a single order.
    ///
    /// The split itself rejects a negative amount; this adds the checks that
    /// only make sense with the whole record in hand.
    pub fn validate(&self) -> Result<(), RevenueError> {
        if self.amount.is_negative() {
            return Err(RevenueError::invalid_amount(format!(
                "order amount {} is negative",
                self.amount
            )));
        }

        if !self.tests.is_empty() {
            let mut sum = Money::ZERO;
            for t in &self.tests {
                if t.price.is_negative() {
                    return Err(RevenueError::invalid_amount(format!(
                        "test {:?} has negative price {}",
                        t.name, t.price
                    )));
                }
                sum = sum
                    .checked_add(t.price)
                    .ok_or_else(|| RevenueError::invalid_amount("sum of test prices overflows"))?;
            }
            if sum != self.amount {
                return Err(RevenueError::invalid_amount(format!(
                    "order amount {} does not match sum of test prices {}",
                    self.amount, sum
                )));
            }
        }

        if let Some(p) = self.payment {
            if p.paid.is_negative() || p.due.is_negative() {
                return Err(RevenueError::invalid_amount(format!(
                    "payment pair must be non-negative, got paid={} due={}",
                    p.paid, p.due
                )));
            }
        }

        Ok(())
    }
}

fn present(name: Option<&str>) -> Option<&str> {
    name.map(str::trim).filter(|n| !n.is_empty())
}

/// Result of splitting one amount.
///
/// `hospital + doctor + broker + unallocated == amount` always holds.
/// `unallocated` is the doctor portion of an order with no doctor attached
/// when the policy does not redirect it to the hospital.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RevenueSplit {
    pub hospital: Money,
    pub doctor: Money,
    pub broker: Money,
    pub unallocated: Money,
}

impl RevenueSplit {
    /// Sum of the three paid-out shares (excludes `unallocated`).
    pub fn distributed(&self) -> Money {
        self.hospital + self.doctor + self.broker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn blank_names_are_absent() {
        let o = Order::new(Money::from_taka(10), day())
            .with_doctor("   ")
            .with_broker("");
        assert!(!o.has_doctor());
        assert!(!o.has_broker());
    }

    #[test]
    fn names_are_trimmed() {
        let o = Order::new(Money::from_taka(10), day()).with_doctor(" Dr. A ");
        assert_eq!(o.doctor(), Some("Dr. A"));
    }

    #[test]
    fn tests_must_sum_to_amount() {
        let ok = Order::new(Money::from_taka(800), day()).with_tests(vec![
            TestLine::new("CBC", Money::from_taka(300)),
            TestLine::new("X-Ray", Money::from_taka(500)),
        ]);
        assert!(ok.validate().is_ok());

        let bad = Order::new(Money::from_taka(900), day()).with_tests(vec![
            TestLine::new("CBC", Money::from_taka(300)),
            TestLine::new("X-Ray", Money::from_taka(500)),
        ]);
        assert!(bad.validate().unwrap_err().is_invalid_amount());
    }

    #[test]
    fn negative_payment_is_invalid() {
        let o = Order::new(Money::from_taka(100), day())
            .with_payment(Money::from_taka(-1), Money::from_taka(101));
        assert!(o.validate().is_err());
    }
}
