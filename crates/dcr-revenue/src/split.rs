//! Fixed-percentage revenue split.
//!
//! # Rule
//!
//! For an order amount `A` and a policy with `doctor_bps` / `broker_bps`:
//!
//! - `doctor_portion = floor(A * doctor_bps / 10_000)`
//! - `broker_portion = floor(A * broker_bps / 10_000)` when a broker is
//!   attached, otherwise zero
//! - the hospital keeps `A - doctor_portion - broker_portion`, so every
//!   rounding remainder lands on the hospital side and nothing is lost
//!
//! The doctor portion is only paid out when a doctor is attached. Otherwise
//! it is reported as `unallocated`, or added to the hospital share when
//! `redirect_unused_doctor_share` is set.
//!
//! With the default 5% / 5% policy this gives 90/5/5 with a broker and
//! 95/5/0 without one.

use crate::error::RevenueError;
use crate::money::{Money, BPS_SCALE};
use crate::types::RevenueSplit;

/// Default doctor commission: 5%.
pub const DEFAULT_DOCTOR_BPS: u32 = 500;

/// Default broker/agent commission: 5%.
pub const DEFAULT_BROKER_BPS: u32 = 500;

/// Commission rates applied by [`compute_split`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SplitPolicy {
    pub doctor_bps: u32,
    pub broker_bps: u32,
    /// Send the doctor portion of doctor-less orders to the hospital instead
    /// of leaving it unallocated.
    pub redirect_unused_doctor_share: bool,
}

impl Default for SplitPolicy {
    fn default() -> Self {
        Self {
            doctor_bps: DEFAULT_DOCTOR_BPS,
            broker_bps: DEFAULT_BROKER_BPS,
            redirect_unused_doctor_share: false,
        }
    }
}

impl SplitPolicy {
    pub fn validate(&self) -> Result<(), RevenueError> {
        if (self.doctor_bps as i64) + (self.broker_bps as i64) > BPS_SCALE {
            return Err(RevenueError::InvalidPolicy {
                doctor_bps: self.doctor_bps,
                broker_bps: self.broker_bps,
            });
        }
        Ok(())
    }
}

/// Split `amount` among hospital, doctor, and broker.
///
/// Pure and deterministic. Fails with [`RevenueError::InvalidAmount`] when
/// `amount` is negative, or [`RevenueError::InvalidPolicy`] when the policy
/// rates exceed 100%.
pub fn compute_split(
    amount: Money,
    has_doctor: bool,
    has_broker: bool,
    policy: &SplitPolicy,
) -> Result<RevenueSplit, RevenueError> {
    if amount.is_negative() {
        return Err(RevenueError::invalid_amount(format!(
            "amount {amount} is negative"
        )));
    }
    policy.validate()?;

    let overflow = || RevenueError::invalid_amount(format!("amount {amount} out of range"));

    let doctor_portion = amount
        .checked_mul_bps(policy.doctor_bps)
        .ok_or_else(overflow)?;
    let broker = if has_broker {
        amount
            .checked_mul_bps(policy.broker_bps)
            .ok_or_else(overflow)?
    } else {
        Money::ZERO
    };

    // Both portions are floors of non-negative fractions whose rates sum to
    // at most 1, so this cannot go negative.
    let mut hospital = amount - doctor_portion - broker;

    let (doctor, unallocated) = if has_doctor {
        (doctor_portion, Money::ZERO)
    } else if policy.redirect_unused_doctor_share {
        hospital += doctor_portion;
        (Money::ZERO, Money::ZERO)
    } else {
        (Money::ZERO, doctor_portion)
    };

    Ok(RevenueSplit {
        hospital,
        doctor,
        broker,
        unallocated,
    })
}
