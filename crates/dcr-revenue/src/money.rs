//! Fixed-point money type.
//!
//! # Motivation
//!
//! Every amount the allocator touches (order totals, test prices, shares,
//! report sums) is a Taka value stored as an `i64` count of poisha
//! (1 Taka = 100 poisha). Floating point is never used for accumulation, so
//! summing thousands of orders gives the same answer on every platform.
//!
//! `Money` wraps the raw `i64` so the type system prevents:
//! - Implicit construction from raw `i64` (no `From<i64>` impl).
//! - Mixing money with unrelated integers (order counts, basis points).
//!
//! # Arithmetic
//!
//! - `Add`, `Sub`, `AddAssign` are closed over `Money` and follow standard
//!   integer overflow semantics.
//! - `checked_add` is what the aggregation path uses; overflow there is a
//!   data error, not something to clamp.
//! - `checked_mul_bps` applies a basis-point rate and floors the result.

use std::ops::{Add, AddAssign, Sub};

use crate::error::RevenueError;

/// Minor units per Taka.
pub const MINOR_PER_TAKA: i64 = 100;

/// Basis points in one whole (100%).
pub const BPS_SCALE: i64 = 10_000;

// ---------------------------------------------------------------------------
// Money newtype
// ---------------------------------------------------------------------------

/// A fixed-point Taka amount in minor units (poisha).
///
/// `Money::from_taka(1)` == `Money::from_minor(100)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Construct from a raw count of minor units.
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Construct from a whole-Taka amount.
    ///
    /// Saturates at the representable range; use [`Money::parse_decimal`]
    /// for untrusted input.
    #[inline]
    pub const fn from_taka(taka: i64) -> Self {
        Money(taka.saturating_mul(MINOR_PER_TAKA))
    }

    /// Raw minor units.
    #[inline]
    pub const fn minor(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// `true` when the amount has no fractional poisha part.
    #[inline]
    pub fn is_whole_taka(self) -> bool {
        self.0 % MINOR_PER_TAKA == 0
    }

    /// Checked addition. `None` on `i64` overflow.
    #[inline]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction. `None` on `i64` overflow.
    #[inline]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// `floor(self * bps / 10_000)`, computed in `i128`.
    ///
    /// Only meaningful for non-negative amounts and `bps <= 10_000`; the
    /// result then always fits back into `i64`.
    pub fn checked_mul_bps(self, bps: u32) -> Option<Money> {
        let wide = (self.0 as i128) * (bps as i128);
        let scaled = wide.div_euclid(BPS_SCALE as i128);
        i64::try_from(scaled).ok().map(Money)
    }

    /// Parse a decimal Taka string such as `"1000"`, `"12.5"`, `"-3.25"`.
    ///
    /// Accepted grammar: optional sign, one or more digits, optionally a `.`
    /// followed by one or more digits. Fractional digits past the second
    /// must be zeros. Everything else (`NaN`, `inf`, exponents, empty input,
    /// sub-poisha precision, overflow) is [`RevenueError::InvalidAmount`].
    pub fn parse_decimal(raw: &str) -> Result<Money, RevenueError> {
        let s = raw.trim();
        let invalid = |reason: &str| RevenueError::invalid_amount(format!("{reason}: {raw:?}"));

        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            Some(_) => (false, s),
            None => return Err(invalid("empty amount")),
        };

        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (body, None),
        };

        if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("not a decimal number"));
        }

        let mut frac_minor: i64 = 0;
        if let Some(frac) = frac_part {
            if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("not a decimal number"));
            }
            let (kept, rest) = frac.split_at(frac.len().min(2));
            if rest.bytes().any(|b| b != b'0') {
                return Err(invalid("more precise than one poisha"));
            }
            for (i, b) in kept.bytes().enumerate() {
                let digit = (b - b'0') as i64;
                frac_minor += if i == 0 { digit * 10 } else { digit };
            }
        }

        let whole: i64 = int_part.parse().map_err(|_| invalid("amount out of range"))?;
        let minor = whole
            .checked_mul(MINOR_PER_TAKA)
            .and_then(|m| m.checked_add(frac_minor))
            .ok_or_else(|| invalid("amount out of range"))?;

        Ok(Money(if negative { -minor } else { minor }))
    }
}

// ---------------------------------------------------------------------------
// Arithmetic operators (closed over Money)
// ---------------------------------------------------------------------------

impl Add for Money {
    type Output = Money;
    #[inline]
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;
    #[inline]
    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let taka = self.0 / MINOR_PER_TAKA;
        let poisha = (self.0 % MINOR_PER_TAKA).abs();
        // -0.50 truncates to taka == 0; keep the sign.
        if self.0 < 0 && taka == 0 {
            write!(f, "-{taka}.{poisha:02}")
        } else {
            write!(f, "{taka}.{poisha:02}")
        }
    }
}
