use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures surfaced by split computation and order validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevenueError {
    /// Negative, non-numeric, or out-of-range amount.
    InvalidAmount { reason: String },
    /// Commission rates that add up to more than the whole amount.
    InvalidPolicy { doctor_bps: u32, broker_bps: u32 },
    /// Filter whose start date is after its end date.
    InvalidDateRange { from: NaiveDate, to: NaiveDate },
}

impl RevenueError {
    pub fn invalid_amount(reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            reason: reason.into(),
        }
    }

    pub fn is_invalid_amount(&self) -> bool {
        matches!(self, Self::InvalidAmount { .. })
    }

    /// Stable machine-readable code, used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::InvalidPolicy { .. } => "INVALID_POLICY",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
        }
    }
}

impl std::fmt::Display for RevenueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAmount { reason } => write!(f, "invalid amount: {reason}"),
            Self::InvalidPolicy {
                doctor_bps,
                broker_bps,
            } => write!(
                f,
                "invalid split policy: doctor_bps {doctor_bps} + broker_bps {broker_bps} exceeds 10000"
            ),
            Self::InvalidDateRange { from, to } => {
                write!(f, "invalid date range: from {from} is after to {to}")
            }
        }
    }
}

impl std::error::Error for RevenueError {}

/// An order inside an aggregation batch failed validation.
///
/// The whole batch fails; `index` is the zero-based position in the input
/// sequence and `order_id` is the caller's identifier when one was supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateError {
    pub index: usize,
    pub order_id: Option<String>,
    pub source: RevenueError,
}

impl std::fmt::Display for AggregateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.order_id {
            Some(id) => write!(f, "order #{} (id={id}): {}", self.index, self.source),
            None => write!(f, "order #{}: {}", self.index, self.source),
        }
    }
}

impl std::error::Error for AggregateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
