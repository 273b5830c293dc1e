//! Monetary amounts without floating point.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Number of nano units in one whole currency unit.
pub const NANOS_PER_UNIT: i32 = 1_000_000_000;

/// Smallest accepted `nanos` component.
pub const NANOS_MIN: i32 = -999_999_999;

/// Largest accepted `nanos` component.
pub const NANOS_MAX: i32 = 999_999_999;

/// An amount of money in a given currency.
///
/// `units` is the whole amount; `nanos` is the fractional part in billionths of
/// a unit. For `{ "USD", 19, 990_000_000 }` the amount is 19.99 USD.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    /// ISO 4217 code (e.g. "USD", "EUR").
    #[serde(alias = "currencyCode")]
    pub currency_code: String,
    pub units: i64,
    pub nanos: i32,
}

impl Money {
    /// Build a validated amount.
    pub fn new(currency_code: impl Into<String>, units: i64, nanos: i32) -> DomainResult<Self> {
        let money = Self {
            currency_code: currency_code.into(),
            units,
            nanos,
        };
        money.validate()?;
        Ok(money)
    }

    /// Check the structural rules of a money triple.
    ///
    /// - `nanos` is within `[-999_999_999, 999_999_999]`
    /// - a non-zero `nanos` has the same sign as a non-zero `units`
    ///
    /// `currency_code` is carried as-is; an empty code is not an error.
    pub fn validate(&self) -> DomainResult<()> {
        if !(NANOS_MIN..=NANOS_MAX).contains(&self.nanos) {
            return Err(DomainError::validation(format!(
                "nanos out of range: {} (expected {NANOS_MIN}..={NANOS_MAX})",
                self.nanos
            )));
        }

        let mismatched = (self.units > 0 && self.nanos < 0) || (self.units < 0 && self.nanos > 0);
        if mismatched {
            return Err(DomainError::invariant(format!(
                "nanos sign must match units (units={}, nanos={})",
                self.units, self.nanos
            )));
        }

        Ok(())
    }

    pub fn is_zero(&self) -> bool {
        self.units == 0 && self.nanos == 0
    }

    pub fn is_negative(&self) -> bool {
        self.units < 0 || self.nanos < 0
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        write!(
            f,
            "{sign}{}.{:09} {}",
            self.units.unsigned_abs(),
            self.nanos.unsigned_abs(),
            self.currency_code
        )
    }
}
