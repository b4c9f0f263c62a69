use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Monetary amount held at a fixed scale of two decimal places.
///
/// Any sign is representable; whether an amount is acceptable is decided by
/// the account that receives it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const DECIMALS: u32 = 2;
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Rounds half to even when `value` carries more than two decimals.
    pub fn new(value: Decimal) -> Self {
        Self(value.round_dp_with_strategy(Self::DECIMALS, RoundingStrategy::MidpointNearestEven))
    }

    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// `None` when the sum does not fit.
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    pub fn from_decimal_str(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        Decimal::from_str(s).ok().map(Self::new)
    }
}

impl FromStr for Money {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_decimal_str(s).ok_or_else(|| format!("Invalid Money format: {}", s))
    }
}

impl From<i64> for Money {
    fn from(units: i64) -> Self {
        Money::from_units(units)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Money::from_decimal_str(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid Money format: {}", s)))
    }
}
