//! Monetary amount type

use super::error::LedgerError;
use rust_decimal::Decimal;
use std::fmt;

/// Strictly positive decimal amount for a deposit, withdrawal or transfer
///
/// Backed by [`Decimal`] so there is no binary floating point drift. The
/// only public way to obtain one is through the validator (or `TryFrom`,
/// which delegates to it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    pub(crate) fn new_unchecked(value: Decimal) -> Self {
        Amount(value)
    }

    /// The underlying decimal value
    pub fn value(self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = LedgerError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        crate::core::validator::validate_decimal(value)
    }
}
