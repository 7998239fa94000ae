//! Input validation
//!
//! Pure functions that turn raw caller input into validated domain values.
//! This is the only place syntax errors are detected: every value that
//! reaches an [`Account`](crate::core::Account) has passed through here.
//!
//! None of these functions have side effects, so callers may validate a full
//! request up front and only then start mutating state.

use crate::types::{AccountId, Amount, LedgerError};
use rust_decimal::Decimal;

const ACCOUNT_ID_MIN_LEN: usize = 8;
const ACCOUNT_ID_MAX_LEN: usize = 12;

/// Parse a raw string as a decimal number
///
/// Accepts plain (`"12.50"`) and scientific (`"1.25e1"`) notation and ignores
/// surrounding whitespace. Plain input must be representable without
/// rounding, so digits beyond `Decimal`'s 28-place scale are rejected rather
/// than silently dropped.
///
/// # Errors
///
/// Returns `MalformedAmount` (E003) if the input is empty, not a number, or
/// more precise than a `Decimal` can hold.
fn parse_decimal(raw: &str) -> Result<Decimal, LedgerError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::malformed_amount(raw));
    }

    let parsed = if trimmed.contains(['e', 'E']) {
        Decimal::from_scientific(trimmed)
    } else {
        Decimal::from_str_exact(trimmed)
    };
    parsed.map_err(|_| LedgerError::malformed_amount(raw))
}

/// Validate a raw amount for a deposit, withdrawal or transfer
///
/// # Errors
///
/// - `MalformedAmount` (E003) if the input is not parseable as a decimal
/// - `InvalidAmount` (E001) if the parsed value is zero or negative
pub fn validate_amount(raw: &str) -> Result<Amount, LedgerError> {
    let value = parse_decimal(raw)?;
    if value <= Decimal::ZERO {
        return Err(LedgerError::invalid_amount(raw.trim()));
    }
    Ok(Amount::new_unchecked(value))
}

/// Validate an already-numeric amount
///
/// # Errors
///
/// Returns `InvalidAmount` (E001) if the value is zero or negative.
pub fn validate_decimal(value: Decimal) -> Result<Amount, LedgerError> {
    if value <= Decimal::ZERO {
        return Err(LedgerError::invalid_amount(value));
    }
    Ok(Amount::new_unchecked(value))
}

/// Validate the balance an account is opened with
///
/// Unlike [`validate_amount`], zero is accepted: a fresh account starts empty.
///
/// # Errors
///
/// - `MalformedAmount` (E003) if the input is not parseable as a decimal
/// - `InvalidAmount` (E001) if the parsed value is negative
pub fn validate_opening_balance(raw: &str) -> Result<Decimal, LedgerError> {
    let value = parse_decimal(raw)?;
    if value < Decimal::ZERO {
        return Err(LedgerError::invalid_amount(raw.trim()));
    }
    Ok(value)
}

/// Validate an account identifier against `^[A-Za-z0-9]{8,12}$`
///
/// # Errors
///
/// Returns `MalformedAccountId` (E005) on any length or character mismatch.
pub fn validate_account_id(raw: &str) -> Result<AccountId, LedgerError> {
    let well_formed = (ACCOUNT_ID_MIN_LEN..=ACCOUNT_ID_MAX_LEN).contains(&raw.len())
        && raw.bytes().all(|b| b.is_ascii_alphanumeric());

    if !well_formed {
        return Err(LedgerError::malformed_account_id(raw));
    }
    Ok(AccountId::new_unchecked(raw.to_string()))
}

/// Validate an account owner's name
///
/// Returns the name with surrounding whitespace removed.
///
/// # Errors
///
/// Returns `EmptyOwnerName` (E006) if nothing is left after trimming.
pub fn validate_owner_name(raw: &str) -> Result<String, LedgerError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(LedgerError::EmptyOwnerName);
    }
    Ok(name.to_string())
}
