use std::str::FromStr;

use rust_decimal::Decimal;

use crate::db::contribution::{ContributionStatus, PaymentMethod};
use crate::error::{LedgerError, LedgerResult};

/// Widths of the bounded free-text columns.
pub const REFERENCE_ID_MAX_LEN: usize = 100;
pub const RECEIPT_URL_MAX_LEN: usize = 255;

/// Largest value a `NUMERIC(10, 2)` column holds.
const MAX_AMOUNT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

pub fn parse_amount(raw: &str) -> LedgerResult<Decimal> {
    let amount = Decimal::from_str(raw.trim())
        .map_err(|_| LedgerError::validation(format!("Amount '{}' is not a number", raw.trim())))?;
    check_amount(amount)
}

/// Positive, at most two fractional digits, within column range. The result
/// is rescaled to exactly two fractional digits.
pub fn check_amount(amount: Decimal) -> LedgerResult<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::validation("Amount must be greater than zero"));
    }
    if amount.normalize().scale() > 2 {
        return Err(LedgerError::validation(
            "Amount cannot have more than two decimal places",
        ));
    }
    if amount > MAX_AMOUNT {
        return Err(LedgerError::validation(format!(
            "Amount cannot exceed {MAX_AMOUNT}"
        )));
    }

    let mut amount = amount.normalize();
    amount.rescale(2);
    Ok(amount)
}

pub fn parse_method(raw: &str) -> LedgerResult<PaymentMethod> {
    PaymentMethod::from_str(raw.trim()).map_err(|_| {
        LedgerError::validation(format!(
            "Invalid payment method '{}'. Must be one of: cash, bkash, nagad, bank, rocket",
            raw.trim()
        ))
    })
}

/// Accepts `YYYY-MM` with a month between 01 and 12.
pub fn check_month(month: Option<String>) -> LedgerResult<Option<String>> {
    let Some(month) = non_blank(month) else {
        return Ok(None);
    };

    let valid = match month.split_once('-') {
        Some((year, mm)) => {
            year.len() == 4
                && mm.len() == 2
                && year.bytes().chain(mm.bytes()).all(|b| b.is_ascii_digit())
                && matches!(mm.parse::<u8>(), Ok(1..=12))
        }
        None => false,
    };

    if !valid {
        return Err(LedgerError::validation(format!(
            "Month '{month}' must use the YYYY-MM format"
        )));
    }
    Ok(Some(month))
}

pub fn parse_status_filter(raw: &str) -> LedgerResult<ContributionStatus> {
    ContributionStatus::from_str(raw).map_err(|_| {
        LedgerError::validation(format!(
            "Invalid status '{raw}'. Must be \"pending\", \"approved\" or \"rejected\""
        ))
    })
}

/// A resolution decision must be a status reachable from pending.
pub fn parse_decision(raw: &str) -> LedgerResult<ContributionStatus> {
    match ContributionStatus::from_str(raw) {
        Ok(decision) if ContributionStatus::Pending.can_transition_to(decision) => Ok(decision),
        _ => Err(LedgerError::validation(
            "Invalid status. Must be \"approved\" or \"rejected\"",
        )),
    }
}

/// Form clients send empty strings for untouched optional fields.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn required_text(field: &str, value: Option<String>) -> LedgerResult<String> {
    non_blank(value).ok_or_else(|| LedgerError::validation(format!("{field} is required")))
}

/// [`non_blank`] for a column of bounded width, counted in characters.
pub fn bounded_text(
    field: &str,
    value: Option<String>,
    max_len: usize,
) -> LedgerResult<Option<String>> {
    let value = non_blank(value);
    if let Some(text) = &value {
        let len = text.chars().count();
        if len > max_len {
            return Err(LedgerError::validation(format!(
                "{field} cannot be longer than {max_len} characters (got {len})"
            )));
        }
    }
    Ok(value)
}

pub fn reference_id(value: Option<String>) -> LedgerResult<Option<String>> {
    bounded_text("Reference ID", value, REFERENCE_ID_MAX_LEN)
}

pub fn receipt_url(value: Option<String>) -> LedgerResult<Option<String>> {
    bounded_text("Receipt URL", value, RECEIPT_URL_MAX_LEN)
}
