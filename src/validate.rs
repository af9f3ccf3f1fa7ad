use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

/// Inline validation message for a single form field. `Display` is exactly
/// what the form shows under the field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("{0}")]
    Required(&'static str),

    #[error("Amount must be a positive number.")]
    NotPositive,

    #[error("Amount must be at least $0.01.")]
    BelowMinimum,

    #[error("Amount cannot have more than two decimal places.")]
    TooPrecise,

    #[error("Enter the date as YYYY-MM-DD.")]
    BadDate,

    #[error("Date cannot be in the past.")]
    PastDate,

    #[error("Please enter a valid email.")]
    BadEmail,

    #[error("{label} must be at least {min} characters.")]
    TooShort { label: &'static str, min: usize },

    #[error("{label} cannot exceed {max} characters.")]
    TooLong { label: &'static str, max: usize },

    #[error("Invalid payee selected.")]
    UnknownPayee,

    #[error("Source and destination accounts cannot be the same.")]
    SameAccount,

    #[error("New passwords don't match")]
    PasswordMismatch,
}

fn parse_positive(input: &str) -> Result<(String, f64), FieldError> {
    let cleaned: String = input
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if cleaned.is_empty() {
        return Err(FieldError::Required("Please enter an amount."));
    }
    let value: f64 = cleaned.parse().map_err(|_| FieldError::NotPositive)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(FieldError::NotPositive);
    }
    Ok((cleaned, value))
}

/// Any amount above zero. Accepts an optional leading `$` and thousands
/// separators.
pub fn positive_amount(input: &str) -> Result<f64, FieldError> {
    parse_positive(input).map(|(_, value)| value)
}

/// Payment amount in whole cents: positive, at most two decimals and at
/// least 0.01.
pub fn amount(input: &str) -> Result<f64, FieldError> {
    let (cleaned, value) = parse_positive(input)?;
    if let Some((_, decimals)) = cleaned.split_once('.') {
        if decimals.len() > 2 {
            return Err(FieldError::TooPrecise);
        }
    }
    if value < 0.01 {
        return Err(FieldError::BelowMinimum);
    }
    Ok(value)
}

/// Optional calendar date in ISO form. Empty input is `Ok(None)`.
pub fn optional_date(input: &str, today: NaiveDate) -> Result<Option<NaiveDate>, FieldError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| FieldError::BadDate)?;
    if date < today {
        return Err(FieldError::PastDate);
    }
    Ok(Some(date))
}

pub fn required_date(
    input: &str,
    today: NaiveDate,
    missing: &'static str,
) -> Result<NaiveDate, FieldError> {
    optional_date(input, today)?.ok_or(FieldError::Required(missing))
}

fn email_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[A-Za-z]{2,}$").ok())
        .as_ref()
}

pub fn email(input: &str) -> Result<(), FieldError> {
    if email_regex().is_some_and(|re| re.is_match(input.trim())) {
        Ok(())
    } else {
        Err(FieldError::BadEmail)
    }
}

/// Minimum length in characters (not bytes).
pub fn min_len(input: &str, label: &'static str, min: usize) -> Result<(), FieldError> {
    if input.chars().count() < min {
        Err(FieldError::TooShort { label, min })
    } else {
        Ok(())
    }
}

pub fn max_len(input: &str, label: &'static str, max: usize) -> Result<(), FieldError> {
    if input.chars().count() > max {
        Err(FieldError::TooLong { label, max })
    } else {
        Ok(())
    }
}

/// A selector value that must be present, with `message` shown otherwise.
pub fn selected<'a>(value: Option<&'a str>, message: &'static str) -> Result<&'a str, FieldError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(FieldError::Required(message)),
    }
}

pub fn different_accounts(from: &str, to: &str) -> Result<(), FieldError> {
    if from == to {
        Err(FieldError::SameAccount)
    } else {
        Ok(())
    }
}

pub fn passwords_match(new: &str, confirm: &str) -> Result<(), FieldError> {
    if new == confirm {
        Ok(())
    } else {
        Err(FieldError::PasswordMismatch)
    }
}
