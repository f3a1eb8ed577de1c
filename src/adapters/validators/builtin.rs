//! Stock validator implementations.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::ports::{Validator, ValidatorContext, ValidatorVerdict};

/// Accepts a personal name of at least two word tokens.
///
/// Tokens may contain letters (any alphabet), hyphens, and apostrophes.
/// Canonical form collapses runs of whitespace to single spaces.
pub struct FullNameValidator;

#[async_trait]
impl Validator for FullNameValidator {
    async fn validate(&self, value: &str, _ctx: &ValidatorContext) -> ValidatorVerdict {
        let tokens: Vec<&str> = value.split_whitespace().collect();
        if tokens.len() < 2 {
            return ValidatorVerdict::fail("error.full_name");
        }
        let well_formed = tokens.iter().all(|t| {
            t.chars().all(|c| c.is_alphabetic() || c == '-' || c == '\'')
                && t.chars().any(char::is_alphabetic)
        });
        if !well_formed {
            return ValidatorVerdict::fail("error.full_name");
        }
        ValidatorVerdict::ok(tokens.join(" "))
    }
}

/// Accepts an international phone number: optional `+`, 7-15 digits.
///
/// Spaces, hyphens, and parentheses are stripped before checking, so
/// `+7 (700) 123-45-67` canonicalizes to `+77001234567`.
pub struct PhoneValidator;

#[async_trait]
impl Validator for PhoneValidator {
    async fn validate(&self, value: &str, _ctx: &ValidatorContext) -> ValidatorVerdict {
        let stripped: String = value
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
            .collect();
        let (plus, digits) = match stripped.strip_prefix('+') {
            Some(rest) => ("+", rest),
            None => ("", stripped.as_str()),
        };
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return ValidatorVerdict::fail("error.phone");
        }
        if !(7..=15).contains(&digits.len()) {
            return ValidatorVerdict::fail("error.phone");
        }
        ValidatorVerdict::ok(format!("{}{}", plus, digits))
    }
}

/// Accepts an email address: one `@`, non-empty local part, dotted domain.
pub struct EmailValidator;

#[async_trait]
impl Validator for EmailValidator {
    async fn validate(&self, value: &str, _ctx: &ValidatorContext) -> ValidatorVerdict {
        let trimmed = value.trim();
        if trimmed.chars().any(char::is_whitespace) {
            return ValidatorVerdict::fail("error.email");
        }
        let mut parts = trimmed.splitn(2, '@');
        let local = parts.next().unwrap_or("");
        let domain = parts.next().unwrap_or("");
        let domain_ok = domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !domain.contains('@');
        if local.is_empty() || !domain_ok {
            return ValidatorVerdict::fail("error.email");
        }
        ValidatorVerdict::ok(trimmed.to_lowercase())
    }
}

/// Accepts a calendar date as `YYYY-MM-DD` or `DD.MM.YYYY`.
///
/// Canonical form is always `YYYY-MM-DD`.
pub struct DateValidator;

#[async_trait]
impl Validator for DateValidator {
    async fn validate(&self, value: &str, _ctx: &ValidatorContext) -> ValidatorVerdict {
        let trimmed = value.trim();
        let parsed = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d.%m.%Y"));
        match parsed {
            Ok(date) => ValidatorVerdict::ok(date.format("%Y-%m-%d").to_string()),
            Err(_) => ValidatorVerdict::fail("error.date"),
        }
    }
}

/// Accepts a positive monetary amount. Comma decimal separators are
/// tolerated; whole amounts canonicalize without a fractional part.
pub struct AmountValidator;

#[async_trait]
impl Validator for AmountValidator {
    async fn validate(&self, value: &str, _ctx: &ValidatorContext) -> ValidatorVerdict {
        let normalized = value.trim().replace(',', ".");
        let amount: f64 = match normalized.parse() {
            Ok(amount) => amount,
            Err(_) => return ValidatorVerdict::fail("error.amount"),
        };
        if !amount.is_finite() || amount <= 0.0 {
            return ValidatorVerdict::fail("error.amount");
        }
        let canonical = if amount.fract() == 0.0 && amount <= u64::MAX as f64 {
            format!("{}", amount as u64)
        } else {
            format!("{}", amount)
        };
        ValidatorVerdict::ok(canonical)
    }
}

/// Accepts anything with non-whitespace content; canonical form is trimmed.
pub struct NonEmptyValidator;

#[async_trait]
impl Validator for NonEmptyValidator {
    async fn validate(&self, value: &str, _ctx: &ValidatorContext) -> ValidatorVerdict {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return ValidatorVerdict::fail("error.empty");
        }
        ValidatorVerdict::ok(trimmed)
    }
}

/// Enumerated-dispatch membership check: the value must be one of the
/// allowed canonical keys. With no allowed set the value passes through,
/// so the same validator works on free-form steps.
pub struct ChoiceValidator;

#[async_trait]
impl Validator for ChoiceValidator {
    async fn validate(&self, value: &str, ctx: &ValidatorContext) -> ValidatorVerdict {
        match &ctx.allowed {
            Some(allowed) if !allowed.contains(value) => {
                ValidatorVerdict::fail("error.invalid_option")
            }
            _ => ValidatorVerdict::ok(value),
        }
    }
}
