//! Validator port - input normalization and rejection.
//!
//! A validator takes a raw (already quick-option-resolved) value and either
//! produces a canonical value or rejects with a message key. Validators are
//! async so a remote check (uniqueness, external registry lookup) can sit
//! behind the same trait as a local format check; the caller awaits each
//! call before issuing the next operation on the same engine.

use async_trait::async_trait;
use std::collections::BTreeSet;

/// Extra context handed to a validator.
///
/// For steps whose branch rule has Enumerated dispatch, `allowed` carries
/// the canonical keys of the step's quick options; validators for such
/// steps must reject anything outside the set.
#[derive(Debug, Clone, Default)]
pub struct ValidatorContext {
    pub allowed: Option<BTreeSet<String>>,
}

impl ValidatorContext {
    /// Context with no allowed-set restriction.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Context restricted to the given canonical keys.
    pub fn restricted_to<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: Some(keys.into_iter().map(Into::into).collect()),
        }
    }
}

/// Outcome of one validator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatorVerdict {
    /// Input accepted; `canonical` is the normalized value to store.
    Ok { canonical: String },
    /// Input rejected; `message` is a localized message key.
    Fail { message: String },
}

impl ValidatorVerdict {
    /// Accepts with a canonical value.
    pub fn ok(canonical: impl Into<String>) -> Self {
        ValidatorVerdict::Ok { canonical: canonical.into() }
    }

    /// Rejects with a message key.
    pub fn fail(message: impl Into<String>) -> Self {
        ValidatorVerdict::Fail { message: message.into() }
    }
}

/// Normalizes raw input into a canonical value or rejects it.
///
/// # Contract
///
/// Implementations must:
/// - Be pure with respect to engine state (no access to the queue)
/// - Return `Fail` with a message *key*, never rendered text
/// - Honor `ctx.allowed` when they interpret option sets; the pipeline
///   independently rejects accepted values outside the set, so generic
///   validators may ignore it
/// - Never panic on arbitrary user input
#[async_trait]
pub trait Validator: Send + Sync {
    /// Validate a raw value, returning the canonical form or a rejection.
    async fn validate(&self, value: &str, ctx: &ValidatorContext) -> ValidatorVerdict;
}

impl std::fmt::Debug for dyn Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Validator")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal implementation exercising the trait contract.
    struct UppercaseValidator;

    #[async_trait]
    impl Validator for UppercaseValidator {
        async fn validate(&self, value: &str, ctx: &ValidatorContext) -> ValidatorVerdict {
            if value.is_empty() {
                return ValidatorVerdict::fail("error.empty");
            }
            let canonical = value.to_uppercase();
            if let Some(allowed) = &ctx.allowed {
                if !allowed.contains(&canonical) {
                    return ValidatorVerdict::fail("error.not_allowed");
                }
            }
            ValidatorVerdict::ok(canonical)
        }
    }

    #[tokio::test]
    async fn validator_normalizes_value() {
        let verdict = UppercaseValidator
            .validate("abc", &ValidatorContext::unrestricted())
            .await;
        assert_eq!(verdict, ValidatorVerdict::ok("ABC"));
    }

    #[tokio::test]
    async fn validator_honors_allowed_set() {
        let ctx = ValidatorContext::restricted_to(["ABC"]);
        assert_eq!(
            UppercaseValidator.validate("abc", &ctx).await,
            ValidatorVerdict::ok("ABC")
        );
        assert_eq!(
            UppercaseValidator.validate("xyz", &ctx).await,
            ValidatorVerdict::fail("error.not_allowed")
        );
    }

    #[tokio::test]
    async fn validator_trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn Validator>();
    }
}
