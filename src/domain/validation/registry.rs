//! Validator registry - name to validator lookup.
//!
//! Registration is static: the registry is built once at process start and
//! shared immutably by every session. Validators are never synthesized
//! dynamically; an unregistered key is a configuration fault, not a user
//! validation failure.

use std::collections::HashMap;
use std::sync::Arc;

use crate::adapters::validators::{
    AmountValidator, ChoiceValidator, DateValidator, EmailValidator, FullNameValidator,
    NonEmptyValidator, PhoneValidator,
};
use crate::domain::foundation::WizardError;
use crate::ports::Validator;

/// Name-indexed map of validator implementations.
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    validators: HashMap<String, Arc<dyn Validator>>,
}

impl ValidatorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the built-in validators.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("full_name", Arc::new(FullNameValidator));
        registry.register("phone", Arc::new(PhoneValidator));
        registry.register("email", Arc::new(EmailValidator));
        registry.register("date", Arc::new(DateValidator));
        registry.register("amount", Arc::new(AmountValidator));
        registry.register("non_empty", Arc::new(NonEmptyValidator));
        registry.register("choice", Arc::new(ChoiceValidator));
        registry
    }

    /// Registers a validator under a key, replacing any previous binding.
    pub fn register(&mut self, key: impl Into<String>, validator: Arc<dyn Validator>) {
        self.validators.insert(key.into(), validator);
    }

    /// Looks up a validator; a missing key is a configuration fault.
    pub fn get(&self, key: &str) -> Result<&Arc<dyn Validator>, WizardError> {
        self.validators
            .get(key)
            .ok_or_else(|| WizardError::missing_validator(key))
    }

    /// Returns true if a validator is registered under the key.
    pub fn contains(&self, key: &str) -> bool {
        self.validators.contains_key(key)
    }

    /// Number of registered validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Returns true if no validators are registered.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("ValidatorRegistry").field("keys", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{ValidatorContext, ValidatorVerdict};
    use async_trait::async_trait;

    struct AlwaysOk;

    #[async_trait]
    impl Validator for AlwaysOk {
        async fn validate(&self, value: &str, _ctx: &ValidatorContext) -> ValidatorVerdict {
            ValidatorVerdict::ok(value)
        }
    }

    #[test]
    fn missing_key_is_a_missing_validator_fault() {
        let registry = ValidatorRegistry::new();
        let err = registry.get("ghost").unwrap_err();
        assert_eq!(err, WizardError::missing_validator("ghost"));
        assert!(err.is_configuration_fault());
    }

    #[test]
    fn registered_validator_is_found() {
        let mut registry = ValidatorRegistry::new();
        registry.register("ok", Arc::new(AlwaysOk));
        assert!(registry.contains("ok"));
        assert!(registry.get("ok").is_ok());
    }

    #[test]
    fn builtins_cover_the_catalog_vocabulary() {
        let registry = ValidatorRegistry::with_builtins();
        for key in ["full_name", "phone", "email", "date", "amount", "non_empty", "choice"] {
            assert!(registry.contains(key), "builtin '{}' missing", key);
        }
    }

    #[test]
    fn register_replaces_previous_binding() {
        let mut registry = ValidatorRegistry::with_builtins();
        let before = registry.len();
        registry.register("phone", Arc::new(AlwaysOk));
        assert_eq!(registry.len(), before);
    }
}
