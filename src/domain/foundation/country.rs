//! Country codes and step applicability scoping.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::WizardError;

/// Uppercase country code identifying the market a session runs in.
///
/// The wizard does not validate against an ISO table; it only requires a
/// non-empty ASCII-alphabetic code and normalizes to uppercase so catalog
/// scoping is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    /// Creates a country code, normalizing to uppercase.
    pub fn new(code: impl AsRef<str>) -> Result<Self, WizardError> {
        let code = code.as_ref().trim();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(WizardError::branch_config(format!(
                "invalid country code '{}'",
                code
            )));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which countries a catalog step applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CountryScope {
    /// Applies in every country.
    #[default]
    All,

    /// Applies only in the listed countries.
    Only(BTreeSet<CountryCode>),
}

impl CountryScope {
    /// Builds a scope restricted to the given codes.
    pub fn only<I>(codes: I) -> Result<Self, WizardError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let set = codes
            .into_iter()
            .map(CountryCode::new)
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(CountryScope::Only(set))
    }

    /// Returns true if a step with this scope is shown in `country`.
    pub fn covers(&self, country: &CountryCode) -> bool {
        match self {
            CountryScope::All => true,
            CountryScope::Only(set) => set.contains(country),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_code_normalizes_to_uppercase() {
        let code = CountryCode::new("kz").unwrap();
        assert_eq!(code.as_str(), "KZ");
    }

    #[test]
    fn country_code_rejects_empty() {
        assert!(CountryCode::new("").is_err());
        assert!(CountryCode::new("   ").is_err());
    }

    #[test]
    fn country_code_rejects_non_alphabetic() {
        assert!(CountryCode::new("K1").is_err());
        assert!(CountryCode::new("K-Z").is_err());
    }

    #[test]
    fn all_scope_covers_any_country() {
        let kz = CountryCode::new("KZ").unwrap();
        assert!(CountryScope::All.covers(&kz));
    }

    #[test]
    fn only_scope_covers_listed_countries() {
        let scope = CountryScope::only(["KZ", "UZ"]).unwrap();
        assert!(scope.covers(&CountryCode::new("kz").unwrap()));
        assert!(scope.covers(&CountryCode::new("UZ").unwrap()));
        assert!(!scope.covers(&CountryCode::new("GE").unwrap()));
    }

    #[test]
    fn default_scope_is_all() {
        assert_eq!(CountryScope::default(), CountryScope::All);
    }
}
