//! Locale settings - the shape of locale-driven configuration the engine
//! consumes.
//!
//! The engine never holds localized prompt text; the only locale data it
//! needs is the affirmative/negative word tables used to normalize answers
//! to the canonical `"Yes"`/`"No"` tokens branch rules dispatch on.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::domain::catalog::{NO, YES};

/// Per-locale normalization settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleSettings {
    /// Locale tag, e.g. `en` or `ru`.
    pub name: String,

    /// Words normalized to the canonical `"Yes"` token.
    pub yes_words: Vec<String>,

    /// Words normalized to the canonical `"No"` token.
    pub no_words: Vec<String>,
}

static BUILTIN_LOCALES: Lazy<Vec<LocaleSettings>> = Lazy::new(|| {
    vec![
        LocaleSettings {
            name: "en".to_string(),
            yes_words: ["yes", "yeah", "yep", "sure", "ok", "okay", "y"]
                .map(str::to_string)
                .to_vec(),
            no_words: ["no", "nope", "nah", "n"].map(str::to_string).to_vec(),
        },
        LocaleSettings {
            name: "ru".to_string(),
            yes_words: ["да", "ага", "конечно"].map(str::to_string).to_vec(),
            no_words: ["нет", "не"].map(str::to_string).to_vec(),
        },
    ]
});

impl LocaleSettings {
    /// Looks up a built-in locale by tag.
    pub fn builtin(tag: &str) -> Result<Self, ConfigError> {
        BUILTIN_LOCALES
            .iter()
            .find(|l| l.name == tag)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownLocale(tag.to_string()))
    }

    /// Loads locale settings from a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Normalizes a locale Yes/No token to its canonical form.
    ///
    /// Exact, case-insensitive match against the word tables only;
    /// substrings are never rewritten.
    pub fn normalize_yes_no(&self, value: &str) -> Option<&'static str> {
        let lower = value.trim().to_lowercase();
        if self.yes_words.iter().any(|w| w.to_lowercase() == lower) {
            return Some(YES);
        }
        if self.no_words.iter().any(|w| w.to_lowercase() == lower) {
            return Some(NO);
        }
        None
    }
}
