//! Configuration module - locale word tables and catalog loading.
//!
//! The wizard consumes two pieces of static configuration: the step
//! catalog with its branch rules (one YAML or JSON document, loaded once
//! at startup and validated fail-fast) and per-locale Yes/No word tables.
//! Neither is reloaded at runtime.

mod catalog_file;
mod error;
mod locale;

pub use catalog_file::{CatalogFile, OptionSpec, RuleSpec, StepSpec};
pub use error::ConfigError;
pub use locale::LocaleSettings;
