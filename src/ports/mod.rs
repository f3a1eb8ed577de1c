//! Ports - trait boundaries implemented by adapters.

mod validator;

pub use validator::{Validator, ValidatorContext, ValidatorVerdict};
