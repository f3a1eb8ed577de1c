//! Built-in validator adapters.
//!
//! The stock validators every deployment registers at startup. All are
//! manual character-level checks - no regex dependency - and all are
//! infallible with respect to panics on arbitrary input.

mod builtin;

pub use builtin::{
    AmountValidator, ChoiceValidator, DateValidator, EmailValidator, FullNameValidator,
    NonEmptyValidator, PhoneValidator,
};
