//! Adapters - concrete implementations of the crate's ports.

pub mod validators;
