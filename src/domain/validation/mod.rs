//! Validation module - registry and the input pipeline.

mod pipeline;
mod registry;

pub use pipeline::{InputCheck, RawInput, ValidationPipeline};
pub use registry::ValidatorRegistry;
