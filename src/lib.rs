//! Formwizard - Dynamic Conversational Form Engine
//!
//! This crate implements the wizard core of a multi-step questionnaire:
//! a branch-aware step queue, an input validation pipeline, and a
//! snapshot/rollback edit flow, driven by declarative catalog and rule
//! configuration.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
