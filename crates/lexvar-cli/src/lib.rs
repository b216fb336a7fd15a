//! Command-line front end for the lexvar scope engine.
//!
//! Loads a JSON program document, runs one analysis or rename on it and
//! reports the result as JSON.

pub mod args;
pub mod commands;
pub mod tracing_config;
