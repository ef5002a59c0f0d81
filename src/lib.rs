//! Batch SQL dialect conversion backed by the Anthropic Messages API.
//!
//! The pipeline is intentionally thin: per-dialect regex heuristics pull
//! database/schema hints out of the source text for diagnostics, a light
//! cleanup pass strips qualifiers, the cleaned text goes to the model with
//! a conversion prompt, and the first fenced SQL code block in the reply is
//! taken as the converted file. Successful conversions land in a zip archive.

pub mod api;
pub mod archive;
pub mod cleanup;
pub mod cli;
pub mod config;
pub mod convert;
pub mod dialect;
pub mod error;
pub mod hints;
pub mod masking;
pub mod output;
