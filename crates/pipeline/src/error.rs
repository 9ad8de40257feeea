//! Error types for the generation pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Failures that abort a pipeline run.
///
/// Converter failures are deliberately absent: conversion is best-effort
/// and reported through logging (see [`crate::convert`]).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid pipeline configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A text-generation call failed.
    #[error("text generation failed: {0}")]
    Generation(#[from] deck_llm::LlmError),

    /// Reading or writing an artifact failed.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
