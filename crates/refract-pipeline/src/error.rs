//! Error types for the pipeline and converter.

use refract_adapters::GenerateError;
use refract_parser::{MetadataField, ParseError};

/// A plugin hook failure. Always isolated by the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("{0}")]
    Failed(String),

    #[error("wrote undeclared metadata fields {0:?}")]
    UndeclaredWrite(Vec<MetadataField>),
}

/// Fatal errors for one conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("No convertible component: {0}")]
    NoComponent(String),

    #[error("Generation failed: {0}")]
    Generate(#[from] GenerateError),
}

/// The external formatter failed or timed out.
#[derive(Debug, thiserror::Error)]
#[error("Formatter failed: {message}")]
pub struct FormatError {
    pub message: String,
}

impl FormatError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
