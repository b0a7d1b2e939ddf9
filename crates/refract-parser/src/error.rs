//! Parser errors.

/// Fatal failure to turn source text into a syntax tree.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Parser aborted before reaching the end of the source")]
    Panicked,
}
