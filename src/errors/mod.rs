//! Error handling for blockgen
//!
//! Structured error types for document loading, configuration and code
//! generation. Document errors carry a byte span into the JSON source,
//! generation faults carry the id of the block that caused them.

mod diagnostic;

use std::ops::Range;
use thiserror::Error;

pub use diagnostic::{format_error, line_col_to_offset, print_error};

/// A span in the source document, represented as a byte range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpan {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl SourceSpan {
    /// Create a new source span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl From<SourceSpan> for Range<usize> {
    fn from(span: SourceSpan) -> Self {
        span.start..span.end
    }
}

/// The main error type for blockgen operations
#[derive(Error, Debug)]
pub enum BlockgenError {
    #[error("Document error: {message}")]
    Document { message: String, span: SourceSpan },

    #[error("Config error: {message}")]
    Config { message: String },

    #[error("Code generation error: {message}")]
    CodeGen {
        message: String,
        block_id: Option<String>,
    },

    #[error("Unknown block type '{kind}'")]
    UnknownBlock {
        kind: String,
        block_id: Option<String>,
    },

    #[error("Block type '{kind}' is already registered")]
    DuplicateHandler { kind: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BlockgenError {
    /// Get the source span associated with this error, if any
    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            BlockgenError::Document { span, .. } => Some(*span),
            _ => None,
        }
    }

    /// Get the id of the block this error was raised for, if any
    pub fn block_id(&self) -> Option<&str> {
        match self {
            BlockgenError::CodeGen { block_id, .. } | BlockgenError::UnknownBlock { block_id, .. } => {
                block_id.as_deref().filter(|id| !id.is_empty())
            }
            _ => None,
        }
    }

    /// Create a document error
    pub fn document(message: impl Into<String>, span: SourceSpan) -> Self {
        BlockgenError::Document {
            message: message.into(),
            span,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        BlockgenError::Config {
            message: message.into(),
        }
    }

    /// Create a code generation error attributed to a block
    pub fn codegen(message: impl Into<String>, block_id: impl Into<String>) -> Self {
        BlockgenError::CodeGen {
            message: message.into(),
            block_id: Some(block_id.into()),
        }
    }

    /// Create an unknown block type error
    pub fn unknown_block(kind: impl Into<String>, block_id: impl Into<String>) -> Self {
        BlockgenError::UnknownBlock {
            kind: kind.into(),
            block_id: Some(block_id.into()),
        }
    }
}

/// Result type alias for blockgen operations
pub type BlockgenResult<T> = Result<T, BlockgenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_id_ignores_empty_ids() {
        let err = BlockgenError::codegen("boom", "");
        assert_eq!(err.block_id(), None);

        let err = BlockgenError::unknown_block("mystery", "b7");
        assert_eq!(err.block_id(), Some("b7"));
        assert_eq!(err.to_string(), "Unknown block type 'mystery'");
    }

    #[test]
    fn test_span_only_for_documents() {
        let err = BlockgenError::document("bad json", SourceSpan::new(3, 4));
        assert_eq!(err.span(), Some(SourceSpan::new(3, 4)));
        assert_eq!(BlockgenError::config("nope").span(), None);
    }
}
