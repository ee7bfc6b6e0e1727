//! Error types for template parsing and compilation
//!
//! Compilation only fails on malformed templates (object nodes without
//! `_properties`, array nodes without `_items`). Unexpected data never
//! produces an error.

use thiserror::Error;

/// Main error type for template operations
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Object node without a non-empty `_properties` mapping
    #[error("It is necessary to provide `_properties` in object schema (at {path})")]
    MissingProperties { path: String },

    /// Array node without an `_items` definition
    #[error("Please provide `_items` key in array schema (at {path})")]
    MissingItems { path: String },

    /// Template text that is not valid JSON
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl TemplateError {
    /// Create a missing-properties error for the object node at `path`
    pub fn missing_properties(path: impl Into<String>) -> Self {
        TemplateError::MissingProperties { path: path.into() }
    }

    /// Create a missing-items error for the array node at `path`
    pub fn missing_items(path: impl Into<String>) -> Self {
        TemplateError::MissingItems { path: path.into() }
    }

    /// Create a parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        TemplateError::ParseError(msg.into())
    }

    /// True for the two fatal errors raised while compiling a template
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            TemplateError::MissingProperties { .. } | TemplateError::MissingItems { .. }
        )
    }

    /// JSON path of the offending template node, when known
    pub fn path(&self) -> Option<&str> {
        match self {
            TemplateError::MissingProperties { path } | TemplateError::MissingItems { path } => {
                Some(path)
            }
            TemplateError::ParseError(_) => None,
        }
    }
}

impl From<serde_json::Error> for TemplateError {
    fn from(err: serde_json::Error) -> Self {
        TemplateError::ParseError(format!("JSON error: {}", err))
    }
}

/// Result type alias for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;
