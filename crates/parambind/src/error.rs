//! Error types for parambind

use thiserror::Error;

/// Result type alias for render operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that abort a render.
///
/// Every variant is fatal: no partial SQL is ever returned alongside one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A template references a parameter missing from the value map
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// Unterminated quoted string, quoted identifier or comment
    #[error("Malformed literal starting at byte {position}")]
    MalformedLiteral { position: usize },

    /// A list parameter has no elements and the config rejects empty lists
    #[error("Empty list parameter: {0}")]
    EmptyList(String),

    /// The render would bind more values than the configured limit
    #[error("Too many parameters: {count} exceeds limit of {limit}")]
    TooManyParameters { limit: usize, count: usize },
}

impl RenderError {
    /// Create an unknown parameter error
    pub fn unknown_parameter(name: impl Into<String>) -> Self {
        Self::UnknownParameter(name.into())
    }

    /// Create a malformed literal error at a byte offset
    pub fn malformed_literal(position: usize) -> Self {
        Self::MalformedLiteral { position }
    }

    /// Check if this is an unknown parameter error
    pub fn is_unknown_parameter(&self) -> bool {
        matches!(self, Self::UnknownParameter(_))
    }

    /// Check if this is a malformed literal error
    pub fn is_malformed_literal(&self) -> bool {
        matches!(self, Self::MalformedLiteral { .. })
    }

    /// The parameter name this error is about, if any.
    pub fn parameter_name(&self) -> Option<&str> {
        match self {
            Self::UnknownParameter(name) | Self::EmptyList(name) => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_parameter_message_names_the_parameter() {
        let err = RenderError::unknown_parameter("userId");
        assert_eq!(err.to_string(), "Unknown parameter: userId");
        assert_eq!(err.parameter_name(), Some("userId"));
        assert!(err.is_unknown_parameter());
    }

    #[test]
    fn malformed_literal_reports_position() {
        let err = RenderError::malformed_literal(17);
        assert_eq!(err.to_string(), "Malformed literal starting at byte 17");
        assert!(err.is_malformed_literal());
        assert_eq!(err.parameter_name(), None);
    }
}
