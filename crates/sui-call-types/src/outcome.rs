//! Per-parameter validation results and argument errors.

use std::fmt;

use serde::Serialize;

/// Coarse error class, used by callers to decide how prominently to render
/// a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    Required,
    Format,
    Range,
    ReferenceNotFound,
}

/// Which end of an integer range was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RangeBound {
    Min,
    Max,
}

/// A validation failure for one call parameter.
///
/// Every variant names the parameter so the message can be shown without
/// further context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ArgumentError {
    /// Required parameter left empty.
    Required { param: String },

    /// Malformed literal: non-digit, non-hex, bad JSON and the like.
    Format {
        param: String,
        /// What the parameter accepts, e.g. "digits only".
        expected: String,
        /// What was wrong with the input.
        reason: String,
    },

    /// Integer outside `[0, 2^width - 1]`.
    Range {
        param: String,
        type_name: String,
        bound: RangeBound,
        /// The violated bound, in decimal.
        limit: String,
    },

    /// Object lookup came back empty.
    ReferenceNotFound { param: String, object_id: String },

    /// An element of a vector literal failed.
    Vector {
        param: String,
        index: usize,
        source: Box<ArgumentError>,
    },
}

impl ArgumentError {
    pub fn format(
        param: impl Into<String>,
        expected: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ArgumentError::Format {
            param: param.into(),
            expected: expected.into(),
            reason: reason.into(),
        }
    }

    pub fn param(&self) -> &str {
        match self {
            ArgumentError::Required { param }
            | ArgumentError::Format { param, .. }
            | ArgumentError::Range { param, .. }
            | ArgumentError::ReferenceNotFound { param, .. }
            | ArgumentError::Vector { param, .. } => param,
        }
    }

    /// Error class, looking through vector element wrappers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ArgumentError::Required { .. } => ErrorKind::Required,
            ArgumentError::Format { .. } => ErrorKind::Format,
            ArgumentError::Range { .. } => ErrorKind::Range,
            ArgumentError::ReferenceNotFound { .. } => ErrorKind::ReferenceNotFound,
            ArgumentError::Vector { source, .. } => source.kind(),
        }
    }

    /// The message without the leading parameter name.
    pub fn detail(&self) -> String {
        match self {
            ArgumentError::Required { .. } => "a value is required".to_string(),
            ArgumentError::Format {
                expected, reason, ..
            } => format!("{} (expected {})", reason, expected),
            ArgumentError::Range {
                type_name,
                bound: RangeBound::Max,
                limit,
                ..
            } => format!("exceeds the {} maximum of {}", type_name, limit),
            ArgumentError::Range {
                type_name,
                bound: RangeBound::Min,
                limit,
                ..
            } => format!("is below the {} minimum of {}", type_name, limit),
            ArgumentError::ReferenceNotFound { object_id, .. } => {
                format!("object {} was not found on chain", object_id)
            }
            ArgumentError::Vector { index, source, .. } => {
                format!("element {}: {}", index, source.detail())
            }
        }
    }
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.param(), self.detail())
    }
}

impl std::error::Error for ArgumentError {}

/// Result of validating the current text of one parameter.
///
/// Constructed only through the associated functions, which keep the
/// invariants: an invalid outcome always carries an error and a valid one
/// never does. A warning may accompany a valid outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    valid: bool,
    normalized: Option<String>,
    error: Option<ArgumentError>,
    warning: Option<String>,
}

impl ValidationOutcome {
    pub fn ok(normalized: impl Into<String>) -> Self {
        ValidationOutcome {
            valid: true,
            normalized: Some(normalized.into()),
            error: None,
            warning: None,
        }
    }

    /// Valid with nothing to encode (an optional parameter left empty).
    pub fn empty() -> Self {
        ValidationOutcome {
            valid: true,
            normalized: None,
            error: None,
            warning: None,
        }
    }

    pub fn invalid(error: ArgumentError) -> Self {
        ValidationOutcome {
            valid: false,
            normalized: None,
            error: Some(error),
            warning: None,
        }
    }

    /// Attach an advisory warning. Has no effect on validity.
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn is_empty(&self) -> bool {
        self.valid && self.normalized.is_none()
    }

    pub fn normalized(&self) -> Option<&str> {
        self.normalized.as_deref()
    }

    pub fn error(&self) -> Option<&ArgumentError> {
        self.error.as_ref()
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn into_result(self) -> Result<Option<String>, ArgumentError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.normalized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_always_has_error() {
        let outcome = ValidationOutcome::invalid(ArgumentError::Required {
            param: "amount".to_string(),
        });
        assert!(!outcome.is_valid());
        assert!(outcome.error().is_some());
        assert_eq!(outcome.normalized(), None);
    }

    #[test]
    fn test_warning_keeps_validity() {
        let outcome = ValidationOutcome::ok("5").with_warning("heads up");
        assert!(outcome.is_valid());
        assert!(outcome.error().is_none());
        assert_eq!(outcome.warning(), Some("heads up"));
    }

    #[test]
    fn test_display_names_param_and_bound() {
        let err = ArgumentError::Range {
            param: "amount".to_string(),
            type_name: "u8".to_string(),
            bound: RangeBound::Max,
            limit: "255".to_string(),
        };
        assert_eq!(err.to_string(), "amount: exceeds the u8 maximum of 255");
    }

    #[test]
    fn test_vector_error_reports_index_and_inner_kind() {
        let inner = ArgumentError::format("x", "digits only", "found 'a'");
        let err = ArgumentError::Vector {
            param: "values".to_string(),
            index: 3,
            source: Box::new(inner),
        };
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.to_string().starts_with("values: element 3:"));
    }
}
