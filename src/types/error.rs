use thiserror::Error;

/// Reasons a field path string cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("field path is empty")]
    Empty,

    #[error("empty segment at position {index} in '{path}'")]
    EmptySegment { path: String, index: usize },

    #[error("'{path}' starts with a wildcard; the top level is always an object")]
    LeadingWildcard { path: String },

    #[error("unterminated '[' in '{path}'")]
    UnclosedBracket { path: String },

    #[error("malformed field path '{path}'")]
    Malformed { path: String },
}

/// Opaque failure reported by a [`RuleSource`](crate::RuleSource).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SourceError {
    message: String,
}

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Anything that stops inference for one route. This is what the
/// [`Inferrer`](crate::Inferrer) catches or propagates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionFailure {
    #[error("invalid field path '{path}': {source}")]
    Path {
        path: String,
        #[source]
        source: PathError,
    },

    #[error("nested rules under '{path}' exceed the depth limit of {limit}")]
    NestingTooDeep { path: String, limit: usize },

    #[error("field path '{path}' is deeper than the limit of {limit} segments")]
    PathTooDeep { path: String, limit: usize },

    #[error("rule source failed: {0}")]
    Source(#[from] SourceError),
}

/// Unrecognized HTTP method name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown HTTP method '{0}'")]
pub struct UnknownMethod(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_segment_message() {
        let err = PathError::EmptySegment {
            path: "a..b".into(),
            index: 1,
        };
        assert_eq!(err.to_string(), "empty segment at position 1 in 'a..b'");
    }

    #[test]
    fn leading_wildcard_message() {
        let err = PathError::LeadingWildcard { path: "*.id".into() };
        assert_eq!(
            err.to_string(),
            "'*.id' starts with a wildcard; the top level is always an object"
        );
    }

    #[test]
    fn malformed_message_names_the_path() {
        let err = PathError::Malformed {
            path: "a[b.c]".into(),
        };
        assert_eq!(err.to_string(), "malformed field path 'a[b.c]'");
    }

    #[test]
    fn path_failure_wraps_path_error() {
        let err = ExtractionFailure::Path {
            path: "a.".into(),
            source: PathError::EmptySegment {
                path: "a.".into(),
                index: 1,
            },
        };
        assert_eq!(
            err.to_string(),
            "invalid field path 'a.': empty segment at position 1 in 'a.'"
        );
    }

    #[test]
    fn nesting_message() {
        let err = ExtractionFailure::NestingTooDeep {
            path: "a".into(),
            limit: 2,
        };
        assert_eq!(
            err.to_string(),
            "nested rules under 'a' exceed the depth limit of 2"
        );
    }

    #[test]
    fn path_depth_message() {
        let err = ExtractionFailure::PathTooDeep {
            path: "a.b.c".into(),
            limit: 2,
        };
        assert_eq!(
            err.to_string(),
            "field path 'a.b.c' is deeper than the limit of 2 segments"
        );
    }

    #[test]
    fn source_message() {
        let err = ExtractionFailure::from(SourceError::new("class not found"));
        assert_eq!(err.to_string(), "rule source failed: class not found");
    }

    #[test]
    fn unknown_method_message() {
        assert_eq!(
            UnknownMethod("BREW".into()).to_string(),
            "unknown HTTP method 'BREW'"
        );
    }
}
