use thiserror::Error;

/// Errors raised while building a detection pattern.
///
/// These are fatal: a malformed builder sequence aborts rule loading
/// instead of producing a degenerate pattern.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PatternBuildError {
    #[error("pattern has no target type")]
    MissingTargetType,

    #[error("pattern has no call shape (constructor or method)")]
    MissingCallShape,

    #[error("pattern has no context kind")]
    MissingContext,

    #[error("method matcher has an empty name")]
    EmptyMethodName,

    #[error("call shape declared twice: {first} then {second}")]
    ConflictingCallShape { first: String, second: String },
}

impl PatternBuildError {
    pub fn conflicting_call_shape(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::ConflictingCallShape {
            first: first.into(),
            second: second.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_target_type_display() {
        let err = PatternBuildError::MissingTargetType;
        assert_eq!(err.to_string(), "pattern has no target type");
    }

    #[test]
    fn test_conflicting_call_shape_display() {
        let err = PatternBuildError::conflicting_call_shape("constructor", "method");
        assert_eq!(
            err.to_string(),
            "call shape declared twice: constructor then method"
        );
    }
}
