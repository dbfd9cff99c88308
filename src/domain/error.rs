use thiserror::Error;

/// Configuration errors raised while building a [`DemoConfig`](super::DemoConfig)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Run name must not be empty")]
    EmptyRunName,

    #[error("Invalid run name {0:?}: must be a single path component")]
    InvalidRunName(String),

    #[error("Duplicate run name: {0}")]
    DuplicateRun(String),

    #[error("Run name {0:?} is reserved for the unsupported-data run")]
    ReservedRunName(String),

    #[error("Trace-only run {0:?} is not a configured run")]
    UnknownTraceOnlyRun(String),

    #[error("Trace given for run {0:?} which is not a configured run")]
    UnknownTracedRun(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats_correctly() {
        assert_eq!(
            DomainError::EmptyRunName.to_string(),
            "Run name must not be empty"
        );
        assert_eq!(
            DomainError::DuplicateRun("foo".to_string()).to_string(),
            "Duplicate run name: foo"
        );
        assert_eq!(
            DomainError::UnknownTraceOnlyRun("qux".to_string()).to_string(),
            "Trace-only run \"qux\" is not a configured run"
        );
        assert_eq!(
            DomainError::InvalidRunName("a/b".to_string()).to_string(),
            "Invalid run name \"a/b\": must be a single path component"
        );
    }

    #[test]
    fn error_comparison_works() {
        assert_eq!(DomainError::EmptyRunName, DomainError::EmptyRunName);
        assert_ne!(
            DomainError::DuplicateRun("a".to_string()),
            DomainError::DuplicateRun("b".to_string())
        );
    }
}
