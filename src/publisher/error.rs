use thiserror::Error;

use crate::io::IoError;

/// Errors that abort a dump; files written before the failure stay on disk
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Failed to publish run {run}: {source}")]
    Run {
        run: String,
        #[source]
        source: IoError,
    },

    #[error("IO error: {0}")]
    Io(#[from] IoError),
}

impl PublishError {
    /// Run that was being written when the dump failed, if any
    pub fn run(&self) -> Option<&str> {
        match self {
            Self::Run { run, .. } => Some(run.as_str()),
            Self::Io(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn error_display_formats_correctly() {
        let err = PublishError::Run {
            run: "foo".to_string(),
            source: IoError::NotADirectory(PathBuf::from("/tmp/foo")),
        };
        assert_eq!(
            err.to_string(),
            "Failed to publish run foo: Path exists and is not a directory: /tmp/foo"
        );
        assert_eq!(err.run(), Some("foo"));
    }

    #[test]
    fn io_error_conversion() {
        let io_err = IoError::CorruptRecord("x".to_string());
        let err = PublishError::from(io_err);

        match err {
            PublishError::Io(IoError::CorruptRecord(_)) => {}
            _ => panic!("Expected Io error variant"),
        }
        assert!(PublishError::from(IoError::CorruptRecord("y".to_string()))
            .run()
            .is_none());
    }
}
