use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::text_format::TextFormatError;

/// Filesystem and encoding errors, carrying the path they occurred on
#[derive(Error, Debug)]
pub enum IoError {
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Path exists and is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid trace text: {0}")]
    TextFormat(#[from] TextFormatError),

    #[error("Protobuf decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats_correctly() {
        assert_eq!(
            IoError::NotADirectory(PathBuf::from("/tmp/x")).to_string(),
            "Path exists and is not a directory: /tmp/x"
        );
        assert_eq!(
            IoError::CorruptRecord("length crc mismatch".to_string()).to_string(),
            "Corrupt record: length crc mismatch"
        );

        let err = IoError::Copy {
            from: PathBuf::from("a.json"),
            to: PathBuf::from("b.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "Failed to copy a.json to b.json: missing");
    }

    #[test]
    fn text_format_error_conversion() {
        let parse_err = TextFormatError {
            line: 1,
            column: 2,
            message: "bad".to_string(),
        };
        let io_err = IoError::from(parse_err.clone());

        match io_err {
            IoError::TextFormat(inner) => assert_eq!(inner, parse_err),
            _ => panic!("Expected TextFormat error variant"),
        }
    }

    #[test]
    fn source_is_preserved() {
        use std::error::Error as _;

        let err = IoError::Write {
            path: PathBuf::from("trace"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.source().unwrap().to_string(), "denied");
    }
}
