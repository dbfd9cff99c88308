use std::path::Path;

use prost::Message;
use tracing::debug;

use super::error::IoError;
use super::fs::{read_file, write_file};
use super::text_format::parse_trace;
use crate::domain::Trace;

/// Parse `text` as a trace and write its binary encoding to `path`
///
/// Nothing is written when the text does not parse.
pub async fn write_trace(text: &str, path: &Path) -> Result<Trace, IoError> {
    let trace = parse_trace(text)?;
    let bytes = trace.encode_to_vec();
    write_file(path, &bytes).await?;
    debug!(
        path = %path.display(),
        devices = trace.devices.len(),
        events = trace.trace_events.len(),
        "Wrote trace"
    );
    Ok(trace)
}

/// Decode a binary trace file
pub async fn read_trace(path: &Path) -> Result<Trace, IoError> {
    let bytes = read_file(path).await?;
    Ok(Trace::decode(bytes.as_slice())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::demo::FOO_TRACE;
    use tempfile::TempDir;

    #[tokio::test]
    async fn written_trace_decodes_to_parsed_record() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("trace");

        let written = write_trace(FOO_TRACE, &path).await.unwrap();
        let decoded = read_trace(&path).await.unwrap();

        assert_eq!(decoded, written);
        assert_eq!(decoded, parse_trace(FOO_TRACE).unwrap());
    }

    #[tokio::test]
    async fn file_bytes_are_the_standard_encoding() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("trace");

        write_trace("trace_events { name: 'x' timestamp_ps: 5 }", &path)
            .await
            .unwrap();

        // field 4, len 5: { field 3 "x", field 9 varint 5 }
        assert_eq!(
            std::fs::read(&path).unwrap(),
            vec![0x22, 0x05, 0x1a, 0x01, b'x', 0x48, 0x05]
        );
    }

    #[tokio::test]
    async fn malformed_text_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("trace");

        let result = write_trace("trace_events {", &path).await;
        assert!(matches!(result, Err(IoError::TextFormat(_))));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn reading_garbage_is_a_decode_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("trace");
        std::fs::write(&path, [0xff, 0xff, 0xff]).unwrap();

        let result = read_trace(&path).await;
        assert!(matches!(result, Err(IoError::Decode(_))));
    }
}
