//! Event files: TFRecord-framed `Event` protos.
//!
//! Only the file-version header is ever written here. A log directory that
//! holds such a file with the `.profile-empty` suffix is listed as a run by
//! the dashboard even though it carries no summaries.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use prost::Message;
use tracing::info;

use super::error::IoError;
use super::fs::{ensure_dir, write_file};
use crate::domain::layout::EVENT_FILE_SUFFIX;

/// Version string every event file starts with
pub const FILE_VERSION: &str = "brain.Event:2";

const MASK_DELTA: u32 = 0xa282_ead8;
const HEADER_LEN: usize = 8 + 4;
const FOOTER_LEN: usize = 4;

static FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Header record of an event file; summaries are never written
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Event {
    #[prost(double, tag = "1")]
    pub wall_time: f64,

    #[prost(int64, tag = "2")]
    pub step: i64,

    #[prost(string, optional, tag = "3")]
    pub file_version: Option<String>,
}

fn masked_crc32c(data: &[u8]) -> u32 {
    let crc = crc32c::crc32c(data);
    crc.rotate_right(15).wrapping_add(MASK_DELTA)
}

/// Append one framed record to `out`
pub fn encode_record(payload: &[u8], out: &mut Vec<u8>) {
    let len = (payload.len() as u64).to_le_bytes();
    out.extend_from_slice(&len);
    out.extend_from_slice(&masked_crc32c(&len).to_le_bytes());
    out.extend_from_slice(payload);
    out.extend_from_slice(&masked_crc32c(payload).to_le_bytes());
}

/// Split a TFRecord stream into payloads, checking both checksums of each record
pub fn read_records(mut bytes: &[u8]) -> Result<Vec<Vec<u8>>, IoError> {
    let mut records = Vec::new();
    while !bytes.is_empty() {
        if bytes.len() < HEADER_LEN {
            return Err(IoError::CorruptRecord("truncated record header".to_string()));
        }
        let (len_bytes, rest) = bytes.split_at(8);
        let (len_crc, rest) = rest.split_at(4);
        if masked_crc32c(len_bytes) != read_u32(len_crc) {
            return Err(IoError::CorruptRecord("length checksum mismatch".to_string()));
        }

        let len = u64::from_le_bytes(len_bytes.try_into().unwrap_or_default());
        let len = usize::try_from(len)
            .ok()
            .filter(|len| len.checked_add(FOOTER_LEN).is_some_and(|n| n <= rest.len()))
            .ok_or_else(|| IoError::CorruptRecord("truncated record payload".to_string()))?;

        let (payload, rest) = rest.split_at(len);
        let (data_crc, rest) = rest.split_at(FOOTER_LEN);
        if masked_crc32c(payload) != read_u32(data_crc) {
            return Err(IoError::CorruptRecord("payload checksum mismatch".to_string()));
        }

        records.push(payload.to_vec());
        bytes = rest;
    }
    Ok(records)
}

fn read_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes(bytes.try_into().unwrap_or_default())
}

/// `events.out.tfevents.<secs>.<host>.<pid>.<n><suffix>`
///
/// The suffix takes the place of the writer's default `.v2`.
pub fn event_file_name(timestamp_secs: u64, hostname: &str, pid: u32, counter: u64) -> String {
    format!(
        "events.out.tfevents.{timestamp_secs:010}.{hostname}.{pid}.{counter}{EVENT_FILE_SUFFIX}"
    )
}

/// Write an event file with no events into `logdir`, creating it if needed
///
/// Returns the path of the new file.
pub async fn write_empty_event_file(logdir: &Path) -> Result<PathBuf, IoError> {
    ensure_dir(logdir).await?;

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let hostname = gethostname::gethostname().to_string_lossy().into_owned();
    let name = event_file_name(
        now.as_secs(),
        &hostname,
        std::process::id(),
        FILE_COUNTER.fetch_add(1, Ordering::Relaxed),
    );
    let path = logdir.join(name);

    let header = Event {
        wall_time: now.as_secs_f64(),
        step: 0,
        file_version: Some(FILE_VERSION.to_string()),
    };
    let mut contents = Vec::new();
    encode_record(&header.encode_to_vec(), &mut contents);

    write_file(&path, &contents).await?;
    info!(path = %path.display(), "Wrote empty event file");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn masked_crc_matches_reference_values() {
        // crc32c("") == 0, so the masked value is just the delta.
        assert_eq!(masked_crc32c(b""), MASK_DELTA);
        // crc32c("123456789") == 0xe3069283
        assert_eq!(
            masked_crc32c(b"123456789"),
            0xe306_9283u32.rotate_right(15).wrapping_add(MASK_DELTA)
        );
    }

    #[test]
    fn record_framing_layout() {
        let mut out = Vec::new();
        encode_record(b"abc", &mut out);

        assert_eq!(out.len(), HEADER_LEN + 3 + FOOTER_LEN);
        assert_eq!(&out[..8], &3u64.to_le_bytes());
        assert_eq!(&out[12..15], b"abc");
    }

    #[test]
    fn reads_back_multiple_records() {
        let mut out = Vec::new();
        encode_record(b"first", &mut out);
        encode_record(b"", &mut out);
        encode_record(b"third", &mut out);

        let records = read_records(&out).unwrap();
        assert_eq!(records, vec![b"first".to_vec(), Vec::new(), b"third".to_vec()]);
    }

    #[test]
    fn detects_corrupt_payload() {
        let mut out = Vec::new();
        encode_record(b"payload", &mut out);
        out[13] ^= 0xff;

        let result = read_records(&out);
        assert!(matches!(result, Err(IoError::CorruptRecord(msg)) if msg.contains("payload")));
    }

    #[test]
    fn detects_corrupt_length() {
        let mut out = Vec::new();
        encode_record(b"payload", &mut out);
        out[0] = 0x7f;

        let result = read_records(&out);
        assert!(matches!(result, Err(IoError::CorruptRecord(msg)) if msg.contains("length")));
    }

    #[test]
    fn detects_truncation() {
        let mut out = Vec::new();
        encode_record(b"payload", &mut out);
        out.truncate(out.len() - 1);

        assert!(read_records(&out).is_err());
        assert!(read_records(&out[..5]).is_err());
    }

    #[test]
    fn file_name_carries_suffix() {
        let name = event_file_name(1_500_000_000, "host", 42, 0);
        assert_eq!(
            name,
            "events.out.tfevents.1500000000.host.42.0.profile-empty"
        );
    }

    #[tokio::test]
    async fn writes_header_only_event_file() {
        let tmp = TempDir::new().unwrap();
        let logdir = tmp.path().join("logs");

        let path = write_empty_event_file(&logdir).await.unwrap();
        assert_eq!(path.parent(), Some(logdir.as_path()));
        assert!(path.to_string_lossy().ends_with(EVENT_FILE_SUFFIX));

        let bytes = std::fs::read(&path).unwrap();
        let records = read_records(&bytes).unwrap();
        assert_eq!(records.len(), 1);

        let event = Event::decode(records[0].as_slice()).unwrap();
        assert_eq!(event.file_version.as_deref(), Some(FILE_VERSION));
        assert!(event.wall_time > 0.0);
    }

    #[tokio::test]
    async fn successive_files_get_distinct_names() {
        let tmp = TempDir::new().unwrap();

        let first = write_empty_event_file(tmp.path()).await.unwrap();
        let second = write_empty_event_file(tmp.path()).await.unwrap();
        assert_ne!(first, second);
    }
}
