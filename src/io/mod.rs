pub mod error;
pub mod event_file;
pub mod fs;
pub mod text_format;
pub mod trace_file;

// Re-export commonly used types
pub use error::IoError;
pub use event_file::{read_records, write_empty_event_file};
pub use fs::{DirStatus, copy_file, ensure_dir, write_file};
pub use text_format::{TextFormatError, parse_trace};
pub use trace_file::{read_trace, write_trace};
