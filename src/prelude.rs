//! Prelude module for convenient imports
//!
//! Import everything you need with: `use profile_demo::prelude::*;`

// Domain types
pub use crate::domain::{
    AUXILIARY_FILES, AuxiliaryFile, DemoConfig, DemoConfigBuilder, Device, DomainError, LOGDIR,
    PLUGIN_NAME, Resource, RunSpec, Trace, TraceEvent, plugin_directory,
};

// IO types
pub use crate::io::{
    DirStatus, IoError, TextFormatError, ensure_dir, parse_trace, read_records, read_trace,
    write_empty_event_file, write_trace,
};

// Publisher types
pub use crate::publisher::{DemoPublisher, DumpReport, PublishError, dump_data};

// App types
pub use crate::app::{AppError, CliApp, init_logging};
