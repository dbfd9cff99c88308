pub mod config;
pub mod demo;
pub mod error;
pub mod layout;
pub mod trace;

// Re-export commonly used types
pub use config::{DemoConfig, DemoConfigBuilder, RunSpec};
pub use error::DomainError;
pub use layout::{AUXILIARY_FILES, AuxiliaryFile, LOGDIR, PLUGIN_NAME, plugin_directory};
pub use trace::{Device, Resource, Trace, TraceEvent};
