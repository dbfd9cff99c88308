pub mod error;
pub mod populator;

// Re-export commonly used types
pub use error::PublishError;
pub use populator::{DemoPublisher, DumpReport, dump_data};
