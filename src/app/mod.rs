pub mod cli;
pub mod error;

// Re-export commonly used types
pub use cli::{CliApp, CliAppWithArgs, init_logging};
pub use error::AppError;
