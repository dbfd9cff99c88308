use std::future::Future;

use tracing::level_filters::LevelFilter;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use super::error::AppError;

/// Exit code for a clean run
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for any error surfaced by the application
pub const EXIT_FAILURE: i32 = 1;

/// Install the stderr log subscriber; `RUST_LOG` overrides the default `info` level
pub fn init_logging() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    // A subscriber may already be installed (e.g. by a test harness).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Reusable CLI application runner that handles:
/// - Argument validation
/// - Signal handling (SIGINT, SIGTERM, SIGHUP)
/// - Exit codes (0 = success, 1 = error, 130 = SIGINT, 143 = SIGTERM, 129 = SIGHUP)
pub struct CliApp {
    name: String,
}

/// A [`CliApp`] with an argument parser attached
pub struct CliAppWithArgs<P> {
    app: CliApp,
    parse_args: P,
}

impl CliApp {
    /// Create a new CLI application runner
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Validate `std::env::args()` with `parse_args` before running
    pub fn with_args<P>(self, parse_args: P) -> CliAppWithArgs<P> {
        CliAppWithArgs {
            app: self,
            parse_args,
        }
    }

    /// Drive `main_fut` to completion unless a signal arrives first
    ///
    /// Returns the process exit code; the caller passes it to `std::process::exit`.
    pub async fn execute<Fut>(&self, main_fut: Fut) -> i32
    where
        Fut: Future<Output = Result<(), AppError>>,
    {
        tokio::select! {
            result = main_fut => self.exit_code(result),
            signal_code = self.wait_for_signal() => {
                eprintln!("{}: interrupted", self.name);
                signal_code
            }
        }
    }

    fn exit_code(&self, result: Result<(), AppError>) -> i32 {
        match result {
            Ok(()) => EXIT_SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                EXIT_FAILURE
            }
        }
    }

    /// Wait for any Unix signal (SIGINT, SIGTERM, SIGHUP) or Ctrl+C
    /// Returns the exit code to use (130 for SIGINT, 143 for SIGTERM, etc.)
    async fn wait_for_signal(&self) -> i32 {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            let handlers = (
                signal(SignalKind::terminate()),
                signal(SignalKind::interrupt()),
                signal(SignalKind::hangup()),
            );
            let (mut sigterm, mut sigint, mut sighup) = match handlers {
                (Ok(term), Ok(int), Ok(hup)) => (term, int, hup),
                _ => {
                    warn!("Failed to install signal handlers; running without them");
                    return std::future::pending().await;
                }
            };

            tokio::select! {
                _ = sigterm.recv() => {
                    eprintln!("Received SIGTERM");
                    143 // 128 + 15
                }
                _ = sigint.recv() => {
                    eprintln!("Received SIGINT");
                    130 // 128 + 2
                }
                _ = sighup.recv() => {
                    eprintln!("Received SIGHUP");
                    129 // 128 + 1
                }
            }
        }

        #[cfg(not(unix))]
        {
            if tokio::signal::ctrl_c().await.is_err() {
                warn!("Failed to install Ctrl+C handler; running without it");
                return std::future::pending().await;
            }
            eprintln!("Received Ctrl+C");
            130
        }
    }
}

impl<P> CliAppWithArgs<P> {
    /// Parse arguments and run `main_fn` with the result, returning the exit code
    pub async fn run<T, F, Fut>(self, args: Vec<String>, main_fn: F) -> i32
    where
        P: FnOnce(Vec<String>) -> Result<T, AppError>,
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<(), AppError>>,
    {
        match (self.parse_args)(args) {
            Ok(parsed) => self.app.execute(main_fn(parsed)).await,
            Err(e) => self.app.exit_code(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn cli_app_new() {
        let app = CliApp::new("test-app");
        assert_eq!(app.name, "test-app");
    }

    #[tokio::test]
    async fn successful_main_exits_zero() {
        let code = CliApp::new("test-app").execute(async { Ok::<(), AppError>(()) }).await;
        assert_eq!(code, EXIT_SUCCESS);
    }

    #[tokio::test]
    async fn failing_main_exits_one() {
        let code = CliApp::new("test-app")
            .execute(async { Err::<(), AppError>(AppError::Config(DomainError::EmptyRunName)) })
            .await;
        assert_eq!(code, EXIT_FAILURE);
    }

    #[tokio::test]
    async fn parsed_args_reach_main() {
        let code = CliApp::new("test-app")
            .with_args(|args: Vec<String>| Ok::<_, AppError>(args.len()))
            .run(vec!["bin".to_string(), "x".to_string()], |count| async move {
                assert_eq!(count, 2);
                Ok::<(), AppError>(())
            })
            .await;
        assert_eq!(code, EXIT_SUCCESS);
    }

    #[tokio::test]
    async fn argument_errors_skip_main() {
        let ran = std::cell::Cell::new(false);
        let code = CliApp::new("test-app")
            .with_args(|_: Vec<String>| -> Result<(), AppError> {
                Err(AppError::InvalidArguments("nope".to_string()))
            })
            .run(Vec::new(), |()| {
                ran.set(true);
                async { Ok::<(), AppError>(()) }
            })
            .await;
        assert_eq!(code, EXIT_FAILURE);
        assert!(!ran.get());
    }
}
