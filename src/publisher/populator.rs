use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::error::PublishError;
use crate::domain::layout::{
    AUXILIARY_FILES, PLUGIN_NAME, SENTINEL_CONTENT, SENTINEL_FILE, SENTINEL_RUN, TRACE_FILE,
    plugin_directory,
};
use crate::domain::{DemoConfig, RunSpec};
use crate::io::{IoError, copy_file, ensure_dir, write_empty_event_file, write_file, write_trace};

/// Summary of a completed dump
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpReport {
    /// The `.profile-empty` marker written into the log directory
    pub event_file: PathBuf,
    pub plugin_dir: PathBuf,
    /// Runs written, in order, excluding the unsupported-data run
    pub runs: Vec<String>,
    pub traces_written: usize,
    pub files_copied: usize,
}

/// Writes a [`DemoConfig`] into a log directory as profile plugin data
pub struct DemoPublisher<'a> {
    config: &'a DemoConfig,
}

impl<'a> DemoPublisher<'a> {
    pub fn new(config: &'a DemoConfig) -> Self {
        Self { config }
    }

    /// Materialize every configured run plus the unsupported-data run under `logdir`
    ///
    /// Stops at the first failure without removing what was already written.
    pub async fn publish(&self, logdir: &Path) -> Result<DumpReport, PublishError> {
        let event_file = write_empty_event_file(logdir).await?;

        let plugin_dir = plugin_directory(logdir, PLUGIN_NAME);
        ensure_dir(&plugin_dir).await?;

        let mut report = DumpReport {
            event_file,
            plugin_dir,
            ..Default::default()
        };

        for run in self.config.runs() {
            self.publish_run(run, &mut report)
                .await
                .map_err(|source| PublishError::Run {
                    run: run.name.clone(),
                    source,
                })?;
            report.runs.push(run.name.clone());
        }

        self.publish_unsupported(&report.plugin_dir)
            .await
            .map_err(|source| PublishError::Run {
                run: SENTINEL_RUN.to_string(),
                source,
            })?;

        info!(
            runs = report.runs.len(),
            traces = report.traces_written,
            files = report.files_copied,
            "Published demo data"
        );
        Ok(report)
    }

    async fn publish_run(&self, run: &RunSpec, report: &mut DumpReport) -> Result<(), IoError> {
        debug!(run = %run.name, "Publishing run");

        let run_dir = report.plugin_dir.join(&run.name);
        ensure_dir(&run_dir).await?;

        if let Some(text) = &run.trace {
            write_trace(text, &run_dir.join(TRACE_FILE)).await?;
            report.traces_written += 1;
        }

        if !run.trace_only {
            for file in AUXILIARY_FILES {
                copy_file(
                    &self.config.fixture_dir().join(file.source),
                    &run_dir.join(file.target),
                )
                .await?;
                report.files_copied += 1;
            }
        }

        Ok(())
    }

    /// Tool data the dashboard cannot render; it should show nothing for it
    async fn publish_unsupported(&self, plugin_dir: &Path) -> Result<(), IoError> {
        let run_dir = plugin_dir.join(SENTINEL_RUN);
        ensure_dir(&run_dir).await?;
        write_file(&run_dir.join(SENTINEL_FILE), SENTINEL_CONTENT.as_bytes()).await
    }
}

/// Dump `config` into `logdir`
pub async fn dump_data(logdir: &Path, config: &DemoConfig) -> Result<DumpReport, PublishError> {
    DemoPublisher::new(config).publish(logdir).await
}
