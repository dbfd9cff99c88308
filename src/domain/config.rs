use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Component, Path, PathBuf};

use super::error::DomainError;
use super::layout::SENTINEL_RUN;

/// Default location of the auxiliary JSON fixtures, relative to the working directory
pub const DEFAULT_FIXTURE_DIR: &str = "fixtures";

/// One run to materialize
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpec {
    pub name: String,
    /// Protobuf text-format trace, written as `trace` when present
    pub trace: Option<String>,
    /// Trace-only runs receive no auxiliary JSON files
    pub trace_only: bool,
}

/// Immutable description of everything the publisher writes
///
/// Built through [`DemoConfigBuilder`], which rejects inconsistent tables
/// (unknown trace-only runs, duplicate or unusable run names).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    runs: Vec<RunSpec>,
    fixture_dir: PathBuf,
}

impl DemoConfig {
    pub fn builder() -> DemoConfigBuilder {
        DemoConfigBuilder::default()
    }

    /// Runs in definition order
    pub fn runs(&self) -> &[RunSpec] {
        &self.runs
    }

    pub fn run(&self, name: &str) -> Option<&RunSpec> {
        self.runs.iter().find(|run| run.name == name)
    }

    pub fn fixture_dir(&self) -> &Path {
        &self.fixture_dir
    }
}

/// Collects the three facets of the fixture table and validates them together
#[derive(Debug, Clone, Default)]
pub struct DemoConfigBuilder {
    runs: Vec<String>,
    traces: BTreeMap<String, String>,
    trace_only: BTreeSet<String>,
    fixture_dir: Option<PathBuf>,
}

impl DemoConfigBuilder {
    pub fn run(mut self, name: impl Into<String>) -> Self {
        self.runs.push(name.into());
        self
    }

    pub fn runs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.runs.extend(names.into_iter().map(Into::into));
        self
    }

    /// Attach text-format trace content to a run; a later call replaces an earlier one
    pub fn trace(mut self, run: impl Into<String>, text: impl Into<String>) -> Self {
        self.traces.insert(run.into(), text.into());
        self
    }

    pub fn trace_only(mut self, run: impl Into<String>) -> Self {
        self.trace_only.insert(run.into());
        self
    }

    pub fn fixture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fixture_dir = Some(dir.into());
        self
    }

    /// Validate and freeze the table
    pub fn build(mut self) -> Result<DemoConfig, DomainError> {
        let mut seen = HashSet::new();
        for name in &self.runs {
            validate_run_name(name)?;
            if !seen.insert(name.as_str()) {
                return Err(DomainError::DuplicateRun(name.clone()));
            }
        }

        if let Some(unknown) = self.trace_only.iter().find(|r| !seen.contains(r.as_str())) {
            return Err(DomainError::UnknownTraceOnlyRun(unknown.clone()));
        }
        if let Some(unknown) = self.traces.keys().find(|r| !seen.contains(r.as_str())) {
            return Err(DomainError::UnknownTracedRun(unknown.clone()));
        }

        let runs = self
            .runs
            .into_iter()
            .map(|name| RunSpec {
                trace: self.traces.remove(&name),
                trace_only: self.trace_only.contains(&name),
                name,
            })
            .collect();

        Ok(DemoConfig {
            runs,
            fixture_dir: self
                .fixture_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FIXTURE_DIR)),
        })
    }
}

fn validate_run_name(name: &str) -> Result<(), DomainError> {
    if name.is_empty() {
        return Err(DomainError::EmptyRunName);
    }
    if name == SENTINEL_RUN {
        return Err(DomainError::ReservedRunName(name.to_string()));
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name => Ok(()),
        _ => Err(DomainError::InvalidRunName(name.to_string())),
    }
}
