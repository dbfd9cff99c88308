//! On-disk naming conventions shared with the dashboard's log-directory scanner.

use std::path::{Path, PathBuf};

/// Log directory the demo binary writes to
pub const LOGDIR: &str = "/tmp/profile_demo";

/// Plugin name the dashboard uses to find profile data
pub const PLUGIN_NAME: &str = "profile";

/// Must stay in sync with the profiler's `kProfileEmptySuffix`
pub const EVENT_FILE_SUFFIX: &str = ".profile-empty";

/// Run that demonstrates the "unsupported data" state
pub const SENTINEL_RUN: &str = "empty";
pub const SENTINEL_FILE: &str = "unsupported";
pub const SENTINEL_CONTENT: &str = "unsupported data";

/// File name of the binary trace inside a run directory
pub const TRACE_FILE: &str = "trace";

/// An auxiliary tool file copied verbatim into each non trace-only run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuxiliaryFile {
    /// File name inside the fixture directory
    pub source: &'static str,
    /// File name inside the run directory
    pub target: &'static str,
}

pub const AUXILIARY_FILES: [AuxiliaryFile; 4] = [
    AuxiliaryFile {
        source: "profile_demo.op_profile.json",
        target: "op_profile.json",
    },
    AuxiliaryFile {
        source: "profile_demo.memory_viewer.json",
        target: "memory_viewer.json",
    },
    AuxiliaryFile {
        source: "profile_demo.google_chart_demo.json",
        target: "google_chart_demo.json",
    },
    AuxiliaryFile {
        source: "profile_demo.end_2_end.json",
        target: "end_2_end.json",
    },
];

/// Directory holding a plugin's data for the given log directory
pub fn plugin_directory(logdir: impl AsRef<Path>, plugin_name: &str) -> PathBuf {
    logdir.as_ref().join("plugins").join(plugin_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_directory_is_namespaced() {
        assert_eq!(
            plugin_directory("/tmp/logs", PLUGIN_NAME),
            PathBuf::from("/tmp/logs/plugins/profile")
        );
    }

    #[test]
    fn auxiliary_targets_are_distinct() {
        for (i, a) in AUXILIARY_FILES.iter().enumerate() {
            for b in &AUXILIARY_FILES[i + 1..] {
                assert_ne!(a.target, b.target);
            }
        }
    }
}
