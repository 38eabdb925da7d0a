//! Batch outcome reporting.
//!
//! The batch loop never raises per-file errors past its own boundary;
//! instead every file ends up either in `converted` or in `failures`.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// A file that was converted (or would have been, in simulate mode).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub simulated: bool,
    pub elapsed: Duration,
}

/// A file that was skipped, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub input: PathBuf,
    pub reason: String,
}

/// Everything that happened during one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub output_dir: PathBuf,
    pub converted: Vec<ConversionOutcome>,
    pub failures: Vec<FileFailure>,
    /// The batch stopped early because of an interrupt.
    pub interrupted: bool,
    /// Why the episode state could not be saved, if it could not.
    pub state_error: Option<String>,
    pub elapsed: Duration,
}

impl BatchReport {
    /// Number of files whose command was only logged.
    #[must_use]
    pub fn simulated_count(&self) -> usize {
        self.converted.iter().filter(|outcome| outcome.simulated).count()
    }

    /// `original -> output` lines for every converted file, using file names only.
    #[must_use]
    pub fn rename_lines(&self) -> Vec<String> {
        self.converted
            .iter()
            .map(|outcome| {
                let name = |path: &PathBuf| {
                    path.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string())
                };
                format!("{} -> {}", name(&outcome.input), name(&outcome.output))
            })
            .collect()
    }

    /// Whether every attempted file succeeded, the batch ran to the end and
    /// the episode state (if any) was saved.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && !self.interrupted && self.state_error.is_none()
    }
}
