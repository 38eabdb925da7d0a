//! FFprobe integration for stream inspection
//!
//! This module runs ffprobe against an input file and returns its JSON
//! report. Interpreting the report is the job of `media::catalog`.

use crate::error::{CoreResult, command_failed_error, command_start_error};
use serde_json::Value;
use std::path::Path;
use std::process::Command;

/// Program name of the prober.
pub const FFPROBE: &str = "ffprobe";

/// Trait for running ffprobe, so tests can supply canned reports.
pub trait FfprobeExecutor {
    /// Returns the parsed `-show_format -show_streams` report for `input_path`.
    fn probe(&self, input_path: &Path) -> CoreResult<Value>;
}

/// `FfprobeExecutor` that runs the ffprobe binary found on `PATH`.
#[derive(Debug, Clone, Default)]
pub struct CliFfprobeExecutor;

impl CliFfprobeExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl FfprobeExecutor for CliFfprobeExecutor {
    fn probe(&self, input_path: &Path) -> CoreResult<Value> {
        log::debug!("Running ffprobe on: {}", input_path.display());

        let output = Command::new(FFPROBE)
            .args(["-v", "quiet", "-print_format", "json", "-show_format", "-show_streams"])
            .arg(input_path)
            .output()
            .map_err(|e| command_start_error(FFPROBE, e))?;

        if !output.status.success() {
            log::error!("ffprobe failed for {}: {}", input_path.display(), output.status);
            return Err(command_failed_error(
                FFPROBE,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let report: Value = serde_json::from_slice(&output.stdout)?;
        log::trace!("ffprobe report for {}: {}", input_path.display(), report);
        Ok(report)
    }
}
