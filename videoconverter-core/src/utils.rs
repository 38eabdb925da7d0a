//! Utility functions for formatting and path manipulation.
//!
//! General-purpose helpers used by the batch loop and the CLI summary.

use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// Formats seconds as HH:MM:SS (e.g., 3725.0 -> "01:02:05"). Returns "??:??:??" for invalid inputs.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Safely extracts filename from a path with consistent error handling.
/// Returns the filename as a String, or an error if the path has no filename component.
pub fn get_filename_safe(path: &Path) -> CoreResult<String> {
    Ok(path
        .file_name()
        .ok_or_else(|| CoreError::PathError(format!("Failed to get filename for {}", path.display())))?
        .to_string_lossy()
        .to_string())
}

/// Output name for a non-TV conversion: the input name with its last
/// extension replaced by `.mkv` (`a.b.avi` -> `a.b.mkv`).
pub fn matroska_file_name(input: &Path) -> CoreResult<String> {
    let name = get_filename_safe(input)?;
    let stem = match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name.as_str(),
    };
    Ok(format!("{stem}.mkv"))
}
