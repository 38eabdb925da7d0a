//! File discovery module for finding video files to process.
//!
//! Batch directories usually hold more than video: release info, checksums,
//! split archives and artwork. Everything in the top level of the directory
//! is a candidate except directories, hidden files, files without an
//! extension, and files whose extension is on a fixed denylist. Subdirectories
//! are not searched.

use crate::error::{CoreError, CoreResult};

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Extensions that never hold video.
const DENYLISTED_EXTENSIONS: [&str; 11] = [
    "gif", "jpg", "log", "md", "nfo", "png", "py", "rar", "sfv", "srr", "txt",
];

/// Split-archive parts: `.r00`, `.r01`, ...
static SPLIT_ARCHIVE_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^r\d+$").expect("split archive pattern is valid"));

/// Whether a file name is a batch candidate, judged by name alone.
#[must_use]
pub fn is_candidate_name(file_name: &str) -> bool {
    if file_name.starts_with('.') {
        return false;
    }
    let Some(extension) = Path::new(file_name).extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    let extension = extension.to_ascii_lowercase();
    !DENYLISTED_EXTENSIONS.contains(&extension.as_str()) && !SPLIT_ARCHIVE_PART.is_match(&extension)
}

/// Finds the files to convert in `input_dir`, sorted case-insensitively.
///
/// # Arguments
///
/// * `input_dir` - The directory to search
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - Candidate files in processing order
/// * `Err(CoreError::Io)` - If the directory cannot be read
/// * `Err(CoreError::NoFilesFound)` - If no candidates are found
///
/// # Examples
///
/// ```rust,no_run
/// use videoconverter_core::find_processable_files;
/// use std::path::Path;
///
/// match find_processable_files(Path::new("/path/to/disc")) {
///     Ok(files) => println!("Found {} files", files.len()),
///     Err(e) => println!("Error finding video files: {}", e),
/// }
/// ```
pub fn find_processable_files(input_dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let mut files: Vec<(String, PathBuf)> = std::fs::read_dir(input_dir)?
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let path = entry.path();
            if !path.is_file() {
                return None;
            }
            // Lossy so that names which are not valid UTF-8 are still converted
            let name = entry.file_name().to_string_lossy().into_owned();
            if !is_candidate_name(&name) {
                log::debug!("Skipping {}", name);
                return None;
            }
            Some((name.to_lowercase(), path))
        })
        .collect();

    if files.is_empty() {
        return Err(CoreError::NoFilesFound);
    }

    files.sort_by(|(a_key, a_path), (b_key, b_path)| a_key.cmp(b_key).then_with(|| a_path.cmp(b_path)));
    Ok(files.into_iter().map(|(_, path)| path).collect())
}
