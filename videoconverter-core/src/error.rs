// ============================================================================
// videoconverter-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error taxonomy for the videoconverter core library
//
// Decision-layer errors (MalformedProbe, MultipleVideoStreams, NoVideoStream,
// OutputExists) are per-file: the batch loop records them and moves on.
// MalformedState is recovered by the sequencer loader. Process and I/O errors
// wrap the underlying cause with the name of the tool involved.

use std::process::ExitStatus;
use thiserror::Error;

/// Custom error types for the videoconverter core library
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed probe result: {0}")]
    MalformedProbe(String),

    #[error("The file provided has {0} video streams; expected exactly one")]
    MultipleVideoStreams(usize),

    #[error("The file provided does not contain a video stream")]
    NoVideoStream,

    #[error("Malformed state file: {0}")]
    MalformedState(String),

    #[error("Output file already exists: {0}")]
    OutputExists(String),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to start '{0}': {1}")]
    CommandStart(String, std::io::Error),

    #[error("'{0}' exited with {1}: {2}")]
    CommandFailed(String, ExitStatus, String),

    #[error("Failed waiting for '{0}': {1}")]
    CommandWait(String, std::io::Error),

    #[error("Required dependency not found: {0}")]
    DependencyNotFound(String),

    #[error("No processable files found")]
    NoFilesFound,

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for videoconverter core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds a `CommandStart` error for a tool that could not be spawned.
pub fn command_start_error(tool: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandStart(tool.into(), err)
}

/// Builds a `CommandFailed` error for a tool that exited unsuccessfully.
pub fn command_failed_error(
    tool: impl Into<String>,
    status: ExitStatus,
    detail: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed(tool.into(), status, detail.into())
}

/// Builds a `CommandWait` error for a tool whose exit status could not be read.
pub fn command_wait_error(tool: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandWait(tool.into(), err)
}

impl CoreError {
    /// Whether this error only affects the file being processed.
    ///
    /// The batch loop records per-file errors and continues; anything else
    /// (for example a missing output directory) ends the batch.
    #[must_use]
    pub fn is_per_file(&self) -> bool {
        !matches!(
            self,
            CoreError::DependencyNotFound(_)
                | CoreError::NoFilesFound
                | CoreError::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::MultipleVideoStreams(2);
        assert_eq!(
            err.to_string(),
            "The file provided has 2 video streams; expected exactly one"
        );

        let err = CoreError::MalformedState("expected 3 fields, found 2".to_string());
        assert!(err.to_string().contains("expected 3 fields"));
    }

    #[test]
    fn test_per_file_classification() {
        assert!(CoreError::NoVideoStream.is_per_file());
        assert!(CoreError::MalformedProbe("missing index".into()).is_per_file());
        assert!(!CoreError::NoFilesFound.is_per_file());
        assert!(!CoreError::Config("gpu".into()).is_per_file());
    }
}
