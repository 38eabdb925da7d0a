// ============================================================================
// videoconverter-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg and ffprobe
//
// This module encapsulates everything that talks to an external program:
// building the ffmpeg argument list, spawning ffmpeg, running ffprobe and
// checking that both are installed.
//
// KEY COMPONENTS:
// - FfmpegCommandBuilder / build_transcode_command: Pure argument assembly
// - FfmpegSpawner / FfmpegProcess: Process traits (ffmpeg-sidecar backed)
// - FfprobeExecutor: Probe trait (ffprobe CLI backed)
// - check_dependency: PATH check for required tools
//
// The traits allow consumers to provide their own implementations for
// testing without running real processes.

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::io;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Contains ffmpeg argument building logic
pub mod ffmpeg_builder;

/// Contains traits and implementations for executing ffmpeg commands
pub mod ffmpeg_executor;

/// Contains traits and implementations for executing ffprobe commands
pub mod ffprobe_executor;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg_builder::{FFMPEG, FfmpegCommandBuilder, VideoFilterChain, build_transcode_command};
pub use ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner, run_transcode};
pub use ffprobe_executor::{CliFfprobeExecutor, FFPROBE, FfprobeExecutor};

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks if a required external command is available and executable.
///
/// Runs the command with `-version` and discards its output.
///
/// # Arguments
///
/// * `cmd_name` - The name of the command to check (e.g., "ffmpeg")
///
/// # Returns
///
/// * `Ok(())` - If the command could be started
/// * `Err(CoreError::DependencyNotFound)` - If the command is not found
/// * `Err(CoreError::CommandStart)` - If the command exists but fails to start
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{}': {}", cmd_name, e);
            Err(CoreError::CommandStart(cmd_name.to_string(), e))
        }
    }
}
