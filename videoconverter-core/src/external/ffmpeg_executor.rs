// ============================================================================
// videoconverter-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: FFmpeg Process Management and Abstraction
//
// This module runs a finished ffmpeg argument list. Spawning goes through the
// FfmpegSpawner trait so the batch loop can be driven by a mock in tests.
//
// KEY COMPONENTS:
// - FfmpegProcess: Trait representing an active FFmpeg process
// - FfmpegSpawner: Trait for creating new FFmpeg processes from arguments
// - SidecarSpawner: Concrete implementation using ffmpeg-sidecar
// - run_transcode: Spawn, drain events, wait and check the exit status

use crate::error::{CoreResult, command_failed_error, command_start_error, command_wait_error};
use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::process::ExitStatus;

// --- FFmpeg Execution Abstraction ---

/// Trait representing an active ffmpeg process instance.
pub trait FfmpegProcess {
    /// Processes events from the running command using a provided handler closure.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Trait representing something that can spawn an FfmpegProcess.
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;
    /// Spawns ffmpeg. `args[0]` is the program, the rest are its arguments.
    fn spawn(&self, args: &[String]) -> CoreResult<Self::Process>;
}

// --- Concrete Implementation using ffmpeg-sidecar ---

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `FfmpegProcess`.
pub struct SidecarProcess(SidecarChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = self.0.iter().map_err(|e| {
            log::error!("Failed to get ffmpeg event iterator: {}", e);
            command_failed_error("ffmpeg", ExitStatus::default(), e.to_string())
        })?;
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0.wait().map_err(|e| command_wait_error("ffmpeg", e))
    }
}

/// Concrete implementation of `FfmpegSpawner` using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    /// Spawns `args` through ffmpeg-sidecar.
    ///
    /// The process that runs differs slightly from the logged command:
    /// ffmpeg-sidecar puts `-loglevel level+info` before the arguments so it
    /// can parse the log, and on spawn appends `-n` (never overwrite) unless
    /// `args` already hold `-y`, `-n` or `-nostdin`. Without `--overwrite` an
    /// existing output therefore makes ffmpeg fail instead of prompting.
    fn spawn(&self, args: &[String]) -> CoreResult<Self::Process> {
        let Some((program, rest)) = args.split_first() else {
            return Err(command_start_error(
                "ffmpeg",
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
            ));
        };
        sidecar_command(program, rest)
            .spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error(program.as_str(), e))
    }
}

fn sidecar_command(program: &str, args: &[String]) -> FfmpegCommand {
    let mut command = FfmpegCommand::new_with_path(program);
    command.args(args);
    command
}

/// Runs one transcode to completion.
///
/// Progress is logged at debug level and ffmpeg errors at error level. The
/// last error line is attached to the failure when the exit status is not
/// successful.
///
/// # Errors
///
/// * `CoreError::CommandStart` - If ffmpeg could not be spawned
/// * `CoreError::CommandFailed` - If ffmpeg exited unsuccessfully
/// * `CoreError::CommandWait` - If the exit status could not be collected
pub fn run_transcode<S: FfmpegSpawner>(spawner: &S, args: &[String]) -> CoreResult<()> {
    let mut process = spawner.spawn(args)?;
    let mut last_error: Option<String> = None;

    process.handle_events(|event| {
        match event {
            FfmpegEvent::Progress(progress) => {
                log::debug!(
                    "frame={} fps={:.1} time={} speed={:.2}x",
                    progress.frame,
                    progress.fps,
                    progress.time,
                    progress.speed
                );
            }
            FfmpegEvent::Log(LogLevel::Fatal | LogLevel::Error, message) | FfmpegEvent::Error(message) => {
                log::error!("ffmpeg: {}", message);
                last_error = Some(message);
            }
            FfmpegEvent::Log(LogLevel::Warning, message) => log::warn!("ffmpeg: {}", message),
            FfmpegEvent::Log(_, message) => log::trace!("ffmpeg: {}", message),
            _ => {}
        }
        Ok(())
    })?;

    let status = process.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(command_failed_error(
            "ffmpeg",
            status,
            last_error.unwrap_or_else(|| "transcode failed".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidecar_command_prefixes_log_level() {
        let args: Vec<String> = ["-hide_banner", "-y", "-i", "in.mkv", "out.mkv"]
            .iter()
            .map(ToString::to_string)
            .collect();
        let command = sidecar_command("ffmpeg", &args);
        let actual: Vec<String> = command
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(&actual[..2], ["-loglevel", "level+info"]);
        assert_eq!(&actual[2..], args.as_slice());
    }
}
