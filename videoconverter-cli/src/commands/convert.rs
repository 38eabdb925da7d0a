// ============================================================================
// videoconverter-cli/src/commands/convert.rs
// ============================================================================
//
// CONVERT COMMAND: Runs one batch over a directory
//
// WORKFLOW:
// 1. Resolve the directory and check the encode policy
// 2. Install logging and make sure there is something to convert
// 3. Check that ffprobe (and ffmpeg, unless simulating) are installed
// 4. Ask the TV-mode questions
// 5. Install the Ctrl-C handler and run the batch
// 6. Print the summary

// ---- Internal crate imports ----
use crate::cli::Cli;
use crate::logging::init_logging;
use crate::output::print_summary;
use crate::prompts::prompt_tv_mode;

// ---- External crate imports ----
use log::{debug, info, warn};
use videoconverter_core::config::state_file_path;
use videoconverter_core::external::{
    CliFfprobeExecutor, FFMPEG, FFPROBE, SidecarSpawner, check_dependency,
};
use videoconverter_core::{BatchReport, CoreError, CoreResult, find_processable_files, process_directory};

// ---- Standard library imports ----
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Exit code used when the batch was cut short by Ctrl-C.
pub const EXIT_INTERRUPTED: i32 = 130;

/// Resolves the directory argument to an absolute directory path.
pub fn resolve_directory(directory: &Path) -> CoreResult<PathBuf> {
    let resolved = directory.canonicalize().map_err(|e| {
        CoreError::PathError(format!("Invalid directory '{}': {}", directory.display(), e))
    })?;
    if !resolved.is_dir() {
        return Err(CoreError::PathError(format!(
            "'{}' is not a directory",
            directory.display()
        )));
    }
    Ok(resolved)
}

/// Runs the batch described by `cli` and returns its report.
pub fn run_convert(cli: &Cli) -> CoreResult<BatchReport> {
    // ---- STEP 1: DIRECTORY AND POLICY ----
    let directory = resolve_directory(&cli.directory)?;
    let policy = cli.encode_policy();
    policy.validate()?;

    // ---- STEP 2: LOGGING AND DISCOVERY ----
    init_logging(cli.console_level(), cli.log_file.then_some(directory.as_path()))?;
    debug!("Encode policy: {:?}", policy);

    // Fails fast with NoFilesFound before any question is asked
    find_processable_files(&directory)?;

    // ---- STEP 3: EXTERNAL TOOLS ----
    check_dependency(FFPROBE)?;
    if policy.simulate {
        info!("Simulate mode: commands are logged, not run");
    } else {
        check_dependency(FFMPEG)?;
    }

    // ---- STEP 4: TV MODE ----
    let state_path = state_file_path(cli.state_file.clone());
    let mut sequencer = prompt_tv_mode(cli.tv, state_path)?;

    // ---- STEP 5: RUN THE BATCH ----
    let interrupt = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&interrupt);
    ctrlc::set_handler(move || {
        if handler_flag.swap(true, Ordering::SeqCst) {
            // Second Ctrl-C: give up on the running ffmpeg too
            std::process::exit(EXIT_INTERRUPTED);
        }
        warn!("Ctrl-C received; finishing the current file (press again to abort)");
    })
    .map_err(|e| CoreError::Config(format!("Failed to install Ctrl-C handler: {e}")))?;

    let report = process_directory(
        &SidecarSpawner,
        &CliFfprobeExecutor::new(),
        &policy,
        &directory,
        sequencer.as_mut(),
        &interrupt,
    )?;

    // ---- STEP 6: SUMMARY ----
    print_summary(&report)?;
    Ok(report)
}

/// Exit code for a finished batch: 0 when every file converted and the
/// episode state was saved.
pub fn exit_code(report: &BatchReport) -> i32 {
    if report.interrupted {
        EXIT_INTERRUPTED
    } else if report.is_clean() {
        0
    } else {
        1
    }
}
