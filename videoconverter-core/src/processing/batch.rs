// ============================================================================
// videoconverter-core/src/processing/batch.rs
// ============================================================================
//
// BATCH PROCESSING: Directory Conversion Orchestration
//
// This module converts every candidate file of one directory, one file at a
// time, and collects the outcome of each into a BatchReport.
//
// WORKFLOW:
// 1. Find candidate files (sorted case-insensitively)
// 2. Prepare the output directory (`Season SS` or `newfiles`)
// 3. For each file, until interrupted:
//    a. Probe the file and build its stream catalog
//    b. Select video, audio and subtitle tracks; plan filters
//    c. Derive the output name (consuming an episode in TV mode)
//    d. Build the ffmpeg command
//    e. Log it (simulate) or run it
// 4. Persist the episode state if the batch ran to the end (a failed write
//    is recorded on the report)
//
// Per-file errors are recorded as failures and the next file is processed;
// only errors that affect the whole batch are returned.

// ---- Internal crate imports ----
use crate::config::{DEFAULT_OUTPUT_DIR_NAME, EncodePolicy};
use crate::discovery::find_processable_files;
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegSpawner, FfprobeExecutor, build_transcode_command, run_transcode};
use crate::media::build_catalog;
use crate::processing::selection::{select_audio, select_subtitle, select_video};
use crate::reporting::{BatchReport, ConversionOutcome, FileFailure};
use crate::sequencer::EpisodeSequencer;
use crate::utils::{get_filename_safe, matroska_file_name};

// ---- Standard library imports ----
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

// ============================================================================
// MAIN PROCESSING FUNCTION
// ============================================================================

/// Converts every candidate file in `directory`.
///
/// # Arguments
///
/// * `spawner` - Runs ffmpeg
/// * `prober` - Runs ffprobe
/// * `policy` - Encode policy for the whole batch
/// * `directory` - Directory holding the input files
/// * `sequencer` - Episode sequencer when running in TV mode
/// * `interrupt` - Set (e.g. by a Ctrl-C handler) to stop before the next file
///
/// # Returns
///
/// * `Ok(BatchReport)` - Converted files, failures, and whether the batch
///   was interrupted
///
/// # Errors
///
/// * `CoreError::Config` - If the policy is inconsistent
/// * `CoreError::NoFilesFound` - If the directory holds no candidate files
/// * `CoreError::Io` - If the directory cannot be listed or the output
///   directory cannot be created
///
/// A failure to save the episode state is not an error: it is logged and
/// recorded in `BatchReport::state_error`.
pub fn process_directory<S: FfmpegSpawner, P: FfprobeExecutor>(
    spawner: &S,
    prober: &P,
    policy: &EncodePolicy,
    directory: &Path,
    mut sequencer: Option<&mut EpisodeSequencer>,
    interrupt: &AtomicBool,
) -> CoreResult<BatchReport> {
    let batch_start = Instant::now();
    policy.validate()?;

    // ========================================================================
    // STEP 1: FIND INPUT FILES
    // ========================================================================
    let files = find_processable_files(directory)?;
    log::info!("Found {} file(s) in {}", files.len(), directory.display());

    // ========================================================================
    // STEP 2: PREPARE OUTPUT DIRECTORY
    // ========================================================================
    let dir_name = sequencer
        .as_deref()
        .map_or_else(|| DEFAULT_OUTPUT_DIR_NAME.to_string(), EpisodeSequencer::season_dir_name);
    let output_dir = directory.join(dir_name);
    if policy.simulate {
        log::debug!("Simulate mode: not creating {}", output_dir.display());
    } else {
        std::fs::create_dir_all(&output_dir)?;
    }

    let mut report = BatchReport {
        output_dir: output_dir.clone(),
        ..Default::default()
    };

    // ========================================================================
    // STEP 3: PROCESS EACH FILE
    // ========================================================================
    for input in &files {
        if interrupt.load(Ordering::SeqCst) {
            log::warn!("Interrupted; stopping before {}", input.display());
            report.interrupted = true;
            break;
        }

        let file_start = Instant::now();
        match process_file(
            spawner,
            prober,
            policy,
            input,
            &output_dir,
            sequencer.as_deref_mut(),
        ) {
            Ok(output) => {
                report.converted.push(ConversionOutcome {
                    input: input.clone(),
                    output,
                    simulated: policy.simulate,
                    elapsed: file_start.elapsed(),
                });
            }
            Err(e) if e.is_per_file() => {
                log::error!("Skipping {}: {}", input.display(), e);
                report.failures.push(FileFailure {
                    input: input.clone(),
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    // A signal that arrives while the last file is converting still counts
    if interrupt.load(Ordering::SeqCst) {
        report.interrupted = true;
    }

    // ========================================================================
    // STEP 4: PERSIST EPISODE STATE
    // ========================================================================
    if let Some(sequencer) = sequencer {
        if report.interrupted {
            log::warn!("Batch interrupted; episode state not saved");
        } else if policy.simulate {
            log::info!("Simulate mode: episode state not saved");
        } else if let Err(e) = sequencer.persist() {
            // The files are already converted; keep their report
            log::error!(
                "Failed to save episode state to {}: {}",
                sequencer.path().display(),
                e
            );
            report.state_error = Some(e.to_string());
        }
    }

    report.elapsed = batch_start.elapsed();
    log::info!(
        "Batch finished: {} converted, {} failed",
        report.converted.len(),
        report.failures.len()
    );
    match serde_json::to_string(&report) {
        Ok(json) => log::debug!("Batch report: {}", json),
        Err(e) => log::warn!("Failed to serialize batch report: {}", e),
    }
    Ok(report)
}

/// Decides and runs the conversion of one file, returning its output path.
fn process_file<S: FfmpegSpawner, P: FfprobeExecutor>(
    spawner: &S,
    prober: &P,
    policy: &EncodePolicy,
    input: &Path,
    output_dir: &Path,
    sequencer: Option<&mut EpisodeSequencer>,
) -> CoreResult<PathBuf> {
    let input_name = get_filename_safe(input)?;
    log::info!("Processing {}", input_name);

    // ---- STEP 3a: PROBE ----
    let report = prober.probe(input)?;
    let catalog = build_catalog(&report)?;

    // ---- STEP 3b: SELECT TRACKS ----
    let video = select_video(&catalog, policy)?;
    let audio = select_audio(&catalog, policy.keep_all_streams);
    let subtitle = select_subtitle(&catalog, policy.keep_all_streams);

    // ---- STEP 3c: OUTPUT NAME ----
    let output_name = match sequencer {
        Some(sequencer) => {
            let episode = sequencer.next_episode();
            sequencer.episode_file_name(episode)
        }
        None => matroska_file_name(input)?,
    };
    let output = output_dir.join(&output_name);
    log::info!("{} -> {}", input_name, output_name);

    if output.exists() && !policy.overwrite && !policy.simulate {
        return Err(CoreError::OutputExists(output.display().to_string()));
    }

    // ---- STEP 3d: BUILD COMMAND ----
    let args = build_transcode_command(input, &output, &video, &audio, &subtitle, policy);
    log::info!("{}", args.join(" "));

    // ---- STEP 3e: RUN ----
    if policy.simulate {
        return Ok(output);
    }
    run_transcode(spawner, &args)?;
    Ok(output)
}
