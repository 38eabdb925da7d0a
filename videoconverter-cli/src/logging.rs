// ============================================================================
// videoconverter-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: fern dispatcher for the console and the optional log file
//
// The core library only talks to the `log` facade; this module decides where
// those records go.
//
// KEY COMPONENTS:
// - init_logging: installs the global logger
// - get_timestamp: timestamp used in log file lines
//
// USAGE:
// - default: info and above on stderr
// - -v / -vv: debug / trace
// - -q: warnings and errors only
// - -V: additionally append debug records to DIRECTORY/videoconverter.log

// ---- External crate imports ----
use log::LevelFilter;

// ---- Internal crate imports ----
use videoconverter_core::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::path::Path;

/// File name of the `-V` log inside the processed directory.
pub const LOG_FILE_NAME: &str = "videoconverter.log";

/// Returns the current local timestamp formatted as "YYYY-MM-DD HH:MM:SS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Installs the global logger.
///
/// # Arguments
///
/// * `console_level` - Threshold for records printed to stderr
/// * `log_dir` - When set, debug records are also appended to
///   `log_dir/videoconverter.log`
pub fn init_logging(console_level: LevelFilter, log_dir: Option<&Path>) -> CoreResult<()> {
    let console = fern::Dispatch::new()
        .format(|out, message, record| {
            if record.level() <= log::Level::Warn {
                out.finish(format_args!("{}: {}", record.level(), message))
            } else {
                out.finish(format_args!("{}", message))
            }
        })
        .level(console_level)
        .chain(std::io::stderr());

    let mut dispatch = fern::Dispatch::new().chain(console);

    if let Some(dir) = log_dir {
        let file = fern::log_file(dir.join(LOG_FILE_NAME))?;
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "[{}] {:<5} {}: {}",
                        get_timestamp(),
                        record.level(),
                        record.target(),
                        message
                    ))
                })
                .level(LevelFilter::Debug)
                .chain(file),
        );
    }

    dispatch
        .apply()
        .map_err(|e| CoreError::Config(format!("Failed to install logger: {e}")))
}
