//! Batch summary printing.
//!
//! Log records go to stderr; the summary is the one thing written to stdout,
//! so it stays readable when the log is redirected.

use console::style;
use std::io::{self, Write};
use videoconverter_core::{BatchReport, format_duration};

/// Writes the end-of-batch summary to `out`.
pub fn write_summary<W: Write>(out: &mut W, report: &BatchReport) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style("Summary").bold().underlined())?;
    writeln!(out, "Output directory: {}", report.output_dir.display())?;

    if !report.converted.is_empty() {
        writeln!(out)?;
        for line in report.rename_lines() {
            writeln!(out, "  {} {}", style("✓").green(), line)?;
        }
    }

    if !report.failures.is_empty() {
        writeln!(out)?;
        for failure in &report.failures {
            writeln!(
                out,
                "  {} {}: {}",
                style("✗").red().bold(),
                failure.input.display(),
                failure.reason
            )?;
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "{} converted, {} failed",
        style(report.converted.len()).bold(),
        style(report.failures.len()).bold()
    )?;
    let simulated = report.simulated_count();
    if simulated > 0 {
        writeln!(out, "{} simulated (no ffmpeg run)", simulated)?;
    }
    if report.interrupted {
        writeln!(out, "{}", style("Interrupted before the end of the batch").yellow())?;
    }
    if let Some(reason) = &report.state_error {
        writeln!(
            out,
            "{} episode state not saved: {}",
            style("Warning:").yellow().bold(),
            reason
        )?;
    }
    writeln!(
        out,
        "Elapsed: {}",
        format_duration(report.elapsed.as_secs_f64())
    )?;
    Ok(())
}

/// Prints the summary to stdout.
pub fn print_summary(report: &BatchReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_summary(&mut out, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;
    use videoconverter_core::{ConversionOutcome, FileFailure};

    #[test]
    fn test_summary_lists_renames_and_failures() {
        console::set_colors_enabled(false);
        let report = BatchReport {
            output_dir: PathBuf::from("/disc/Season 01"),
            converted: vec![ConversionOutcome {
                input: PathBuf::from("/disc/title_t00.mkv"),
                output: PathBuf::from("/disc/Season 01/Show - s01e01.mkv"),
                simulated: true,
                elapsed: Duration::from_secs(1),
            }],
            failures: vec![FileFailure {
                input: PathBuf::from("/disc/title_t01.mkv"),
                reason: "The file provided has 2 video streams; expected exactly one".to_string(),
            }],
            interrupted: false,
            state_error: None,
            elapsed: Duration::from_secs(3725),
        };

        let mut out = Vec::new();
        write_summary(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("title_t00.mkv -> Show - s01e01.mkv"));
        assert!(text.contains("/disc/title_t01.mkv: The file provided has 2 video streams"));
        assert!(text.contains("1 converted, 1 failed"));
        assert!(text.contains("1 simulated"));
        assert!(text.contains("Elapsed: 01:02:05"));
        assert!(!text.contains("Interrupted"));
        assert!(!text.contains("episode state not saved"));
    }

    #[test]
    fn test_summary_reports_unsaved_state() {
        console::set_colors_enabled(false);
        let report = BatchReport {
            output_dir: PathBuf::from("/disc/Season 02"),
            converted: vec![ConversionOutcome {
                input: PathBuf::from("/disc/title_t00.mkv"),
                output: PathBuf::from("/disc/Season 02/Show - s02e05.mkv"),
                simulated: false,
                elapsed: Duration::from_secs(60),
            }],
            state_error: Some("IO error: No such file or directory".to_string()),
            ..Default::default()
        };

        let mut out = Vec::new();
        write_summary(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("title_t00.mkv -> Show - s02e05.mkv"));
        assert!(text.contains("episode state not saved: IO error: No such file or directory"));
    }
}
