use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::error::Error;
use tempfile::tempdir;

// Helper function to get the path to the compiled binary
fn videoconverter_cmd() -> Command {
    let mut cmd = Command::cargo_bin("videoconverter").expect("Failed to find videoconverter binary");
    cmd.env_remove("VIDEOCONVERTER_CRF")
        .env_remove("VIDEOCONVERTER_STATE_FILE");
    cmd
}

#[test]
fn test_help_lists_options() {
    videoconverter_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--all-streams"))
        .stdout(contains("--simulate"))
        .stdout(contains("--state-file"));
}

#[test]
fn test_non_existent_directory() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    videoconverter_cmd()
        .arg(dir.path().join("surely/not/here"))
        .assert()
        .failure()
        .stderr(contains("Invalid directory"));
    Ok(())
}

#[test]
fn test_conflicting_options_are_rejected() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    videoconverter_cmd()
        .arg(dir.path())
        .args(["--gpu", "--no-hwaccel"])
        .assert()
        .failure()
        .stderr(contains("cannot be used with"));

    videoconverter_cmd()
        .arg(dir.path())
        .args(["--deinterlace", "--no-deinterlace"])
        .assert()
        .failure()
        .stderr(contains("cannot be used with"));
    Ok(())
}

#[test]
fn test_invalid_values_are_rejected() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    videoconverter_cmd()
        .arg(dir.path())
        .args(["--crf", "60"])
        .assert()
        .failure()
        .stderr(contains("--crf"));

    videoconverter_cmd()
        .arg(dir.path())
        .args(["--tune", "cinematic"])
        .assert()
        .failure()
        .stderr(contains("stillimage"));
    Ok(())
}

#[test]
fn test_crf_from_environment_is_validated() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    videoconverter_cmd()
        .env("VIDEOCONVERTER_CRF", "99")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(contains("--crf"));
    Ok(())
}

#[test]
fn test_directory_without_media_fails_before_prompting() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    std::fs::write(dir.path().join("notes.txt"), "not a video")?;
    std::fs::write(dir.path().join(".hidden.mkv"), "")?;

    videoconverter_cmd()
        .arg(dir.path())
        .arg("--simulate")
        .write_stdin("")
        .assert()
        .failure()
        .stdout(contains("TV show mode").not())
        .stderr(contains("No processable files found"));
    Ok(())
}

#[test]
fn test_log_file_is_written_and_not_processed() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;

    videoconverter_cmd()
        .arg(dir.path())
        .args(["--simulate", "-V"])
        .assert()
        .failure()
        .stderr(contains("No processable files found"));

    assert!(dir.path().join("videoconverter.log").exists());
    Ok(())
}
