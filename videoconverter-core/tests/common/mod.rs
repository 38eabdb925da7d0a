// videoconverter-core/tests/common/mod.rs
//
// Shared test support: mock ffprobe/ffmpeg implementations and probe report
// builders.

#![allow(dead_code)]

use ffmpeg_sidecar::event::FfmpegEvent;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::rc::Rc;
use videoconverter_core::error::{CoreError, CoreResult};
use videoconverter_core::external::{FfmpegProcess, FfmpegSpawner, FfprobeExecutor};

/// Mock implementation of FfmpegProcess.
#[derive(Clone)]
pub struct MockFfmpegProcess {
    pub events_to_emit: Vec<FfmpegEvent>,
    pub exit_status: ExitStatus,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        for event in self.events_to_emit.clone() {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

/// Mock FfmpegSpawner that records every command and succeeds unless a
/// failure pattern matches one of its arguments.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    failures: Rc<RefCell<Vec<(String, i32)>>>,
    received_calls: Rc<RefCell<Vec<Vec<String>>>>,
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Default::default()
    }

    /// Makes commands with an argument containing `arg_pattern` exit with `exit_code`.
    pub fn fail_when(&self, arg_pattern: &str, exit_code: i32) {
        self.failures
            .borrow_mut()
            .push((arg_pattern.to_string(), exit_code));
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.borrow().clone()
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, args: &[String]) -> CoreResult<Self::Process> {
        self.received_calls.borrow_mut().push(args.to_vec());

        let failure = self
            .failures
            .borrow()
            .iter()
            .find(|(pattern, _)| args.iter().any(|arg| arg.contains(pattern.as_str())))
            .map(|(_, code)| *code);

        let (events, exit_status) = match failure {
            // Raw wait status: exit code lives in the high byte
            Some(code) => (
                vec![FfmpegEvent::Error("Simulated ffmpeg error line".to_string())],
                ExitStatus::from_raw(code << 8),
            ),
            None => {
                if let Some(output) = args.last() {
                    File::create(output).expect("mock output file");
                }
                (vec![], ExitStatus::from_raw(0))
            }
        };

        Ok(MockFfmpegProcess {
            events_to_emit: events,
            exit_status,
        })
    }
}

/// Mock FfprobeExecutor returning canned reports keyed by file name.
#[derive(Clone, Default)]
pub struct MockFfprobeExecutor {
    reports: Rc<RefCell<HashMap<String, Value>>>,
    probed: Rc<RefCell<Vec<PathBuf>>>,
}

impl MockFfprobeExecutor {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn expect_report(&self, file_name: &str, report: Value) {
        self.reports
            .borrow_mut()
            .insert(file_name.to_string(), report);
    }

    pub fn probed_files(&self) -> Vec<PathBuf> {
        self.probed.borrow().clone()
    }
}

impl FfprobeExecutor for MockFfprobeExecutor {
    fn probe(&self, input_path: &Path) -> CoreResult<Value> {
        self.probed.borrow_mut().push(input_path.to_path_buf());
        let name = input_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.reports.borrow().get(&name).cloned().ok_or_else(|| {
            CoreError::CommandFailed(
                "ffprobe".to_string(),
                ExitStatus::from_raw(1 << 8),
                format!("no report for {name}"),
            )
        })
    }
}

/// Creates an empty file named `name` in `dir`.
pub fn create_dummy_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    File::create(&path).expect("Failed to create dummy file");
    path
}

/// One H.264 progressive video stream and one English AAC stream.
pub fn h264_aac_report() -> Value {
    json!({
        "streams": [
            {"index": 0, "codec_type": "video", "codec_name": "h264",
             "field_order": "progressive", "width": 1920, "height": 1080},
            {"index": 1, "codec_type": "audio", "codec_name": "aac",
             "tags": {"language": "eng"}}
        ],
        "format": {"format_name": "matroska,webm"}
    })
}

/// Interlaced MPEG-2 with English and Japanese AC-3 and a PGS subtitle.
pub fn mpeg2_dvd_report() -> Value {
    json!({
        "streams": [
            {"index": 0, "codec_type": "video", "codec_name": "mpeg2video",
             "field_order": "tt", "width": 720, "height": 480},
            {"index": 1, "codec_type": "audio", "codec_name": "ac3",
             "tags": {"language": "eng"}},
            {"index": 2, "codec_type": "audio", "codec_name": "ac3",
             "tags": {"language": "jpn"}},
            {"index": 3, "codec_type": "subtitle", "codec_name": "hdmv_pgs_subtitle",
             "tags": {"language": "eng"}}
        ]
    })
}

/// Two genuine video streams.
pub fn two_video_report() -> Value {
    json!({
        "streams": [
            {"index": 0, "codec_type": "video", "codec_name": "h264"},
            {"index": 1, "codec_type": "video", "codec_name": "hevc"}
        ]
    })
}

/// Position of `needle` in `args`, if present.
pub fn position_of(args: &[String], needle: &str) -> Option<usize> {
    args.iter().position(|arg| arg == needle)
}

/// Value following `flag` in `args`.
pub fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    position_of(args, flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}
