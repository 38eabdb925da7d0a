//! Core library of the videoconverter batch transcoder.
//!
//! Given ffprobe's description of a media file, this crate decides which
//! tracks to keep, which codec (or passthrough) each receives and which video
//! filters apply, and then assembles the exact ffmpeg invocation. A batch
//! loop applies these decisions to every file of a directory, optionally
//! naming the outputs as consecutive TV episodes.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use videoconverter_core::config::EncodePolicyBuilder;
//! use videoconverter_core::external::{CliFfprobeExecutor, SidecarSpawner};
//! use videoconverter_core::process_directory;
//! use std::path::Path;
//! use std::sync::atomic::AtomicBool;
//!
//! let policy = EncodePolicyBuilder::new().crf(18).simulate(true).build();
//! let interrupt = AtomicBool::new(false);
//!
//! let report = process_directory(
//!     &SidecarSpawner,
//!     &CliFfprobeExecutor::new(),
//!     &policy,
//!     Path::new("/path/to/disc"),
//!     None,
//!     &interrupt,
//! ).unwrap();
//!
//! for line in report.rename_lines() {
//!     println!("{line}");
//! }
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod hardware_decode;
pub mod media;
pub mod processing;
pub mod reporting;
pub mod sequencer;
pub mod utils;

// Re-exports for public API
pub use config::{EncodePolicy, EncodePolicyBuilder};
pub use discovery::find_processable_files;
pub use error::{CoreError, CoreResult};
pub use media::{Catalog, Track, TrackKind, build_catalog};
pub use processing::process_directory;
pub use reporting::{BatchReport, ConversionOutcome, FileFailure};
pub use sequencer::{Continuation, EpisodeSequencer, SequencerMode, SequencerState};
pub use utils::format_duration;
