//! Per-file decision logic and batch orchestration.
//!
//! The decision stages are pure functions of a stream catalog and the encode
//! policy; only the batch loop talks to the filesystem and external tools.

/// Video filter planning (deinterlace, crop, upscale)
pub mod filters;

/// Track selection and codec decisions
pub mod selection;

/// Directory-level orchestration
pub mod batch;

pub use batch::process_directory;
pub use filters::{FilterPlan, plan_filters};
pub use selection::{StreamSelection, VideoSelection, select_audio, select_subtitle, select_video};
