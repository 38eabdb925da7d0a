//! Encode policy and constants for the videoconverter-core library.
//!
//! The policy is resolved once per run by the caller (normally the CLI) and is
//! read-only from then on: nothing in the core mutates it.

mod builder;

use std::path::PathBuf;

use crate::error::{CoreError, CoreResult};

pub use builder::EncodePolicyBuilder;

// Default constants

/// Default CRF (Constant Rate Factor) for libx264, and the constant QP used
/// in GPU mode. Lower values produce higher quality but larger files.
pub const DEFAULT_CRF: u8 = 20;

/// Highest CRF accepted by libx264 for 8-bit content.
pub const MAX_CRF: u8 = 51;

/// Height that `upscale` scales smaller sources up to.
pub const UPSCALE_TARGET_HEIGHT: u32 = 1080;

/// Where the episode sequencer keeps its record between runs.
pub const DEFAULT_STATE_FILE: &str = "/tmp/videoconverter.state";

/// ffmpeg crashes on some large remuxes without a generous muxing queue.
pub const MAX_MUXING_QUEUE_SIZE: u32 = 16384;

/// Output directory name used outside of TV mode.
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "newfiles";

/// Global encode policy for a batch run.
///
/// Every field maps onto one command-line option of the CLI. The policy is an
/// opaque input to the decision engine: track selection, filter planning and
/// command assembly read it but never change it.
///
/// # Examples
///
/// ```rust
/// use videoconverter_core::config::EncodePolicyBuilder;
///
/// let policy = EncodePolicyBuilder::new()
///     .crf(18)
///     .tune("film")
///     .keep_all_streams(true)
///     .build();
/// assert_eq!(policy.effective_crf(), 18);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodePolicy {
    /// Keep every audio and subtitle track regardless of language tags
    pub keep_all_streams: bool,

    /// CRF override; `DEFAULT_CRF` is used when unset
    pub crf: Option<u8>,

    /// Verbatim crop filter, e.g. `crop=1920:800:0:140`
    pub crop: Option<String>,

    /// Deinterlace even if the stream reports progressive frames
    pub force_deinterlace: bool,

    /// Never deinterlace; wins over detection and `force_deinterlace`
    pub no_deinterlace: bool,

    /// Re-encode video even when the source could be copied
    pub force_reencode: bool,

    /// Encode with NVENC (HEVC output) instead of libx264
    pub gpu: bool,

    /// Do not add hardware decoding flags
    pub no_hwaccel: bool,

    /// Log the commands without running them or touching the filesystem
    pub simulate: bool,

    /// libx264 tune name (film, animation, grain, ...)
    pub tune: Option<String>,

    /// Scale sources below `UPSCALE_TARGET_HEIGHT` up to it
    pub upscale: bool,

    /// Replace existing output files instead of skipping them
    pub overwrite: bool,
}

impl EncodePolicy {
    /// CRF to pass to the encoder.
    #[must_use]
    pub fn effective_crf(&self) -> u8 {
        self.crf.unwrap_or(DEFAULT_CRF)
    }

    /// Crop expression, if one was supplied and is not blank.
    #[must_use]
    pub fn crop_filter(&self) -> Option<&str> {
        self.crop
            .as_deref()
            .map(str::trim)
            .filter(|crop| !crop.is_empty())
    }

    /// Rejects option combinations that cannot produce a sensible command.
    ///
    /// # Errors
    ///
    /// * `CoreError::Config` - If two options contradict each other or the
    ///   CRF is out of range
    pub fn validate(&self) -> CoreResult<()> {
        if self.gpu && self.no_hwaccel {
            return Err(CoreError::Config(
                "GPU mode and disabling hardware acceleration are incompatible".to_string(),
            ));
        }
        if self.gpu && self.tune.is_some() {
            return Err(CoreError::Config(
                "tune is a libx264 option and cannot be used in GPU mode".to_string(),
            ));
        }
        if self.force_deinterlace && self.no_deinterlace {
            return Err(CoreError::Config(
                "force-deinterlace and no-deinterlace are incompatible".to_string(),
            ));
        }
        if let Some(crf) = self.crf {
            if crf > MAX_CRF {
                return Err(CoreError::Config(format!(
                    "CRF {crf} is out of range (0-{MAX_CRF})"
                )));
            }
        }
        Ok(())
    }
}

/// Location of the sequencer record, honouring an explicit override.
#[must_use]
pub fn state_file_path(override_path: Option<PathBuf>) -> PathBuf {
    override_path.unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE))
}
