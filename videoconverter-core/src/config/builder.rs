// ============================================================================
// videoconverter-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for EncodePolicy
//
// This module implements the builder pattern for the EncodePolicy structure,
// providing a fluent API for creating policies in code and tests. Every
// option defaults to "off", which matches running the CLI without flags.

// ---- Internal crate imports ----
use super::EncodePolicy;

/// Builder for creating EncodePolicy instances.
///
/// # Examples
///
/// ```rust
/// use videoconverter_core::config::EncodePolicyBuilder;
///
/// let policy = EncodePolicyBuilder::new()
///     .gpu(true)
///     .crf(24)
///     .crop("crop=1920:800:0:140")
///     .simulate(true)
///     .build();
/// assert!(policy.gpu);
/// assert_eq!(policy.crop_filter(), Some("crop=1920:800:0:140"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct EncodePolicyBuilder {
    policy: EncodePolicy,
}

impl EncodePolicyBuilder {
    /// Creates a new builder with every option disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether all audio and subtitle tracks are kept.
    #[must_use]
    pub fn keep_all_streams(mut self, keep: bool) -> Self {
        self.policy.keep_all_streams = keep;
        self
    }

    /// Sets the CRF (or constant QP in GPU mode).
    #[must_use]
    pub fn crf(mut self, crf: u8) -> Self {
        self.policy.crf = Some(crf);
        self
    }

    /// Sets the crop filter expression.
    #[must_use]
    pub fn crop(mut self, crop: impl Into<String>) -> Self {
        self.policy.crop = Some(crop.into());
        self
    }

    /// Forces deinterlacing.
    #[must_use]
    pub fn force_deinterlace(mut self, enable: bool) -> Self {
        self.policy.force_deinterlace = enable;
        self
    }

    /// Disables deinterlacing entirely.
    #[must_use]
    pub fn no_deinterlace(mut self, disable: bool) -> Self {
        self.policy.no_deinterlace = disable;
        self
    }

    /// Forces a video re-encode.
    #[must_use]
    pub fn force_reencode(mut self, enable: bool) -> Self {
        self.policy.force_reencode = enable;
        self
    }

    /// Enables NVENC encoding.
    #[must_use]
    pub fn gpu(mut self, enable: bool) -> Self {
        self.policy.gpu = enable;
        self
    }

    /// Disables hardware decoding flags.
    #[must_use]
    pub fn no_hwaccel(mut self, disable: bool) -> Self {
        self.policy.no_hwaccel = disable;
        self
    }

    /// Enables simulate mode.
    #[must_use]
    pub fn simulate(mut self, enable: bool) -> Self {
        self.policy.simulate = enable;
        self
    }

    /// Sets the libx264 tune.
    #[must_use]
    pub fn tune(mut self, tune: impl Into<String>) -> Self {
        self.policy.tune = Some(tune.into());
        self
    }

    /// Enables upscaling to `UPSCALE_TARGET_HEIGHT`.
    #[must_use]
    pub fn upscale(mut self, enable: bool) -> Self {
        self.policy.upscale = enable;
        self
    }

    /// Allows existing output files to be replaced.
    #[must_use]
    pub fn overwrite(mut self, enable: bool) -> Self {
        self.policy.overwrite = enable;
        self
    }

    /// Builds the policy.
    #[must_use]
    pub fn build(self) -> EncodePolicy {
        self.policy
    }
}
