//! Hardware decoding configuration.
//!
//! This module decides which decode-acceleration flags precede the input
//! file on the ffmpeg command line. It is ONLY about decoding: the encoder
//! is chosen by track selection.
//!
//! Decoding acceleration only matters when the video is re-encoded, so a
//! stream copy never gets these flags. In GPU mode a CUVID decoder matching
//! the source codec is requested; for unknown codecs, and outside GPU mode,
//! ffmpeg is asked to pick a method itself with `-hwaccel auto`.

use crate::config::EncodePolicy;
use crate::processing::selection::VideoSelection;

/// CUVID decoder for an ffprobe codec name, if NVDEC supports it.
#[must_use]
pub fn cuvid_decoder(codec_name: &str) -> Option<&'static str> {
    match codec_name {
        "h264" => Some("h264_cuvid"),
        "hevc" => Some("hevc_cuvid"),
        "mjpeg" => Some("mjpeg_cuvid"),
        "mpeg1video" => Some("mpeg1_cuvid"),
        "mpeg2video" => Some("mpeg2_cuvid"),
        "mpeg4" => Some("mpeg4_cuvid"),
        "vc1" => Some("vc1_cuvid"),
        "vp8" => Some("vp8_cuvid"),
        "vp9" => Some("vp9_cuvid"),
        _ => None,
    }
}

/// Gets the ffmpeg decode arguments to place before `-i`.
///
/// # Returns
///
/// * `Vec<String>` - Empty when hwaccel is disabled or the video is copied
#[must_use]
pub fn hardware_decode_args(video: &VideoSelection, policy: &EncodePolicy) -> Vec<String> {
    if policy.no_hwaccel || video.is_copy() {
        return Vec::new();
    }

    if policy.gpu {
        if let Some(decoder) = cuvid_decoder(&video.source_codec) {
            return vec!["-c:v".to_string(), decoder.to_string()];
        }
        log::warn!(
            "No CUVID decoder for {}; using generic hardware decoding",
            video.source_codec
        );
    }

    vec!["-hwaccel".to_string(), "auto".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EncodePolicyBuilder;
    use crate::processing::filters::FilterPlan;
    use crate::processing::selection::{COPY, HEVC_NVENC, LIBX264};

    fn video(source: &str, codec: &str) -> VideoSelection {
        VideoSelection {
            index: 0,
            source_codec: source.to_string(),
            codec: codec.to_string(),
            filters: FilterPlan::default(),
        }
    }

    #[test]
    fn test_copy_needs_no_decoder() {
        let policy = EncodePolicy::default();
        assert!(hardware_decode_args(&video("h264", COPY), &policy).is_empty());
    }

    #[test]
    fn test_generic_hwaccel_on_cpu() {
        let policy = EncodePolicy::default();
        assert_eq!(
            hardware_decode_args(&video("mpeg2video", LIBX264), &policy),
            vec!["-hwaccel", "auto"]
        );

        let disabled = EncodePolicyBuilder::new().no_hwaccel(true).build();
        assert!(hardware_decode_args(&video("mpeg2video", LIBX264), &disabled).is_empty());
    }

    #[test]
    fn test_cuvid_in_gpu_mode() {
        let policy = EncodePolicyBuilder::new().gpu(true).build();
        assert_eq!(
            hardware_decode_args(&video("vc1", HEVC_NVENC), &policy),
            vec!["-c:v", "vc1_cuvid"]
        );
        assert_eq!(
            hardware_decode_args(&video("wmv3", HEVC_NVENC), &policy),
            vec!["-hwaccel", "auto"]
        );
    }

    #[test]
    fn test_decoder_table() {
        assert_eq!(cuvid_decoder("mpeg2video"), Some("mpeg2_cuvid"));
        assert_eq!(cuvid_decoder("mpeg1video"), Some("mpeg1_cuvid"));
        assert_eq!(cuvid_decoder("av1"), None);
    }
}
