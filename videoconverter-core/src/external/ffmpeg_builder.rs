//! FFmpeg command builder
//!
//! This module assembles the complete ffmpeg argument list for one file from
//! the track selections, the filter plan and the encode policy. Arguments are
//! appended in named groups in a fixed order:
//!
//! 1. program, banner suppression, overwrite, decode acceleration, threads,
//!    input, muxing queue size
//! 2. video codec with its CRF and encoder bundle
//! 3. tune
//! 4. video filter chain
//! 5. per-track audio and subtitle codecs, then stream maps
//! 6. output path
//!
//! Building performs no I/O, so identical inputs always give identical
//! argument lists.

use crate::config::{EncodePolicy, MAX_MUXING_QUEUE_SIZE};
use crate::hardware_decode::hardware_decode_args;
use crate::processing::filters::FilterPlan;
use crate::processing::selection::{AAC_ENCODER, HEVC_NVENC, LIBX264, StreamSelection, VideoSelection};
use std::path::Path;

/// Program name of the transcoder.
pub const FFMPEG: &str = "ffmpeg";

const LIBX264_BUNDLE: [&str; 6] = ["-profile:v", "high", "-rc-lookahead", "250", "-preset", "slow"];
const LIBFDK_AAC_BUNDLE: [&str; 4] = ["-cutoff", "18000", "-vbr", "5"];

/// Builder for an ffmpeg argument list.
#[derive(Debug, Clone)]
pub struct FfmpegCommandBuilder {
    args: Vec<String>,
}

impl Default for FfmpegCommandBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegCommandBuilder {
    /// Starts a command with the program name and `-hide_banner`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            args: vec![FFMPEG.to_string(), "-hide_banner".to_string()],
        }
    }

    fn push<S: Into<String>>(&mut self, arg: S) {
        self.args.push(arg.into());
    }

    fn extend<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
    }

    /// Lets ffmpeg replace an existing output file.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        if overwrite {
            self.push("-y");
        }
        self
    }

    /// Adds decode-acceleration flags. Must come before the input.
    #[must_use]
    pub fn with_decode_args(mut self, args: Vec<String>) -> Self {
        self.extend(args);
        self
    }

    /// Adds threads, the input file and the muxing queue size.
    #[must_use]
    pub fn with_input(mut self, input: &Path) -> Self {
        self.extend(["-threads", "0", "-i"]);
        self.push(input.to_string_lossy());
        self.push("-max_muxing_queue_size");
        self.push(MAX_MUXING_QUEUE_SIZE.to_string());
        self
    }

    /// Adds the video codec and the options that belong to that encoder.
    ///
    /// `libx264` gets a CRF, its option bundle and the tune; `hevc_nvenc`
    /// runs in constant-QP mode with the CRF value as QP; `copy` gets nothing.
    #[must_use]
    pub fn with_video_codec(mut self, codec: &str, policy: &EncodePolicy) -> Self {
        let crf = policy.effective_crf().to_string();
        self.extend(["-c:v", codec]);
        match codec {
            LIBX264 => {
                self.push("-crf");
                self.push(crf);
                self.extend(LIBX264_BUNDLE);
                if let Some(tune) = &policy.tune {
                    self.push("-tune");
                    self.push(tune.as_str());
                }
            }
            HEVC_NVENC => {
                self.extend(["-rc", "constqp", "-qp"]);
                self.push(crf);
                self.extend([
                    "-preset",
                    "slow",
                    "-profile:v",
                    "main",
                    "-b:v",
                    "0",
                    "-rc-lookahead",
                    "32",
                ]);
            }
            _ => {}
        }
        self
    }

    /// Adds the `-filter:v` chain, if it has any filters.
    #[must_use]
    pub fn with_filters(mut self, chain: VideoFilterChain) -> Self {
        if let Some(filters) = chain.build() {
            self.push("-filter:v");
            self.push(filters);
        }
        self
    }

    /// Adds `-c:a:N` and `-c:s:N` for each selected track, numbered by output
    /// position. The libfdk_aac bundle follows the audio codecs when that
    /// encoder is in use.
    #[must_use]
    pub fn with_stream_codecs(mut self, audio: &StreamSelection, subtitle: &StreamSelection) -> Self {
        for (position, index) in audio.mapping.iter().enumerate() {
            if let Some(codec) = audio.codec(*index) {
                self.push(format!("-c:a:{position}"));
                self.push(codec);
            }
        }
        if audio.uses_codec(AAC_ENCODER) {
            self.extend(LIBFDK_AAC_BUNDLE);
        }
        for (position, index) in subtitle.mapping.iter().enumerate() {
            if let Some(codec) = subtitle.codec(*index) {
                self.push(format!("-c:s:{position}"));
                self.push(codec);
            }
        }
        self
    }

    /// Adds `-map 0:I` for video, then audio, then subtitle tracks.
    #[must_use]
    pub fn with_maps(mut self, mappings: &[&[u32]]) -> Self {
        for index in mappings.iter().flat_map(|mapping| mapping.iter()) {
            self.push("-map");
            self.push(format!("0:{index}"));
        }
        self
    }

    /// Finishes the command with the output path.
    #[must_use]
    pub fn build(mut self, output: &Path) -> Vec<String> {
        self.push(output.to_string_lossy());
        self.args
    }
}

/// Builder for constructing video filter chains
#[derive(Debug, Default)]
pub struct VideoFilterChain {
    filters: Vec<String>,
}

impl VideoFilterChain {
    /// Creates a new empty filter chain
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a chain holding the filters of a plan, in plan order
    #[must_use]
    pub fn from_plan(plan: &FilterPlan) -> Self {
        plan.filters()
            .into_iter()
            .fold(Self::new(), VideoFilterChain::add_filter)
    }

    /// Adds a filter to the chain, ignoring empty ones
    #[must_use]
    pub fn add_filter(mut self, filter: String) -> Self {
        if !filter.is_empty() {
            self.filters.push(filter);
        }
        self
    }

    /// Builds the filter chain into a single filter string
    #[must_use]
    pub fn build(self) -> Option<String> {
        if self.filters.is_empty() {
            None
        } else {
            Some(self.filters.join(","))
        }
    }
}

/// Builds the full transcode command for one file.
#[must_use]
pub fn build_transcode_command(
    input: &Path,
    output: &Path,
    video: &VideoSelection,
    audio: &StreamSelection,
    subtitle: &StreamSelection,
    policy: &EncodePolicy,
) -> Vec<String> {
    let video_mapping = video.mapping();
    FfmpegCommandBuilder::new()
        .with_overwrite(policy.overwrite)
        .with_decode_args(hardware_decode_args(video, policy))
        .with_input(input)
        .with_video_codec(&video.codec, policy)
        .with_filters(VideoFilterChain::from_plan(&video.filters))
        .with_stream_codecs(audio, subtitle)
        .with_maps(&[
            video_mapping.as_slice(),
            audio.mapping.as_slice(),
            subtitle.mapping.as_slice(),
        ])
        .build(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EncodePolicyBuilder;
    use crate::processing::selection::{COPY, FLAC, TEXT_SUBTITLE};
    use std::collections::BTreeMap;

    fn selection(pairs: &[(u32, &str)]) -> StreamSelection {
        StreamSelection {
            mapping: pairs.iter().map(|(index, _)| *index).collect(),
            codec_of: pairs
                .iter()
                .map(|(index, codec)| (*index, codec.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn video(codec: &str, filters: FilterPlan) -> VideoSelection {
        VideoSelection {
            index: 0,
            source_codec: "mpeg2video".to_string(),
            codec: codec.to_string(),
            filters,
        }
    }

    fn joined(args: &[String]) -> String {
        args.join(" ")
    }

    #[test]
    fn test_copy_command() {
        let args = build_transcode_command(
            Path::new("in.mp4"),
            Path::new("newfiles/in.mkv"),
            &video(COPY, FilterPlan::default()),
            &selection(&[(1, COPY)]),
            &StreamSelection::default(),
            &EncodePolicy::default(),
        );
        assert_eq!(
            joined(&args),
            "ffmpeg -hide_banner -threads 0 -i in.mp4 -max_muxing_queue_size 16384 \
             -c:v copy -c:a:0 copy -map 0:0 -map 0:1 newfiles/in.mkv"
        );
    }

    #[test]
    fn test_libx264_command_with_filters() {
        let plan = FilterPlan {
            deinterlace: true,
            crop_expr: Some("crop=704:352:8:64".to_string()),
            upscale_target: None,
        };
        let policy = EncodePolicyBuilder::new().crf(18).tune("film").build();
        let args = build_transcode_command(
            Path::new("a.mkv"),
            Path::new("out/a.mkv"),
            &video(LIBX264, plan),
            &selection(&[(1, FLAC), (3, AAC_ENCODER)]),
            &selection(&[(4, COPY), (5, TEXT_SUBTITLE)]),
            &policy,
        );
        assert_eq!(
            joined(&args),
            "ffmpeg -hide_banner -hwaccel auto -threads 0 -i a.mkv -max_muxing_queue_size 16384 \
             -c:v libx264 -crf 18 -profile:v high -rc-lookahead 250 -preset slow -tune film \
             -filter:v crop=704:352:8:64,yadif \
             -c:a:0 flac -c:a:1 libfdk_aac -cutoff 18000 -vbr 5 -c:s:0 copy -c:s:1 ass \
             -map 0:0 -map 0:1 -map 0:3 -map 0:4 -map 0:5 out/a.mkv"
        );
    }

    #[test]
    fn test_nvenc_command() {
        let policy = EncodePolicyBuilder::new().gpu(true).overwrite(true).build();
        let args = build_transcode_command(
            Path::new("b.mkv"),
            Path::new("out/b.mkv"),
            &video(HEVC_NVENC, FilterPlan::default()),
            &StreamSelection::default(),
            &StreamSelection::default(),
            &policy,
        );
        assert_eq!(
            joined(&args),
            "ffmpeg -hide_banner -y -c:v mpeg2_cuvid -threads 0 -i b.mkv -max_muxing_queue_size 16384 \
             -c:v hevc_nvenc -rc constqp -qp 20 -preset slow -profile:v main -b:v 0 -rc-lookahead 32 \
             -map 0:0 out/b.mkv"
        );
        assert!(!args.contains(&"-crf".to_string()));
    }

    #[test]
    fn test_build_is_deterministic() {
        let build = || {
            build_transcode_command(
                Path::new("c.avi"),
                Path::new("out/c.mkv"),
                &video(LIBX264, FilterPlan::default()),
                &selection(&[(2, AAC_ENCODER)]),
                &selection(&[(3, TEXT_SUBTITLE)]),
                &EncodePolicy::default(),
            )
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_filter_chain() {
        assert_eq!(VideoFilterChain::new().build(), None);
        let chain = VideoFilterChain::new()
            .add_filter(String::new())
            .add_filter("yadif".to_string());
        assert_eq!(chain.build(), Some("yadif".to_string()));
    }
}
