// ============================================================================
// videoconverter-core/src/processing/selection.rs
// ============================================================================
//
// TRACK SELECTION: Which Tracks Survive and Which Codec Each Receives
//
// This module decides, per stream kind, the set of track indices that are
// mapped into the output and the codec (or passthrough) for each of them.
//
// KEY COMPONENTS:
// - select_video: Sole video track, filter plan and video codec
// - select_audio / select_subtitle: Language-based selection with fallback
// - StreamSelection: Ascending, de-duplicated mapping plus per-index codecs
//
// LANGUAGE HEURISTIC:
// A track counts as English when ANY of its tag values contains the substring
// "eng" (case-sensitive), so titles such as "English Commentary" qualify as
// well as language codes. When the heuristic would select nothing, or a track has no tag block
// to inspect, every track of that kind is kept.

// ---- Internal crate imports ----
use crate::config::EncodePolicy;
use crate::error::{CoreError, CoreResult};
use crate::media::{Catalog, Track};
use crate::processing::filters::{FilterPlan, plan_filters};

// ---- Standard library imports ----
use std::collections::BTreeMap;

/// Passthrough codec name.
pub const COPY: &str = "copy";
/// Software video encoder.
pub const LIBX264: &str = "libx264";
/// GPU video encoder.
pub const HEVC_NVENC: &str = "hevc_nvenc";
/// Lossless audio target.
pub const FLAC: &str = "flac";
/// AAC encoder used for lossy audio.
pub const AAC_ENCODER: &str = "libfdk_aac";
/// Text subtitle target.
pub const TEXT_SUBTITLE: &str = "ass";

const LANGUAGE_MARKER: &str = "eng";

/// Selected tracks of one kind with the codec for each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamSelection {
    /// Selected stream indices, ascending and without duplicates.
    pub mapping: Vec<u32>,
    pub codec_of: BTreeMap<u32, String>,
}

impl StreamSelection {
    fn from_indices<I, F>(indices: I, catalog_kind: &BTreeMap<u32, Track>, codec: F) -> Self
    where
        I: IntoIterator<Item = u32>,
        F: Fn(&Track) -> &'static str,
    {
        let mut mapping: Vec<u32> = indices.into_iter().collect();
        mapping.sort_unstable();
        mapping.dedup();

        let codec_of = mapping
            .iter()
            .filter_map(|index| {
                catalog_kind
                    .get(index)
                    .map(|track| (*index, codec(track).to_string()))
            })
            .collect();

        Self { mapping, codec_of }
    }

    /// Codec chosen for `index`, if it was selected.
    #[must_use]
    pub fn codec(&self, index: u32) -> Option<&str> {
        self.codec_of.get(&index).map(String::as_str)
    }

    /// Whether any selected track uses `codec`.
    #[must_use]
    pub fn uses_codec(&self, codec: &str) -> bool {
        self.codec_of.values().any(|c| c == codec)
    }
}

/// The video track of a file, its filter plan and its codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSelection {
    pub index: u32,
    /// Codec name reported by the prober, used for decoder selection.
    pub source_codec: String,
    pub codec: String,
    pub filters: FilterPlan,
}

impl VideoSelection {
    /// The singleton video mapping.
    #[must_use]
    pub fn mapping(&self) -> Vec<u32> {
        vec![self.index]
    }

    #[must_use]
    pub fn is_copy(&self) -> bool {
        self.codec == COPY
    }
}

/// Selects the video track and decides its codec.
///
/// Streams that ffprobe reports as H.264 or HEVC are copied unless something
/// forces a re-encode. Force-reencode and deinterlacing select `libx264`
/// even in GPU mode; other re-encodes (crop, upscale, other source codecs)
/// use `hevc_nvenc` in GPU mode and `libx264` otherwise.
///
/// # Errors
///
/// * `CoreError::MultipleVideoStreams` - More than one genuine video track
/// * `CoreError::NoVideoStream` - No video track at all
pub fn select_video(catalog: &Catalog, policy: &EncodePolicy) -> CoreResult<VideoSelection> {
    let track = match catalog.video.len() {
        0 => return Err(CoreError::NoVideoStream),
        1 => catalog
            .video
            .values()
            .next()
            .ok_or(CoreError::NoVideoStream)?,
        count => return Err(CoreError::MultipleVideoStreams(count)),
    };

    let filters = plan_filters(track, policy);
    let copyable = ["h264", "hevc"]
        .iter()
        .any(|family| track.codec_name.contains(family));

    let codec = if policy.force_reencode || filters.deinterlace {
        LIBX264
    } else if copyable && !filters.is_active() {
        COPY
    } else if policy.gpu {
        HEVC_NVENC
    } else {
        LIBX264
    };

    log::debug!(
        "Video stream {} ({}) -> {}",
        track.index,
        track.codec_name,
        codec
    );

    Ok(VideoSelection {
        index: track.index,
        source_codec: track.codec_name.clone(),
        codec: codec.to_string(),
        filters,
    })
}

/// Selects audio tracks and their codecs.
#[must_use]
pub fn select_audio(catalog: &Catalog, keep_all: bool) -> StreamSelection {
    let indices = select_by_language(&catalog.audio, keep_all, "audio");
    StreamSelection::from_indices(indices, &catalog.audio, audio_codec)
}

/// Selects subtitle tracks and their codecs.
#[must_use]
pub fn select_subtitle(catalog: &Catalog, keep_all: bool) -> StreamSelection {
    let indices = select_by_language(&catalog.subtitle, keep_all, "subtitle");
    StreamSelection::from_indices(indices, &catalog.subtitle, subtitle_codec)
}

/// Codec for one audio track. The lossless check runs before the copy check,
/// so a lossless stream is never passed through.
#[must_use]
pub fn audio_codec(track: &Track) -> &'static str {
    let codec = track.codec_name.to_lowercase();
    let profile = track.profile.as_deref().unwrap_or_default().to_lowercase();
    let dts_hd_ma = profile.contains("dts") && profile.contains("ma");

    if codec.contains("truehd") || dts_hd_ma || codec.starts_with("pcm_") {
        FLAC
    } else if track.codec_name.contains("aac") || track.codec_name.contains("flac") {
        COPY
    } else {
        AAC_ENCODER
    }
}

/// Codec for one subtitle track: image formats are copied, text is
/// converted to ASS.
#[must_use]
pub fn subtitle_codec(track: &Track) -> &'static str {
    if track.codec_name.contains("pgs") || track.codec_name.contains("dvd") {
        COPY
    } else {
        TEXT_SUBTITLE
    }
}

fn select_by_language(tracks: &BTreeMap<u32, Track>, keep_all: bool, kind: &str) -> Vec<u32> {
    let all = || tracks.keys().copied().collect::<Vec<_>>();

    if keep_all || tracks.len() <= 1 {
        return all();
    }

    let mut english = Vec::new();
    for (index, track) in tracks {
        match track.any_tag_contains(LANGUAGE_MARKER) {
            Some(true) => english.push(*index),
            Some(false) => {}
            None => {
                log::debug!("{kind} stream {index} has no tags; keeping all {kind} streams");
                return all();
            }
        }
    }

    if english.is_empty() {
        log::debug!("No English {kind} streams found; keeping all");
        return all();
    }
    english
}
