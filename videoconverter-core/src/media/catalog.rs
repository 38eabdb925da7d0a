// ============================================================================
// videoconverter-core/src/media/catalog.rs
// ============================================================================
//
// STREAM CATALOG: Typed Track Tables from ffprobe Output
//
// Parses the `streams` array of an ffprobe JSON document into per-kind track
// tables keyed by stream index. Data and attachment streams are dropped, and
// video entries that are really embedded images (cover art) are filtered out
// once the tables are built.
//
// KEY COMPONENTS:
// - Track: One audio, video or subtitle stream
// - Catalog: Per-kind index -> Track tables for one input file
// - build_catalog: Parser with MalformedProbe reporting

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- External crate imports ----
use serde_json::Value;

// ---- Standard library imports ----
use std::collections::{BTreeMap, BTreeSet};

/// Codec name markers of still-image formats that ffprobe reports as video.
const IMAGE_CODEC_MARKERS: [&str; 2] = ["mjpeg", "png"];

/// Kind of elementary stream a track carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Video,
    Audio,
    Subtitle,
}

impl TrackKind {
    /// Maps an ffprobe `codec_type` onto a kind. `None` means the stream is
    /// not something we transcode (data, attachment, ...).
    fn from_codec_type(codec_type: &str) -> Option<Self> {
        match codec_type {
            "video" => Some(TrackKind::Video),
            "audio" => Some(TrackKind::Audio),
            "subtitle" => Some(TrackKind::Subtitle),
            _ => None,
        }
    }
}

/// One stream of an input file, as reported by ffprobe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub index: u32,
    pub kind: TrackKind,
    pub codec_name: String,
    pub profile: Option<String>,
    /// Raw tag block. `None` when ffprobe reported no `tags` object at all,
    /// which selection treats differently from an empty block.
    pub tags: Option<BTreeMap<String, String>>,
    pub field_order: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Track {
    /// Whether any tag value contains `needle` (case-sensitive substring).
    ///
    /// Returns `None` if the track has no tag block to inspect.
    #[must_use]
    pub fn any_tag_contains(&self, needle: &str) -> Option<bool> {
        self.tags
            .as_ref()
            .map(|tags| tags.values().any(|value| value.contains(needle)))
    }

    fn is_image(&self) -> bool {
        IMAGE_CODEC_MARKERS
            .iter()
            .any(|marker| self.codec_name.contains(marker))
    }
}

/// Per-kind track tables for one input file.
///
/// Tables are ordered by stream index, so iteration never depends on the
/// order ffprobe listed the streams in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub video: BTreeMap<u32, Track>,
    pub audio: BTreeMap<u32, Track>,
    pub subtitle: BTreeMap<u32, Track>,
}

/// Builds a catalog from a parsed ffprobe document.
///
/// # Errors
///
/// * `CoreError::MalformedProbe` - If the document has no `streams` array, a
///   stream lacks `index` or `codec_type`, or two streams share an index
pub fn build_catalog(probe: &Value) -> CoreResult<Catalog> {
    let streams = probe
        .get("streams")
        .and_then(Value::as_array)
        .ok_or_else(|| CoreError::MalformedProbe("no streams array".to_string()))?;

    let mut raw = Catalog::default();
    let mut seen = BTreeSet::new();

    for (position, stream) in streams.iter().enumerate() {
        let index = stream
            .get("index")
            .and_then(Value::as_u64)
            .and_then(|index| u32::try_from(index).ok())
            .ok_or_else(|| {
                CoreError::MalformedProbe(format!("stream #{position} has no valid index"))
            })?;
        let codec_type = stream
            .get("codec_type")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                CoreError::MalformedProbe(format!("stream {index} has no codec_type"))
            })?;

        if !seen.insert(index) {
            return Err(CoreError::MalformedProbe(format!(
                "stream index {index} appears more than once"
            )));
        }

        let Some(kind) = TrackKind::from_codec_type(codec_type) else {
            log::debug!("Ignoring {codec_type} stream {index}");
            continue;
        };

        let track = parse_track(index, kind, stream);
        match kind {
            TrackKind::Video => raw.video.insert(index, track),
            TrackKind::Audio => raw.audio.insert(index, track),
            TrackKind::Subtitle => raw.subtitle.insert(index, track),
        };
    }

    // Cover art and thumbnails are not candidates for the video track
    let video = raw
        .video
        .into_iter()
        .filter(|(index, track)| {
            let image = track.is_image();
            if image {
                log::debug!(
                    "Excluding stream {index} ({}) as embedded image",
                    track.codec_name
                );
            }
            !image
        })
        .collect();

    Ok(Catalog {
        video,
        audio: raw.audio,
        subtitle: raw.subtitle,
    })
}

fn parse_track(index: u32, kind: TrackKind, stream: &Value) -> Track {
    let text = |key: &str| stream.get(key).and_then(Value::as_str).map(str::to_string);
    let dimension = |key: &str| {
        stream
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|value| u32::try_from(value).ok())
    };

    // Tag values are usually strings, but some muxers write numbers
    let tags = stream.get("tags").and_then(Value::as_object).map(|object| {
        object
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), value)
            })
            .collect()
    });

    Track {
        index,
        kind,
        codec_name: text("codec_name").unwrap_or_default(),
        profile: text("profile"),
        tags,
        field_order: text("field_order"),
        width: dimension("width"),
        height: dimension("height"),
    }
}
