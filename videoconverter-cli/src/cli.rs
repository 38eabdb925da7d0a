// videoconverter-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use videoconverter_core::EncodePolicy;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    disable_version_flag = true, // -V is --log-file (spec X3)
    about = "videoconverter: batch converts ripped video files to Matroska",
    long_about = "Probes every media file in a directory, keeps the wanted video, audio and \
                  subtitle tracks, and remuxes or transcodes them with ffmpeg. TV mode names \
                  the results 'Title - sSSeEE.mkv' and remembers where numbering stopped."
)]
pub struct Cli {
    /// Directory holding the files to convert
    #[arg(value_name = "DIRECTORY", default_value = ".")]
    pub directory: PathBuf,

    // --- Track selection ---
    /// Keep every audio and subtitle track instead of only English ones
    #[arg(short = 'a', long = "all-streams")]
    pub all_streams: bool,

    // --- Video ---
    /// Constant rate factor for libx264 (constant QP in GPU mode)
    #[arg(
        long,
        value_name = "CRF",
        env = "VIDEOCONVERTER_CRF",
        value_parser = clap::value_parser!(u8).range(0..=51)
    )]
    pub crf: Option<u8>,

    /// Crop filter expression passed to ffmpeg (e.g. crop=1920:800:0:140)
    #[arg(short = 'c', long, value_name = "FILTER")]
    pub crop: Option<String>,

    /// Deinterlace even when the source reports progressive frames
    #[arg(short = 'd', long, conflicts_with = "no_deinterlace")]
    pub deinterlace: bool,

    /// Never deinterlace
    #[arg(short = 'D', long)]
    pub no_deinterlace: bool,

    /// Re-encode the video even when it could be copied
    #[arg(long)]
    pub force_reencode: bool,

    /// Encode with NVENC (hevc_nvenc) and decode with CUVID
    #[arg(short = 'g', long, conflicts_with = "no_hwaccel")]
    pub gpu: bool,

    /// Disable hardware-accelerated decoding
    #[arg(long)]
    pub no_hwaccel: bool,

    /// libx264 tune preset
    #[arg(short = 't', long, value_enum, conflicts_with = "gpu")]
    pub tune: Option<Tune>,

    /// Upscale video below 1080 lines to 1080p
    #[arg(long)]
    pub upscale: bool,

    // --- Run mode ---
    /// Log the ffmpeg commands without running them
    #[arg(short = 's', long)]
    pub simulate: bool,

    /// Replace existing output files
    #[arg(long)]
    pub overwrite: bool,

    /// Enter TV show mode without asking
    #[arg(long)]
    pub tv: bool,

    /// Where the episode numbering state is kept
    #[arg(long, value_name = "PATH", env = "VIDEOCONVERTER_STATE_FILE")]
    pub state_file: Option<PathBuf>,

    // --- Output ---
    /// More output (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only print warnings and errors
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Also append a debug log to videoconverter.log in DIRECTORY
    #[arg(short = 'V', long = "log-file")]
    pub log_file: bool,
}

/// libx264 `-tune` values.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tune {
    Film,
    Animation,
    Grain,
    #[value(name = "stillimage")]
    StillImage,
    Psnr,
    Ssim,
    #[value(name = "fastdecode")]
    FastDecode,
    #[value(name = "zerolatency")]
    ZeroLatency,
}

impl Tune {
    /// Name passed to ffmpeg.
    pub fn as_str(self) -> &'static str {
        match self {
            Tune::Film => "film",
            Tune::Animation => "animation",
            Tune::Grain => "grain",
            Tune::StillImage => "stillimage",
            Tune::Psnr => "psnr",
            Tune::Ssim => "ssim",
            Tune::FastDecode => "fastdecode",
            Tune::ZeroLatency => "zerolatency",
        }
    }
}

impl Cli {
    /// Encode policy for the whole batch.
    pub fn encode_policy(&self) -> EncodePolicy {
        EncodePolicy {
            keep_all_streams: self.all_streams,
            crf: self.crf,
            crop: self.crop.clone(),
            force_deinterlace: self.deinterlace,
            no_deinterlace: self.no_deinterlace,
            force_reencode: self.force_reencode,
            gpu: self.gpu,
            no_hwaccel: self.no_hwaccel,
            simulate: self.simulate,
            tune: self.tune.map(|tune| tune.as_str().to_string()),
            upscale: self.upscale,
            overwrite: self.overwrite,
        }
    }

    /// Console log level from `-v`/`-q`.
    pub fn console_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Warn;
        }
        match self.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
