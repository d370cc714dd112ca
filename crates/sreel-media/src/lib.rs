//! FFmpeg CLI wrapper for StoryReel post-processing.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building (multiple inputs supported)
//! - Progress parsing from `-progress pipe:2`
//! - Stream-copy concatenation and audio muxing
//! - FFprobe metadata queries
//! - HTTP download of generated artifacts

pub mod command;
pub mod download;
pub mod error;
pub mod merge;
pub mod probe;
pub mod progress;

pub use command::{
    check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner, DEFAULT_FFMPEG_TIMEOUT_SECS,
};
pub use download::download_file;
pub use error::{MediaError, MediaResult};
pub use merge::{concat_videos, mux_audio};
pub use probe::{get_duration, probe_video, VideoInfo};
pub use progress::FfmpegProgress;
