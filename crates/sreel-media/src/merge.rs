//! Video concatenation and audio muxing.
//!
//! Concatenation uses the concat demuxer with stream copy so segment clips
//! are joined without re-encoding. Muxing copies the video stream and
//! re-encodes only the audio, trimming to the shorter of the two inputs.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{info, warn};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::probe::get_duration;

/// Concatenate an ordered list of video files into one, stream-copying.
///
/// Returns the probed duration of the output in seconds. At least one input
/// is required; callers must filter out failed segments first.
pub async fn concat_videos(inputs: &[PathBuf], output: impl AsRef<Path>) -> MediaResult<f64> {
    let output = output.as_ref();

    if inputs.is_empty() {
        return Err(MediaError::NoInputs);
    }
    for input in inputs {
        if !input.exists() {
            return Err(MediaError::FileNotFound(input.clone()));
        }
    }

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).await?;
    }

    info!(count = inputs.len(), output = %output.display(), "Concatenating segment videos");

    let list_path = output.with_extension("concat.txt");
    fs::write(&list_path, concat_list(inputs)).await?;

    let cmd = FfmpegCommand::with_output(output)
        .input_with_args(["-f", "concat", "-safe", "0"], &list_path)
        .codec_copy();

    let result = FfmpegRunner::new()
        .run_with_progress(&cmd, |p| {
            tracing::debug!(out_time_ms = p.out_time_ms, speed = p.speed, "concat progress");
        })
        .await;

    if let Err(e) = fs::remove_file(&list_path).await {
        warn!(list = %list_path.display(), error = %e, "Failed to remove concat list file");
    }
    result?;

    let duration = get_duration(output).await?;
    info!(duration_secs = duration, "Concatenation complete");
    Ok(duration)
}

/// Mux a narration audio track onto a video file.
///
/// The video stream is copied, the audio stream is re-encoded to AAC, and
/// the output is trimmed to the shorter input via `-shortest`.
pub async fn mux_audio(
    video: impl AsRef<Path>,
    audio: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let video = video.as_ref();
    let audio = audio.as_ref();
    let output = output.as_ref();

    for input in [video, audio] {
        if !input.exists() {
            return Err(MediaError::FileNotFound(input.to_path_buf()));
        }
    }

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).await?;
    }

    info!(
        video = %video.display(),
        audio = %audio.display(),
        output = %output.display(),
        "Muxing narration onto video"
    );

    let cmd = FfmpegCommand::new(video, output)
        .input(audio)
        .video_codec("copy")
        .audio_codec("aac")
        .audio_bitrate("192k")
        .shortest();

    FfmpegRunner::new()
        .run_with_progress(&cmd, |p| {
            tracing::debug!(out_time_ms = p.out_time_ms, speed = p.speed, "mux progress");
        })
        .await
}

/// Build the concat-demuxer list file content.
///
/// Paths are absolute where possible and single quotes are escaped per the
/// demuxer's quoting rules.
fn concat_list(inputs: &[PathBuf]) -> String {
    let mut content = String::new();
    for input in inputs {
        let path = input
            .canonicalize()
            .unwrap_or_else(|_| input.clone());
        let escaped = path.to_string_lossy().replace('\'', "'\\''");
        content.push_str(&format!("file '{}'\n", escaped));
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_concat_rejects_empty_input() {
        let err = concat_videos(&[], "/tmp/out.mp4").await.unwrap_err();
        assert!(matches!(err, MediaError::NoInputs));
    }

    #[tokio::test]
    async fn test_concat_rejects_missing_input() {
        let err = concat_videos(&[PathBuf::from("/nonexistent/v.mp4")], "/tmp/out.mp4")
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }

    #[test]
    fn test_concat_list_format() {
        let list = concat_list(&[
            PathBuf::from("/data/video_1.mp4"),
            PathBuf::from("/data/video_2.mp4"),
        ]);
        assert_eq!(list, "file '/data/video_1.mp4'\nfile '/data/video_2.mp4'\n");
    }

    #[test]
    fn test_concat_list_escapes_quotes() {
        let list = concat_list(&[PathBuf::from("/data/it's.mp4")]);
        assert!(list.contains("'\\''"));
    }
}
