//! Timeline segments and per-segment generation outcomes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One unit of the video timeline, produced from one visual prompt.
///
/// Segments are ordered by `index`. A segment's video can only be produced
/// after its image exists (video generation is image-conditioned). Failed
/// segments are never deleted, only excluded from the final concatenation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Zero-based position in the timeline.
    pub index: usize,
    /// Visual prompt this segment is generated from.
    pub prompt: String,
    /// Target duration in seconds.
    pub duration_seconds: u32,
    /// Locally stored still image, once generated.
    pub image_path: Option<PathBuf>,
    /// Remote URL of the generated image (used to condition the video).
    pub image_url: Option<String>,
    /// Locally stored video clip, once downloaded.
    pub video_path: Option<PathBuf>,
    /// Whether generation is currently in flight.
    pub in_progress: bool,
    /// Most recent generation error, if any.
    pub last_error: Option<String>,
}

impl Segment {
    /// Create a fresh segment for a prompt.
    pub fn new(index: usize, prompt: impl Into<String>, duration_seconds: u32) -> Self {
        Self {
            index,
            prompt: prompt.into(),
            duration_seconds,
            image_path: None,
            image_url: None,
            video_path: None,
            in_progress: false,
            last_error: None,
        }
    }
}

/// Outcome of attempting to produce one segment's video.
///
/// Exactly one result exists per input prompt after the parallel generation
/// phase settles. Results are produced out of order and must be sorted by
/// `index` before consumption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Original segment index.
    pub index: usize,
    /// Local video path; `None` on failure.
    pub path: Option<PathBuf>,
    /// Whether the full image -> video -> download chain succeeded.
    pub success: bool,
    /// Error message on failure.
    pub error: Option<String>,
    /// Originating prompt, retained for failure reporting.
    pub prompt: String,
}

impl GenerationResult {
    /// Successful outcome for a segment.
    pub fn ok(index: usize, path: PathBuf, prompt: impl Into<String>) -> Self {
        Self {
            index,
            path: Some(path),
            success: true,
            error: None,
            prompt: prompt.into(),
        }
    }

    /// Failed outcome for a segment.
    pub fn failed(index: usize, error: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            index,
            path: None,
            success: false,
            error: Some(error.into()),
            prompt: prompt.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_constructors() {
        let ok = GenerationResult::ok(2, PathBuf::from("/tmp/video_3.mp4"), "a shot");
        assert!(ok.success);
        assert_eq!(ok.index, 2);
        assert!(ok.error.is_none());

        let failed = GenerationResult::failed(0, "job timeout", "a shot");
        assert!(!failed.success);
        assert!(failed.path.is_none());
        assert_eq!(failed.error.as_deref(), Some("job timeout"));
        assert_eq!(failed.prompt, "a shot");
    }

    #[test]
    fn test_segment_starts_empty() {
        let seg = Segment::new(0, "opening shot", 4);
        assert!(seg.image_path.is_none());
        assert!(seg.video_path.is_none());
        assert!(!seg.in_progress);
        assert!(seg.last_error.is_none());
    }
}
