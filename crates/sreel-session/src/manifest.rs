//! Run manifest persisted at the session root.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of one completed run, written once at the end of a successful
/// workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Session identifier (matches the directory name).
    pub session_id: String,
    /// When the manifest was written.
    pub created_at: DateTime<Utc>,
    /// The user's original description.
    pub description: String,
    /// The narrated story text.
    pub story_text: String,
    /// Visual prompts, one per planned segment.
    pub prompts: Vec<String>,
    /// Number of segment videos actually used in the final cut.
    pub video_count: usize,
    /// Path of the final muxed video.
    pub final_video: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_round_trip() {
        let manifest = Manifest {
            session_id: "session_2026-08-28T10-00-00".to_string(),
            created_at: Utc::now(),
            description: "a day in the mountains".to_string(),
            story_text: "The sun rises...".to_string(),
            prompts: vec!["sunrise over peaks".to_string()],
            video_count: 1,
            final_video: PathBuf::from("/out/result/final_video.mp4"),
        };

        let json = serde_json::to_string(&manifest).unwrap();
        let back: Manifest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.session_id, manifest.session_id);
        assert_eq!(back.prompts, manifest.prompts);
        assert_eq!(back.video_count, 1);
    }
}
