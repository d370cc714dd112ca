//! Session directory layout and path allocation.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use crate::manifest::Manifest;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Artifact namespace for one end-to-end run.
///
/// All four category directories exist by the time `create` returns, so
/// concurrent producers can write to their allocated paths immediately.
/// Path allocation is a pure function of the segment number; no two
/// segments share an index, so no locking is needed.
#[derive(Debug, Clone)]
pub struct Session {
    session_id: String,
    root: PathBuf,
    images: PathBuf,
    videos: PathBuf,
    audio: PathBuf,
    result: PathBuf,
}

impl Session {
    /// Create a new session under `base_dir`.
    ///
    /// The identifier is derived from the current time at second
    /// granularity; sequential runs in the same base directory get distinct
    /// directories. Directory creation is idempotent.
    pub fn create(base_dir: impl AsRef<Path>) -> SessionResult<Self> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S");
        Self::create_with_id(base_dir, format!("session_{timestamp}"))
    }

    /// Create a session with an explicit identifier (used by tests).
    pub fn create_with_id(
        base_dir: impl AsRef<Path>,
        session_id: impl Into<String>,
    ) -> SessionResult<Self> {
        let session_id = session_id.into();
        let root = base_dir.as_ref().join(&session_id);

        let session = Self {
            images: root.join("images"),
            videos: root.join("videos"),
            audio: root.join("audio"),
            result: root.join("result"),
            session_id,
            root,
        };

        for dir in [
            &session.root,
            &session.images,
            &session.videos,
            &session.audio,
            &session.result,
        ] {
            fs::create_dir_all(dir)?;
        }

        info!(session_id = %session.session_id, root = %session.root.display(), "Session created");
        Ok(session)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deterministic image path for a 1-based segment number.
    pub fn image_path(&self, n: usize) -> PathBuf {
        self.images.join(format!("image_{n}.png"))
    }

    /// Deterministic video path for a 1-based segment number.
    pub fn video_path(&self, n: usize) -> PathBuf {
        self.videos.join(format!("video_{n}.mp4"))
    }

    /// Narration audio track path.
    pub fn audio_path(&self) -> PathBuf {
        self.audio.join("narration.mp3")
    }

    /// Concatenated (pre-narration) video path.
    pub fn merged_video_path(&self) -> PathBuf {
        self.result.join("merged_video.mp4")
    }

    /// Final muxed video path.
    pub fn final_video_path(&self) -> PathBuf {
        self.result.join("final_video.mp4")
    }

    /// Manifest location at the session root.
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join("manifest.json")
    }

    /// Persist the run manifest, overwriting any prior one.
    pub fn save_manifest(&self, manifest: &Manifest) -> SessionResult<()> {
        let json = serde_json::to_string_pretty(manifest)?;
        fs::write(self.manifest_path(), json)?;
        info!(path = %self.manifest_path().display(), "Manifest saved");
        Ok(())
    }
}
