//! Pipeline error types.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Gen(#[from] sreel_gen::GenError),

    #[error(transparent)]
    Media(#[from] sreel_media::MediaError),

    #[error(transparent)]
    Session(#[from] sreel_session::SessionError),

    #[error("All {0} video segments failed to generate")]
    AllSegmentsFailed(usize),

    #[error("Narration generation failed: {0}")]
    NarrationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
