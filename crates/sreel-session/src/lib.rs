//! Per-run artifact store for StoryReel.
//!
//! Each end-to-end run owns a timestamped session directory with four
//! category subdirectories (`images/`, `videos/`, `audio/`, `result/`).
//! Paths for indexed artifacts are deterministic functions of the segment
//! number, which lets parallel segment workers write without coordination.
//! Nothing is ever deleted; artifacts are retained for inspection.

pub mod manifest;
pub mod session;

pub use manifest::Manifest;
pub use session::{Session, SessionError, SessionResult};
