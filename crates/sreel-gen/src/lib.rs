//! HTTP clients for the generation providers StoryReel orchestrates.
//!
//! This crate provides:
//! - A queue-based submit/poll/fetch client with an explicit poll state
//!   machine and bounded polling
//! - Text generation (story variants and per-segment visual prompts)
//! - Image generation, image-to-video, and text-to-speech wrappers
//! - Speech-to-text with provider response normalization
//! - One-time reference image upload
//!
//! All credentials come from an explicit [`ProviderConfig`] passed into each
//! client constructor; nothing reads the environment after startup.

pub mod config;
pub mod error;
pub mod image;
pub mod poll;
pub mod queue;
pub mod text;
pub mod transcribe;
pub mod tts;
pub mod upload;
pub mod video;

pub use config::ProviderConfig;
pub use error::{GenError, GenResult};
pub use image::ImageClient;
pub use poll::{JobStatus, PollConfig, PollState};
pub use queue::QueueClient;
pub use text::{StoryVariant, TextClient};
pub use transcribe::{SpeechClient, Transcript, TranscriptSegment};
pub use tts::TtsClient;
pub use upload::resolve_reference_image;
pub use video::VideoClient;
