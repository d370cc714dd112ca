//! Provider configuration.
//!
//! Built once in the binary and passed into each client constructor.

/// Credentials, endpoints, and model selection for all providers.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API key for the queue-based generation provider.
    pub queue_api_key: String,
    /// Base URL of the queue provider.
    pub queue_base_url: String,
    /// API key for the text provider.
    pub text_api_key: String,
    /// Base URL of the text provider (OpenAI-compatible).
    pub text_base_url: String,
    /// Text model id.
    pub text_model: String,
    /// Image model id.
    pub image_model: String,
    /// Image-to-video model id.
    pub video_model: String,
    /// Text-to-speech model id.
    pub tts_model: String,
    /// Speech-to-text model id.
    pub stt_model: String,
}

impl ProviderConfig {
    pub const DEFAULT_QUEUE_BASE_URL: &'static str = "https://queue.fal.run";
    pub const DEFAULT_TEXT_BASE_URL: &'static str = "https://openrouter.ai/api/v1";

    /// Build the config from environment variables.
    ///
    /// `FAL_API_KEY` and `OPENROUTER_API_KEY` are required; model ids can be
    /// overridden individually. `free` selects the cheap model set.
    pub fn from_env(free: bool) -> Result<Self, crate::GenError> {
        let queue_api_key = std::env::var("FAL_API_KEY")
            .map_err(|_| crate::GenError::config("FAL_API_KEY not set"))?;
        let text_api_key = std::env::var("OPENROUTER_API_KEY")
            .map_err(|_| crate::GenError::config("OPENROUTER_API_KEY not set"))?;

        let text_model = if free {
            env_or("OPENROUTER_MODEL_FREE", "x-ai/grok-4.1-fast:free")
        } else {
            env_or("OPENROUTER_MODEL", "openai/gpt-4o-mini")
        };
        let image_model = if free {
            env_or("FAL_IMAGE_MODEL_FREE", "fal-ai/flux/schnell")
        } else {
            env_or("FAL_IMAGE_MODEL", "fal-ai/flux/dev")
        };
        let video_model = if free {
            env_or(
                "FAL_VIDEO_MODEL_FREE",
                "fal-ai/bytedance/seedance/v1/lite/image-to-video",
            )
        } else {
            env_or("FAL_VIDEO_MODEL", "fal-ai/veo3.1/fast/image-to-video")
        };

        Ok(Self {
            queue_api_key,
            queue_base_url: env_or("FAL_QUEUE_URL", Self::DEFAULT_QUEUE_BASE_URL),
            text_api_key,
            text_base_url: env_or("OPENROUTER_BASE_URL", Self::DEFAULT_TEXT_BASE_URL),
            text_model,
            image_model,
            video_model,
            tts_model: env_or("FAL_TTS_MODEL", "fal-ai/elevenlabs/tts/eleven-v3"),
            stt_model: env_or("FAL_STT_MODEL", "fal-ai/whisper"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
