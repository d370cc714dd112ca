//! Text-to-speech through the queue API.

use serde_json::{json, Value};
use tracing::info;

use crate::error::{GenError, GenResult};
use crate::poll::PollConfig;
use crate::queue::QueueClient;

/// Wraps the queue client for a text-to-speech model.
#[derive(Clone)]
pub struct TtsClient {
    queue: QueueClient,
    model: String,
    poll: PollConfig,
}

impl TtsClient {
    pub fn new(queue: QueueClient, model: impl Into<String>) -> Self {
        Self {
            queue,
            model: model.into(),
            poll: PollConfig::default(),
        }
    }

    /// Synthesize narration audio and return its hosted URL.
    pub async fn synthesize(&self, text: &str, voice_id: &str) -> GenResult<String> {
        let payload = json!({
            "text": text,
            "voice": voice_id,
            "model_id": "eleven_multilingual_v2",
            "voice_settings": {
                "stability": 0.5,
                "similarity_boost": 0.75,
                "style": 0.5,
                "use_speaker_boost": true,
            },
        });

        info!(model = %self.model, chars = text.len(), "synthesizing narration");
        let result = self.queue.run(&self.model, &payload, &self.poll).await?;
        extract_audio_url(&result)
    }
}

fn extract_audio_url(result: &Value) -> GenResult<String> {
    result["audio"]["url"]
        .as_str()
        .or_else(|| result["audio_url"].as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| GenError::missing_output("speech result contained no audio URL"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_nested_audio_url() {
        let result = json!({"audio": {"url": "https://cdn.example/a.mp3"}});
        assert_eq!(
            extract_audio_url(&result).unwrap(),
            "https://cdn.example/a.mp3"
        );
    }

    #[test]
    fn extracts_flat_audio_url() {
        let result = json!({"audio_url": "https://cdn.example/b.mp3"});
        assert_eq!(
            extract_audio_url(&result).unwrap(),
            "https://cdn.example/b.mp3"
        );
    }

    #[test]
    fn missing_audio_is_an_error() {
        assert!(extract_audio_url(&json!({})).is_err());
    }
}
