//! Speech-to-text with provider response normalization.
//!
//! Transcription providers disagree on shape: some return flat `words`
//! arrays, others `chunks` with timestamp pairs. Both are decoded into one
//! canonical [`Transcript`].

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{GenError, GenResult};
use crate::poll::PollConfig;
use crate::queue::QueueClient;

/// A timed span of transcribed speech.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

/// Canonical transcription result.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub text: String,
    pub segments: Vec<TranscriptSegment>,
}

/// Raw provider response, one variant per known shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTranscript {
    Words {
        text: String,
        words: Vec<RawWord>,
    },
    Chunks {
        text: String,
        chunks: Vec<RawChunk>,
    },
    TextOnly {
        text: String,
    },
}

#[derive(Debug, Deserialize)]
struct RawWord {
    #[serde(alias = "word")]
    text: String,
    start: f64,
    end: f64,
}

#[derive(Debug, Deserialize)]
struct RawChunk {
    text: String,
    timestamp: (f64, f64),
}

impl From<RawTranscript> for Transcript {
    fn from(raw: RawTranscript) -> Self {
        match raw {
            RawTranscript::Words { text, words } => Transcript {
                text,
                segments: words
                    .into_iter()
                    .map(|w| TranscriptSegment {
                        text: w.text,
                        start: w.start,
                        end: w.end,
                    })
                    .collect(),
            },
            RawTranscript::Chunks { text, chunks } => Transcript {
                text,
                segments: chunks
                    .into_iter()
                    .map(|c| TranscriptSegment {
                        text: c.text,
                        start: c.timestamp.0,
                        end: c.timestamp.1,
                    })
                    .collect(),
            },
            RawTranscript::TextOnly { text } => Transcript {
                text,
                segments: Vec::new(),
            },
        }
    }
}

/// Wraps the queue client for a speech-to-text model.
#[derive(Clone)]
pub struct SpeechClient {
    queue: QueueClient,
    model: String,
    poll: PollConfig,
}

impl SpeechClient {
    pub fn new(queue: QueueClient, model: impl Into<String>) -> Self {
        Self {
            queue,
            model: model.into(),
            poll: PollConfig::default(),
        }
    }

    /// Transcribe hosted audio into a canonical transcript.
    pub async fn transcribe(&self, audio_url: &str) -> GenResult<Transcript> {
        let payload = json!({
            "audio_url": audio_url,
            "task": "transcribe",
        });

        info!(model = %self.model, "transcribing narration");
        let result = self.queue.run(&self.model, &payload, &self.poll).await?;
        normalize_transcript(&result)
    }
}

/// Decode any known provider shape into a [`Transcript`].
pub fn normalize_transcript(result: &Value) -> GenResult<Transcript> {
    let raw: RawTranscript = serde_json::from_value(result.clone())
        .map_err(|e| GenError::parse(format!("unrecognized transcript shape: {e}")))?;
    Ok(raw.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_words_shape() {
        let result = json!({
            "text": "hello world",
            "words": [
                {"text": "hello", "start": 0.0, "end": 0.4},
                {"word": "world", "start": 0.4, "end": 0.9}
            ]
        });
        let transcript = normalize_transcript(&result).unwrap();
        assert_eq!(transcript.text, "hello world");
        assert_eq!(transcript.segments.len(), 2);
        assert_eq!(transcript.segments[1].text, "world");
        assert!((transcript.segments[1].end - 0.9).abs() < 1e-9);
    }

    #[test]
    fn normalizes_chunks_shape() {
        let result = json!({
            "text": "hello world",
            "chunks": [
                {"text": "hello", "timestamp": [0.0, 0.4]},
                {"text": "world", "timestamp": [0.4, 0.9]}
            ]
        });
        let transcript = normalize_transcript(&result).unwrap();
        assert_eq!(transcript.segments.len(), 2);
        assert!((transcript.segments[0].start - 0.0).abs() < 1e-9);
    }

    #[test]
    fn accepts_text_only_response() {
        let result = json!({"text": "hello"});
        let transcript = normalize_transcript(&result).unwrap();
        assert_eq!(transcript.text, "hello");
        assert!(transcript.segments.is_empty());
    }

    #[test]
    fn rejects_unknown_shape() {
        assert!(normalize_transcript(&json!({"transcript": []})).is_err());
    }
}
