//! Image-to-video generation through the queue API.

use serde_json::{json, Value};
use tracing::info;

use sreel_models::AspectRatio;

use crate::error::{GenError, GenResult};
use crate::poll::PollConfig;
use crate::queue::QueueClient;

/// Wraps the queue client for a single image-to-video model.
#[derive(Clone)]
pub struct VideoClient {
    queue: QueueClient,
    model: String,
    poll: PollConfig,
}

impl VideoClient {
    pub fn new(queue: QueueClient, model: impl Into<String>) -> Self {
        Self {
            queue,
            model: model.into(),
            poll: PollConfig::default(),
        }
    }

    /// Animate a source image into a short clip and return its hosted URL.
    pub async fn generate(
        &self,
        prompt: &str,
        image_url: &str,
        duration: &str,
        aspect: AspectRatio,
    ) -> GenResult<String> {
        let payload = json!({
            "prompt": prompt,
            "image_url": image_url,
            "duration": duration,
            "resolution": "720p",
            "aspect_ratio": aspect.api_str(),
        });

        info!(model = %self.model, duration, "generating video segment");
        let result = self.queue.run(&self.model, &payload, &self.poll).await?;
        extract_video_url(&result)
    }
}

fn extract_video_url(result: &Value) -> GenResult<String> {
    result["video"]["url"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| GenError::missing_output("video result contained no video URL"))
}
