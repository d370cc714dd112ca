//! Image generation through the queue API.

use serde_json::{json, Value};
use tracing::info;

use sreel_models::AspectRatio;

use crate::error::{GenError, GenResult};
use crate::poll::PollConfig;
use crate::queue::QueueClient;

/// Wraps the queue client for a single image model.
#[derive(Clone)]
pub struct ImageClient {
    queue: QueueClient,
    model: String,
    poll: PollConfig,
}

impl ImageClient {
    pub fn new(queue: QueueClient, model: impl Into<String>) -> Self {
        Self {
            queue,
            model: model.into(),
            poll: PollConfig::default(),
        }
    }

    /// Generate one image and return its hosted URL.
    ///
    /// `reference_url` enables image-to-image: the model starts from the
    /// reference with a fixed strength instead of pure noise.
    pub async fn generate(
        &self,
        prompt: &str,
        style_suffix: &str,
        aspect: AspectRatio,
        reference_url: Option<&str>,
    ) -> GenResult<String> {
        let (width, height) = aspect.image_size();
        let full_prompt = if style_suffix.is_empty() {
            prompt.to_string()
        } else {
            format!("{prompt}, {style_suffix}")
        };

        let mut payload = json!({
            "prompt": full_prompt,
            "image_size": { "width": width, "height": height },
            "num_inference_steps": 4,
            "num_images": 1,
            "enable_safety_checker": false,
        });
        if let Some(url) = reference_url {
            payload["image_url"] = json!(url);
            payload["strength"] = json!(0.75);
        }

        info!(model = %self.model, %aspect, "generating image");
        let result = self.queue.run(&self.model, &payload, &self.poll).await?;
        extract_image_url(&result)
    }
}

/// Pull the first image URL out of a result document.
fn extract_image_url(result: &Value) -> GenResult<String> {
    result["images"]
        .as_array()
        .and_then(|imgs| imgs.first())
        .and_then(|img| img["url"].as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| GenError::missing_output("image result contained no image URL"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_first_image_url() {
        let result = json!({
            "images": [
                {"url": "https://cdn.example/a.png", "width": 720},
                {"url": "https://cdn.example/b.png"}
            ]
        });
        assert_eq!(
            extract_image_url(&result).unwrap(),
            "https://cdn.example/a.png"
        );
    }

    #[test]
    fn missing_images_is_an_error() {
        assert!(extract_image_url(&json!({})).is_err());
        assert!(extract_image_url(&json!({"images": []})).is_err());
    }
}
