//! Provider pricing and running cost accumulation.
//!
//! Prices are static lookups; the accumulator is purely additive and the
//! dollar breakdown is computed on demand so it always reflects current
//! counts.

use serde::{Deserialize, Serialize};

/// Pricing for one provider model.
///
/// Video models bill either per generated clip or per second of output,
/// never both. Unused fields are zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Dollars per generated image.
    pub per_image: f64,
    /// Dollars per generated video clip.
    pub per_video: f64,
    /// Dollars per second of generated video.
    pub per_video_second: f64,
    /// Dollars per narration character.
    pub per_character: f64,
}

/// Static per-model price table.
#[derive(Debug, Clone)]
pub struct PriceTable {
    entries: Vec<(&'static str, ModelPricing)>,
}

impl PriceTable {
    /// Prices as of 2025 for the supported models.
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                (
                    "fal-ai/veo3.1/fast/image-to-video",
                    ModelPricing {
                        per_video_second: 0.25,
                        ..Default::default()
                    },
                ),
                (
                    "fal-ai/bytedance/seedance/v1/lite/image-to-video",
                    ModelPricing {
                        per_video: 0.18,
                        ..Default::default()
                    },
                ),
                (
                    "fal-ai/flux/schnell",
                    ModelPricing {
                        per_image: 0.003,
                        ..Default::default()
                    },
                ),
                (
                    "fal-ai/flux/dev",
                    ModelPricing {
                        per_image: 0.025,
                        ..Default::default()
                    },
                ),
                (
                    "fal-ai/elevenlabs/tts/eleven-v3",
                    ModelPricing {
                        per_character: 0.0001,
                        ..Default::default()
                    },
                ),
            ],
        }
    }

    /// Look up pricing for a model id. Unknown models cost nothing.
    pub fn pricing_for(&self, model: &str) -> ModelPricing {
        self.entries
            .iter()
            .find(|(id, _)| *id == model)
            .map(|(_, p)| *p)
            .unwrap_or_default()
    }
}

/// Running tally of billable units consumed by one session.
#[derive(Debug, Clone, Default)]
pub struct CostAccumulator {
    images: u32,
    videos: u32,
    video_seconds: u32,
    narration_chars: u64,
}

impl CostAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one generated image.
    pub fn add_image(&mut self) {
        self.images += 1;
    }

    /// Record one generated video clip of the given length.
    pub fn add_video(&mut self, seconds: u32) {
        self.videos += 1;
        self.video_seconds += seconds;
    }

    /// Record synthesized narration characters.
    pub fn add_narration_chars(&mut self, chars: u64) {
        self.narration_chars += chars;
    }

    pub fn images(&self) -> u32 {
        self.images
    }

    pub fn videos(&self) -> u32 {
        self.videos
    }

    pub fn narration_chars(&self) -> u64 {
        self.narration_chars
    }

    /// Compute the dollar breakdown for the given models.
    pub fn breakdown(
        &self,
        table: &PriceTable,
        image_model: &str,
        video_model: &str,
        tts_model: &str,
    ) -> CostBreakdown {
        let image_pricing = table.pricing_for(image_model);
        let video_pricing = table.pricing_for(video_model);
        let tts_pricing = table.pricing_for(tts_model);

        let image_cost = self.images as f64 * image_pricing.per_image;
        let video_cost = self.videos as f64 * video_pricing.per_video
            + self.video_seconds as f64 * video_pricing.per_video_second;
        let narration_cost = self.narration_chars as f64 * tts_pricing.per_character;

        CostBreakdown {
            images: self.images,
            videos: self.videos,
            narration_chars: self.narration_chars,
            image_cost,
            video_cost,
            narration_cost,
            total: image_cost + video_cost + narration_cost,
        }
    }
}

/// Detailed dollar breakdown of a session's consumption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub images: u32,
    pub videos: u32,
    pub narration_chars: u64,
    pub image_cost: f64,
    pub video_cost: f64,
    pub narration_cost: f64,
    pub total: f64,
}

impl CostBreakdown {
    /// Human-readable summary for display after a run.
    pub fn to_description(&self) -> String {
        format!(
            "{} image(s) ${:.3}, {} video(s) ${:.2}, {} narration char(s) ${:.3}, total ${:.2}",
            self.images,
            self.image_cost,
            self.videos,
            self.video_cost,
            self.narration_chars,
            self.narration_cost,
            self.total
        )
    }
}
