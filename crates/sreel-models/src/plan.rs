//! Duration planning for a run.

use serde::{Deserialize, Serialize};

/// Derived timing parameters for a target video duration.
///
/// The timeline is cut into fixed-length segments; short segments keep the
/// visuals dynamic. Narration length is estimated from an average speaking
/// rate so story generation can target the right word count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationPlan {
    /// Target total duration in seconds.
    pub total_seconds: u32,
    /// Number of segments (`ceil(total / SEGMENT_SECONDS)`).
    pub segment_count: u32,
    /// Estimated narration word count at `WORDS_PER_MINUTE`.
    pub estimated_words: u32,
}

impl DurationPlan {
    /// Fixed segment length in seconds.
    pub const SEGMENT_SECONDS: u32 = 4;

    /// Average narration speaking rate.
    pub const WORDS_PER_MINUTE: u32 = 150;

    /// Compute the plan for a target duration.
    pub fn for_duration(total_seconds: u32) -> Self {
        let segment_count = total_seconds.div_ceil(Self::SEGMENT_SECONDS);
        let estimated_words = total_seconds * Self::WORDS_PER_MINUTE / 60;
        Self {
            total_seconds,
            segment_count,
            estimated_words,
        }
    }

    /// Duration string the video provider expects ("4s").
    pub fn segment_duration_str() -> &'static str {
        "4s"
    }
}
