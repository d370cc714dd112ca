//! Shared data models for StoryReel.
//!
//! This crate provides Serde-serializable types for:
//! - Timeline segments and per-segment generation outcomes
//! - Aspect ratios and duration planning
//! - Provider pricing and running cost accumulation
//! - Narration voice presets

pub mod aspect;
pub mod plan;
pub mod pricing;
pub mod segment;
pub mod voice;

// Re-export common types
pub use aspect::{AspectRatio, AspectRatioParseError};
pub use plan::DurationPlan;
pub use pricing::{CostAccumulator, CostBreakdown, ModelPricing, PriceTable};
pub use segment::{GenerationResult, Segment};
pub use voice::VoicePreset;
