//! Output aspect ratios.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Supported output aspect ratios.
///
/// Only the two formats the video providers accept: horizontal 16:9 and
/// vertical 9:16.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectRatio {
    /// Horizontal (16:9)
    Landscape,
    /// Vertical (9:16) for Shorts/Reels
    Portrait,
}

impl AspectRatio {
    /// Image dimensions in pixels for this aspect ratio.
    pub const fn image_size(&self) -> (u32, u32) {
        match self {
            AspectRatio::Landscape => (1280, 720),
            AspectRatio::Portrait => (720, 1280),
        }
    }

    /// The `W:H` string the provider APIs expect.
    pub const fn api_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
        }
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::Portrait
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_str())
    }
}

impl FromStr for AspectRatio {
    type Err = AspectRatioParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "16:9" | "landscape" | "horizontal" => Ok(AspectRatio::Landscape),
            "9:16" | "portrait" | "vertical" => Ok(AspectRatio::Portrait),
            other => Err(AspectRatioParseError::Unsupported(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum AspectRatioParseError {
    #[error("Unsupported aspect ratio: {0}, expected '16:9' or '9:16'")]
    Unsupported(String),
}
