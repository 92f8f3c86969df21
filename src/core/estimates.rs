//! Frame count and duration estimates shown before generation starts

use std::fmt;
use std::str::FromStr;

/// Rough generation cost of one frame, in minutes
pub const MINUTES_PER_FRAME: f64 = 0.5;

/// How many frames to draw per scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameDensity {
    Low,
    #[default]
    Medium,
    High,
}

impl FrameDensity {
    pub fn frames_per_scene(self) -> f64 {
        match self {
            FrameDensity::Low => 1.0,
            FrameDensity::Medium => 1.5,
            FrameDensity::High => 2.5,
        }
    }

    /// Lenient parse: anything unrecognized is `Medium`
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for FrameDensity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(FrameDensity::Low),
            "medium" => Ok(FrameDensity::Medium),
            "high" => Ok(FrameDensity::High),
            other => Err(format!(
                "Unknown frame density '{}'. Use low, medium or high",
                other
            )),
        }
    }
}

impl fmt::Display for FrameDensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrameDensity::Low => "low",
            FrameDensity::Medium => "medium",
            FrameDensity::High => "high",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Estimate {
    pub frames: u32,
    pub minutes: u32,
}

pub fn estimate(max_scenes: u32, density: FrameDensity) -> Estimate {
    let frames = (max_scenes as f64 * density.frames_per_scene()).round() as u32;
    let minutes = (frames as f64 * MINUTES_PER_FRAME).round() as u32;
    Estimate { frames, minutes }
}
