use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Custom deserializer: accepts integer or float percentages (the server
/// reports fractional progress while frames are rendering) and clamps them
/// into 0..=100. Fractions round down so only a real 100 reads as done.
/// Missing, null or non-numeric values read as 0.
fn deserialize_percent<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let percent = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(percent.floor().clamp(0.0, 100.0) as u8)
}

/// Custom deserializer: `null` frame lists read as empty
fn deserialize_frames<'de, D>(deserializer: D) -> Result<Vec<Frame>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Frame>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Custom deserializer: `null` text fields read as empty
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Reply to a successful screenplay upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    pub project_id: String,
    pub filename: String,
    #[serde(default)]
    pub word_count: u64,
    #[serde(default)]
    pub char_count: u64,
    #[serde(default)]
    pub text_length: u64,
    #[serde(default)]
    pub detected_scenes: u32,
}

/// Visual styles the generator knows how to render
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Classic,
    Cinematic,
    Sketch,
    Comic,
}

impl Style {
    pub fn as_str(self) -> &'static str {
        match self {
            Style::Classic => "classic",
            Style::Cinematic => "cinematic",
            Style::Sketch => "sketch",
            Style::Comic => "comic",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub project_id: String,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub success: bool,
    pub project_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// One rendered storyboard frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub frame_id: String,
    pub scene_number: u32,
    pub frame_number: u32,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub status: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub location: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub time_of_day: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub key_visual: String,
}

impl Frame {
    /// `scene.frame` label, e.g. `3.2`
    pub fn label(&self) -> String {
        format!("{}.{}", self.scene_number, self.frame_number)
    }
}

/// Where a generation job stands, derived from a status snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Running,
    Completed,
    Failed,
}

/// Snapshot returned by `GET /status/<project_id>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressStatus {
    #[serde(default, deserialize_with = "deserialize_percent")]
    pub progress: u8,
    #[serde(default)]
    pub current_step: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub current_frame: Option<u32>,
    #[serde(default)]
    pub total_frames: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_frames")]
    pub frames: Vec<Frame>,
}

impl ProgressStatus {
    pub fn new(progress: u8, current_step: &str) -> Self {
        Self {
            progress: progress.min(100),
            current_step: Some(current_step.to_string()),
            ..Default::default()
        }
    }

    /// An explicit failure status wins over the percentage; otherwise a job
    /// is complete at 100% or when the server says so.
    pub fn state(&self) -> JobState {
        match self.status.as_deref() {
            Some("error") | Some("failed") => JobState::Failed,
            Some("completed") => JobState::Completed,
            _ if self.progress >= 100 => JobState::Completed,
            _ => JobState::Running,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state() != JobState::Running
    }
}
