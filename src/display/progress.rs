//! Progress display for uploads and generation jobs

use crate::api::models::ProgressStatus;
use crate::utils::format::format_file_size;
use std::io::{self, Write};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

const SPINNER_UPDATE_INTERVAL: Duration = Duration::from_millis(100);
const CLEAR_LINE_WIDTH: usize = 100;
pub const DEFAULT_BAR_WIDTH: usize = 30;

/// What a progress panel should show for one status snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressView {
    /// Bar fill, 0..=100
    pub fill_width: u8,
    pub percent_text: String,
    pub title: String,
    pub detail: String,
}

impl ProgressView {
    pub fn from_status(status: &ProgressStatus) -> Self {
        let step = status
            .current_step
            .as_deref()
            .filter(|s| !s.trim().is_empty());
        let percent = status.progress.min(100);

        Self {
            fill_width: percent,
            percent_text: format!("{}%", percent),
            title: step.unwrap_or("Processing...").to_string(),
            detail: step.unwrap_or("Starting generation...").to_string(),
        }
    }

    /// `[█████░░░░░] 50% Analyzing script...`
    pub fn render_line(&self, bar_width: usize) -> String {
        let filled = (self.fill_width as usize * bar_width) / 100;
        let empty = bar_width.saturating_sub(filled);
        format!(
            "[{}{}] {:>4} {}",
            "█".repeat(filled),
            "░".repeat(empty),
            self.percent_text,
            self.detail
        )
    }
}

/// Redraw the current line with the latest status
pub fn print_progress(status: &ProgressStatus) {
    let line = ProgressView::from_status(status).render_line(DEFAULT_BAR_WIDTH);
    print!("\r{:<width$}", line, width = CLEAR_LINE_WIDTH);
    let _ = io::stdout().flush(); // Ignore flush errors
}

const SPINNER_FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Spinner line shown while a screenplay is being uploaded.
///
/// Runs as a tokio task so it must be started inside a runtime; the task is
/// aborted on [`finish`](Self::finish) or drop.
pub struct UploadSpinner {
    label: String,
    started: Instant,
    task: Option<JoinHandle<()>>,
}

impl UploadSpinner {
    /// `size` is shown next to the file name when known
    pub fn new(file_name: &str, size: Option<u64>) -> Self {
        let label = match size {
            Some(bytes) => format!("Uploading {} ({})", file_name, format_file_size(bytes)),
            None => format!("Uploading {}", file_name),
        };
        Self {
            label,
            started: Instant::now(),
            task: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// `⠋ Uploading pilot.pdf (1.5 MB) 3s`
    pub fn frame(&self, tick: usize, elapsed: Duration) -> String {
        spinner_frame(&self.label, tick, elapsed)
    }

    pub fn start(&mut self) {
        if self.task.is_some() {
            return;
        }
        self.started = Instant::now();

        let label = self.label.clone();
        let started = self.started;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SPINNER_UPDATE_INTERVAL);
            let mut tick = 0;
            loop {
                ticker.tick().await;
                print!("\r{}", spinner_frame(&label, tick, started.elapsed()));
                let _ = io::stdout().flush();
                tick += 1;
            }
        }));
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the animation, clear its line and report how long the upload took
    pub fn finish(mut self) -> Duration {
        self.halt();
        self.started.elapsed()
    }

    fn halt(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            print!("\r{:<width$}\r", "", width = CLEAR_LINE_WIDTH);
            let _ = io::stdout().flush();
        }
    }
}

impl Drop for UploadSpinner {
    fn drop(&mut self) {
        self.halt();
    }
}

fn spinner_frame(label: &str, tick: usize, elapsed: Duration) -> String {
    format!(
        "{} {} {}s",
        SPINNER_FRAMES[tick % SPINNER_FRAMES.len()],
        label,
        elapsed.as_secs()
    )
}
