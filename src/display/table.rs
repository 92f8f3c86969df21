use crate::api::models::{Frame, UploadResponse};
use crate::utils::format::format_file_size;
use crate::utils::text::truncate_text_unicode;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets};
use crossterm::terminal;

const LOCATION_WIDTH: usize = 28;
const MIN_VISUAL_WIDTH: usize = 20;

/// Table rendering for storyboard frames and project summaries
pub struct TableDisplay {
    max_width: Option<usize>,
    use_colors: bool,
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDisplay {
    pub fn new() -> Self {
        Self {
            max_width: Self::detect_terminal_width(),
            use_colors: true,
        }
    }

    fn detect_terminal_width() -> Option<usize> {
        match terminal::size() {
            Ok((cols, _rows)) => Some((cols as usize).clamp(40, 200)),
            Err(_) => Some(80),
        }
    }

    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn new_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        if let Some(width) = self.max_width {
            table.set_width(width as u16);
        }
        table
    }

    fn header_cell(&self, text: &str) -> Cell {
        if self.use_colors {
            Cell::new(text).add_attribute(Attribute::Bold).fg(Color::Cyan)
        } else {
            Cell::new(text)
        }
    }

    fn status_cell(&self, status: &str) -> Cell {
        let cell = Cell::new(status);
        if !self.use_colors {
            return cell;
        }
        match status {
            "completed" => cell.fg(Color::Green),
            "error" | "failed" => cell.fg(Color::Red),
            _ => cell.fg(Color::Yellow),
        }
    }

    /// Column budget left for the key visual after the fixed columns
    fn visual_width(&self) -> usize {
        let width = self.max_width.unwrap_or(80);
        width
            .saturating_sub(8 + 12 + LOCATION_WIDTH + 10)
            .max(MIN_VISUAL_WIDTH)
    }

    /// One row per frame: label, status, location and time of day, key visual, image URL
    pub fn render_frames(&self, frames: &[Frame]) -> String {
        if frames.is_empty() {
            return "No frames generated yet.".to_string();
        }

        let mut table = self.new_table();
        table.set_header(vec![
            self.header_cell("Frame"),
            self.header_cell("Status"),
            self.header_cell("Location"),
            self.header_cell("Key Visual"),
            self.header_cell("Image"),
        ]);

        let visual_width = self.visual_width();
        for frame in frames {
            let location = if frame.time_of_day.is_empty() {
                frame.location.clone()
            } else {
                format!("{} - {}", frame.location, frame.time_of_day)
            };

            table.add_row(vec![
                Cell::new(format!("Scene {}", frame.label())),
                self.status_cell(&frame.status),
                Cell::new(truncate_text_unicode(&location, LOCATION_WIDTH)),
                Cell::new(truncate_text_unicode(&frame.key_visual, visual_width)),
                Cell::new(frame.image_url.as_deref().unwrap_or("-")),
            ]);
        }

        table.to_string()
    }

    /// Key/value summary of an uploaded screenplay
    pub fn render_upload(&self, upload: &UploadResponse) -> String {
        let mut table = self.new_table();
        table.set_header(vec![self.header_cell("Field"), self.header_cell("Value")]);

        let rows = [
            ("Project", upload.project_id.clone()),
            ("File", upload.filename.clone()),
            ("Words", upload.word_count.to_string()),
            ("Characters", upload.char_count.to_string()),
            ("Text size", format_file_size(upload.text_length)),
            ("Detected scenes", upload.detected_scenes.to_string()),
        ];
        for (field, value) in rows {
            table.add_row(vec![Cell::new(field), Cell::new(value)]);
        }

        table.to_string()
    }
}
