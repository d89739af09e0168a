use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::config::UiConfig;
use crate::model::task::TaskStatus;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub dim: Color,
    pub grid_line: Color,
    pub today_bg: Color,
    pub other_month: Color,
    pub selection_bg: Color,
    pub selection_border: Color,
    pub modal_border: Color,
    pub gesture: Color,
    /// Per-status chip colors, keyed by status label
    pub status_colors: HashMap<String, Color>,
    /// Chip color before the first save assigns a status
    pub unset_status: Color,
}

impl Default for Theme {
    fn default() -> Self {
        let mut status_colors = HashMap::new();
        status_colors.insert("To Do".into(), Color::Rgb(0x91, 0x91, 0x91));
        status_colors.insert("In Progress".into(), Color::Rgb(0xFF, 0xA5, 0x00));
        status_colors.insert("Review".into(), Color::Rgb(0x9D, 0x9D, 0xF0));
        status_colors.insert("Completed".into(), Color::Rgb(0x4C, 0xAF, 0x50));

        Theme {
            background: Color::Rgb(0x10, 0x10, 0x14),
            text: Color::Rgb(0xD0, 0xD0, 0xD8),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            dim: Color::Rgb(0x6A, 0x6A, 0x75),
            grid_line: Color::Rgb(0x3A, 0x3A, 0x45),
            today_bg: Color::Rgb(0x22, 0x2A, 0x3A),
            other_month: Color::Rgb(0x50, 0x50, 0x58),
            selection_bg: Color::Rgb(0x2E, 0x2E, 0x40),
            selection_border: Color::Rgb(0x7F, 0xB4, 0xFF),
            modal_border: Color::Rgb(0x7F, 0xB4, 0xFF),
            gesture: Color::Rgb(0xFF, 0xD7, 0x00),
            status_colors,
            unset_status: Color::Rgb(0x91, 0x91, 0x91),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from board UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (label, value) in &ui.status_colors {
            if let Some(color) = parse_hex_color(value) {
                theme.status_colors.insert(label.clone(), color);
            }
        }
        theme
    }

    /// Get the chip color for a task status
    pub fn status_color(&self, status: Option<TaskStatus>) -> Color {
        match status {
            Some(s) => self
                .status_colors
                .get(s.label())
                .copied()
                .unwrap_or(self.text),
            None => self.unset_status,
        }
    }
}
