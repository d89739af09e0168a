use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from board.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub board: BoardInfo,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardInfo {
    #[serde(default)]
    pub name: String,
}

/// Pixel metrics the placement engine and gesture controller work in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Height of one task chip.
    #[serde(default = "default_task_height")]
    pub task_height: f64,
    /// Vertical gap between stacked chips.
    #[serde(default = "default_stack_gap")]
    pub stack_gap: f64,
    /// Height of one week row; a vertical drag of one row is one week.
    #[serde(default = "default_row_height")]
    pub row_height: f64,
    /// Horizontal inset reserved by a multi-day span chip.
    #[serde(default = "default_span_inset")]
    pub span_inset: f64,
    /// Larger inset for single-day chips so they read differently from spans.
    #[serde(default = "default_single_day_inset")]
    pub single_day_inset: f64,
    /// Width of one day cell, cached onto tasks at creation time.
    #[serde(default = "default_cell_width")]
    pub cell_width: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            task_height: default_task_height(),
            stack_gap: default_stack_gap(),
            row_height: default_row_height(),
            span_inset: default_span_inset(),
            single_day_inset: default_single_day_inset(),
            cell_width: default_cell_width(),
        }
    }
}

fn default_task_height() -> f64 {
    18.0
}

fn default_stack_gap() -> f64 {
    15.0
}

fn default_row_height() -> f64 {
    120.0
}

fn default_span_inset() -> f64 {
    20.0
}

fn default_single_day_inset() -> f64 {
    30.0
}

fn default_cell_width() -> f64 {
    120.0
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Per-status chip colors, keyed by status label (e.g. "In Progress").
    #[serde(default)]
    pub status_colors: HashMap<String, String>,
}
