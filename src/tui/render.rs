use chrono::{Datelike, NaiveDate};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::model::filter::{TIME_WINDOWS, window_label};
use crate::model::task::{Task, TaskStatus};
use crate::ops::date_ops::{format_day, weeks_in_month};
use crate::ops::gesture::Feedback;

use super::app::{App, Mode};
use super::input::mode_hints;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let bg = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg), area);

    // Layout: title | weekday header | grid | status row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    render_title(frame, app, chunks[0]);
    render_weekday_header(frame, app, chunks[1]);
    render_grid(frame, app, chunks[2]);
    render_status_row(frame, app, chunks[3]);

    match app.mode {
        Mode::Edit => render_edit_modal(frame, app, area),
        Mode::Filter => render_filter_panel(frame, app, area),
        _ => {}
    }
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let month_name = MONTH_NAMES[app.month.month0() as usize];
    let mut text = format!("{} {}", month_name, app.month.year());
    if !app.config.board.name.is_empty() {
        text = format!("{}  ·  {}", app.config.board.name, text);
    }
    if !app.board.filters.is_empty() {
        text.push_str("  [filtered]");
    }
    let line = Line::from(Span::styled(
        text,
        Style::default()
            .fg(app.theme.text_bright)
            .add_modifier(Modifier::BOLD),
    ))
    .centered();
    frame.render_widget(Paragraph::new(line), area);
}

fn render_weekday_header(frame: &mut Frame, app: &App, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 7); 7])
        .split(area);
    for (i, name) in DAY_NAMES.iter().enumerate() {
        let line = Line::from(Span::styled(*name, Style::default().fg(app.theme.dim))).centered();
        frame.render_widget(Paragraph::new(line), cols[i]);
    }
}

fn render_grid(frame: &mut Frame, app: &App, area: Rect) {
    let weeks = weeks_in_month(app.month);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, weeks.len() as u32); weeks.len()])
        .split(area);

    for (row, week) in weeks.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 7); 7])
            .split(rows[row]);
        for (col, &day) in week.iter().enumerate() {
            render_day_cell(frame, app, cols[col], day);
        }
    }
}

fn render_day_cell(frame: &mut Frame, app: &App, area: Rect, day: NaiveDate) {
    let is_cursor = day == app.cursor_day;
    let is_today = day == app.today();
    let in_month = day.month() == app.month.month() && day.year() == app.month.year();

    let border_style = if is_cursor {
        Style::default().fg(app.theme.selection_border)
    } else {
        Style::default().fg(app.theme.grid_line)
    };
    let day_style = if !in_month {
        Style::default().fg(app.theme.other_month)
    } else if is_today {
        Style::default()
            .fg(app.theme.text_bright)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text)
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(format!(" {} ", day.day()), day_style));
    if is_today {
        block = block.style(Style::default().bg(app.theme.today_bg));
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let ordered = app.ordered_on_day(day);
    let max_lines = inner.height as usize;
    let mut lines: Vec<Line> = Vec::new();

    for (index, task) in ordered.iter().enumerate() {
        if lines.len() == max_lines {
            break;
        }
        // The "+N more" line replaces the last visible chip when overfull
        if lines.len() + 1 == max_lines && index + 1 < ordered.len() {
            lines.push(Line::from(Span::styled(
                format!("+{} more", ordered.len() - index),
                Style::default().fg(app.theme.dim),
            )));
            break;
        }
        lines.push(chip_line(app, task, day, inner.width as usize, is_cursor && index == app.chip_cursor));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn chip_line<'a>(app: &App, task: &Task, day: NaiveDate, width: usize, selected: bool) -> Line<'a> {
    let color = app.theme.status_color(task.status);
    let mut style = Style::default().fg(color);
    if selected {
        style = style.bg(app.theme.selection_bg).add_modifier(Modifier::BOLD);
    }
    if selected && app.gesture_task.as_deref() == Some(task.id.as_str()) {
        style = Style::default()
            .fg(app.theme.gesture)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD);
    }

    // Span continuation markers on multi-day chips
    let prefix = if task.start < day { "«" } else { "▪" };
    let suffix = if task.end > day { "»" } else { "" };

    let budget = width.saturating_sub(prefix.width() + suffix.width() + 1);
    let label = truncate_to_width(task.label(), budget);
    Line::from(Span::styled(format!("{}{}{}", prefix, label, suffix), style))
}

fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let mode_name = match app.mode {
        Mode::Navigate => "NAV",
        Mode::Move => "MOVE",
        Mode::Resize => "RESIZE",
        Mode::Reorder => "REORDER",
        Mode::Edit => "EDIT",
        Mode::Filter => "FILTER",
    };

    let mut left = format!(" {}  {}", mode_name, format_day(app.cursor_day));
    if let Some(id) = app.selected_task_id() {
        left.push_str(&format!("  {}", id));
    }
    match app.gesture_feedback {
        Some(Feedback::Translate { x, y }) => {
            left.push_str(&format!("  drag {:+.0},{:+.0}px", x, y));
        }
        Some(Feedback::Width(w)) => {
            left.push_str(&format!("  width {:.0}px", w));
        }
        None => {}
    }
    if let Some(ref msg) = app.status_line {
        left.push_str(&format!("  {}", msg));
    }

    let hint = mode_hints(app.mode);
    let width = area.width as usize;
    let mut spans = vec![Span::styled(
        left.clone(),
        Style::default().fg(app.theme.text).bg(bg),
    )];
    let left_width = left.width();
    let hint_width = hint.width();
    if left_width + hint_width < width {
        spans.push(Span::styled(
            " ".repeat(width - left_width - hint_width),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ---------------------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------------------

fn render_edit_modal(frame: &mut Frame, app: &App, area: Rect) {
    let rect = centered_rect(50, 9, area);
    frame.render_widget(Clear, rect);

    let title = match app.edit_task.as_deref().and_then(|id| app.find_task(id)) {
        Some(t) if t.is_new => " New Task ".to_string(),
        Some(t) => format!(" {} ", t.id),
        None => " Task ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.modal_border))
        .style(Style::default().bg(app.theme.background))
        .title(title);
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("name: ", Style::default().fg(app.theme.dim)),
            Span::styled(
                app.edit_buffer.clone(),
                Style::default().fg(app.theme.text_bright),
            ),
            Span::styled("\u{258C}", Style::default().fg(app.theme.modal_border)),
        ]),
        Line::default(),
        status_picker_line(app),
    ];
    if let Some(ref err) = app.edit_error {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(app.theme.gesture),
        )));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn status_picker_line<'a>(app: &App) -> Line<'a> {
    let mut spans = vec![Span::styled("status: ", Style::default().fg(app.theme.dim))];
    for status in TaskStatus::ALL {
        let color = app.theme.status_color(Some(status));
        let style = if status == app.edit_status {
            Style::default()
                .fg(app.theme.background)
                .bg(color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };
        spans.push(Span::styled(format!(" {} ", status.label()), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn render_filter_panel(frame: &mut Frame, app: &App, area: Rect) {
    let height = (super::input::filter_row_count() + 6) as u16;
    let rect = centered_rect(44, height, area);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.modal_border))
        .style(Style::default().bg(app.theme.background))
        .title(" Filters ");
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let mut lines = Vec::new();
    for (row, status) in TaskStatus::ALL.into_iter().enumerate() {
        lines.push(check_row(
            app,
            row,
            app.board.filters.statuses.contains(&status),
            status.label(),
            app.theme.status_color(Some(status)),
        ));
    }
    for (i, &w) in TIME_WINDOWS.iter().enumerate() {
        lines.push(check_row(
            app,
            TaskStatus::ALL.len() + i,
            app.board.filters.windows.contains(&w),
            &window_label(w),
            app.theme.text,
        ));
    }
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled("search: ", Style::default().fg(app.theme.dim)),
        Span::styled(
            app.board.filters.query.clone(),
            Style::default().fg(app.theme.text_bright),
        ),
        Span::styled("\u{258C}", Style::default().fg(app.theme.modal_border)),
    ]));

    let today = app.today();
    let shown = crate::ops::filter_ops::visible_tasks(&app.board.tasks, &app.board.filters, today).len();
    lines.push(Line::from(Span::styled(
        format!("{} of {} tasks shown", shown, app.board.tasks.len()),
        Style::default().fg(app.theme.dim),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn check_row<'a>(
    app: &App,
    row: usize,
    checked: bool,
    label: &str,
    color: ratatui::style::Color,
) -> Line<'a> {
    let cursor = if row == app.filter_cursor { "› " } else { "  " };
    let mark = if checked { "[x] " } else { "[ ] " };
    let mut style = Style::default().fg(color);
    if row == app.filter_cursor {
        style = style.add_modifier(Modifier::BOLD);
    }
    Line::from(vec![
        Span::styled(
            cursor.to_string(),
            Style::default().fg(app.theme.modal_border),
        ),
        Span::styled(format!("{}{}", mark, label), style),
    ])
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Truncate to a display width, appending an ellipsis when cut.
fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0usize;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

/// A centered rect `percent_x` wide and `height` rows tall.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect {
        x,
        y,
        width,
        height: height.min(area.height),
    }
}
