use chrono::Duration;
use crossterm::event::{KeyCode, KeyEvent};
use unicode_segmentation::UnicodeSegmentation;

use crate::model::filter::TIME_WINDOWS;
use crate::model::task::TaskStatus;
use crate::ops::gesture::{Edge, GestureEvent, GestureKind, GesturePhase, GestureUpdate};
use crate::ops::{placement, store_ops};

use super::app::{App, Mode, save_ui_state};

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    app.status_line = None;

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Move => handle_gesture_mode(app, key),
        Mode::Resize => handle_gesture_mode(app, key),
        Mode::Reorder => handle_reorder(app, key),
        Mode::Edit => handle_edit(app, key),
        Mode::Filter => handle_filter(app, key),
    }
}

// ---------------------------------------------------------------------------
// Navigate
// ---------------------------------------------------------------------------

fn handle_navigate(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }

        // Day cursor
        KeyCode::Char('h') | KeyCode::Left => move_cursor(app, -1),
        KeyCode::Char('l') | KeyCode::Right => move_cursor(app, 1),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(app, -7),
        KeyCode::Char('j') | KeyCode::Down => move_cursor(app, 7),
        KeyCode::Char('t') => {
            app.cursor_day = app.today();
            app.month = crate::ops::date_ops::month_start(app.cursor_day);
            app.chip_cursor = 0;
            app.reconcile();
        }
        KeyCode::Char('[') | KeyCode::PageUp => shift_month(app, -1),
        KeyCode::Char(']') | KeyCode::PageDown => shift_month(app, 1),

        // Chip cursor within the day stack
        KeyCode::Tab => {
            let len = app.ordered_on_day(app.cursor_day).len();
            if len > 0 {
                app.chip_cursor = (app.chip_cursor + 1) % len;
            }
        }
        KeyCode::BackTab => {
            let len = app.ordered_on_day(app.cursor_day).len();
            if len > 0 {
                app.chip_cursor = (app.chip_cursor + len - 1) % len;
            }
        }

        // Create on the cursor day, then straight into the modal
        KeyCode::Char('n') => {
            let id = store_ops::create_task_on_day(
                &mut app.board.tasks,
                app.cursor_day,
                app.config.layout.cell_width,
            );
            app.save_tasks();
            app.reconcile();
            open_modal(app, &id);
        }

        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(id) = app.selected_task_id() {
                open_modal(app, &id);
            }
        }

        // Cycle status in place
        KeyCode::Char('s') => {
            if let Some(id) = app.selected_task_id() {
                let current = app.find_task(&id).and_then(|t| t.status);
                let next = match current {
                    None => TaskStatus::ToDo,
                    Some(s) => {
                        let i = TaskStatus::ALL.iter().position(|&x| x == s).unwrap_or(0);
                        TaskStatus::ALL[(i + 1) % TaskStatus::ALL.len()]
                    }
                };
                if store_ops::set_status(&mut app.board.tasks, &id, next).is_ok() {
                    app.save_tasks();
                }
            }
        }

        KeyCode::Char('m') => start_gesture(app, GestureKind::Drag, Mode::Move),
        KeyCode::Char('r') => start_gesture(app, GestureKind::Resize(Edge::Right), Mode::Resize),
        KeyCode::Char('R') => start_gesture(app, GestureKind::Resize(Edge::Left), Mode::Resize),

        KeyCode::Char('o') => {
            let ordered: Vec<String> = app
                .ordered_on_day(app.cursor_day)
                .iter()
                .map(|t| t.id.clone())
                .collect();
            if !ordered.is_empty() {
                // Seed the overlay so reorder drops have a list to act on
                app.board.day_order.insert(app.cursor_day, ordered);
                app.mode = Mode::Reorder;
            }
        }

        KeyCode::Char('f') | KeyCode::Char('/') => {
            app.filter_cursor = 0;
            app.mode = Mode::Filter;
        }

        _ => {}
    }
}

fn move_cursor(app: &mut App, days: i64) {
    app.cursor_day += Duration::days(days);
    app.chip_cursor = 0;
    app.follow_cursor();
}

fn shift_month(app: &mut App, months: i32) {
    let shifted = if months < 0 {
        crate::ops::date_ops::month_start(app.month) - Duration::days(1)
    } else {
        crate::ops::date_ops::month_end(app.month) + Duration::days(1)
    };
    app.month = crate::ops::date_ops::month_start(shifted);
    app.cursor_day = app.month;
    app.chip_cursor = 0;
    app.reconcile();
}

fn open_modal(app: &mut App, id: &str) {
    let Some(task) = app.find_task(id) else {
        return;
    };
    let (name, status) = (task.name.clone(), task.status);
    app.edit_buffer = name;
    app.edit_status = status.unwrap_or(TaskStatus::ToDo);
    app.edit_task = Some(id.to_string());
    app.edit_error = None;
    app.mode = Mode::Edit;
}

// ---------------------------------------------------------------------------
// Move / Resize (synthesized gesture frames)
// ---------------------------------------------------------------------------

fn start_gesture(app: &mut App, kind: GestureKind, mode: Mode) {
    let Some(id) = app.selected_task_id() else {
        return;
    };
    let Some(task) = app.find_task(&id).cloned() else {
        return;
    };
    app.gesture.handle(
        &task,
        GestureEvent {
            kind,
            phase: GesturePhase::Start,
            delta_x: 0.0,
            delta_y: 0.0,
        },
    );
    app.gesture_task = Some(id);
    app.gesture_kind = kind;
    app.gesture_feedback = None;
    app.mode = mode;
}

/// One key press is one gesture frame: a cell horizontally, a row vertically.
fn handle_gesture_mode(app: &mut App, key: KeyEvent) {
    let cell = app.config.layout.cell_width;
    let row = app.config.layout.row_height;

    let (dx, dy) = match key.code {
        KeyCode::Char('h') | KeyCode::Left => (-cell, 0.0),
        KeyCode::Char('l') | KeyCode::Right => (cell, 0.0),
        KeyCode::Char('k') | KeyCode::Up => (0.0, -row),
        KeyCode::Char('j') | KeyCode::Down => (0.0, row),
        KeyCode::Enter => {
            finish_gesture(app, true);
            return;
        }
        KeyCode::Esc => {
            finish_gesture(app, false);
            return;
        }
        _ => return,
    };

    // Vertical frames only make sense for drags
    if matches!(app.gesture_kind, GestureKind::Resize(_)) && dy != 0.0 {
        return;
    }

    let Some(task) = app
        .gesture_task
        .as_deref()
        .and_then(|id| app.find_task(id))
        .cloned()
    else {
        finish_gesture(app, false);
        return;
    };
    let update = app.gesture.handle(
        &task,
        GestureEvent {
            kind: app.gesture_kind,
            phase: GesturePhase::Move,
            delta_x: dx,
            delta_y: dy,
        },
    );
    if let Some(GestureUpdate::Live(feedback)) = update {
        app.gesture_feedback = Some(feedback);
    }
}

fn finish_gesture(app: &mut App, commit: bool) {
    let task = app
        .gesture_task
        .as_deref()
        .and_then(|id| app.find_task(id))
        .cloned();
    if let Some(task) = task {
        let update = app.gesture.handle(
            &task,
            GestureEvent {
                kind: app.gesture_kind,
                phase: GesturePhase::End,
                delta_x: 0.0,
                delta_y: 0.0,
            },
        );
        if commit
            && let Some(GestureUpdate::Commit(range)) = update
        {
            let _ = store_ops::update_range(&mut app.board.tasks, &task.id, range.start, range.end);
            app.save_tasks();
            // follow the chip to its new start day
            if let Some(moved) = app.find_task(&task.id) {
                app.cursor_day = moved.start;
            }
            app.reconcile();
            app.follow_cursor();
        }
    }
    app.gesture_task = None;
    app.gesture_feedback = None;
    app.mode = Mode::Navigate;
    app.clamp_chip_cursor();
}

// ---------------------------------------------------------------------------
// Reorder
// ---------------------------------------------------------------------------

fn handle_reorder(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => reorder_by(app, 1),
        KeyCode::Char('k') | KeyCode::Up => reorder_by(app, -1),
        KeyCode::Char('h') | KeyCode::Left => drop_to_day(app, -1),
        KeyCode::Char('l') | KeyCode::Right => drop_to_day(app, 1),
        KeyCode::Enter | KeyCode::Esc => {
            app.mode = Mode::Navigate;
            save_ui_state(app);
        }
        _ => {}
    }
}

/// Carry the selected chip to the neighbor day, landing at the bottom of
/// that day's stack.
fn drop_to_day(app: &mut App, delta: i64) {
    let Some(id) = app.selected_task_id() else {
        return;
    };
    let target = app.cursor_day + Duration::days(delta);
    if placement::drop_on_day(
        &mut app.board.tasks,
        &mut app.board.day_order,
        &id,
        app.cursor_day,
        target,
    )
    .is_ok()
    {
        app.save_tasks();
        app.cursor_day = target;
        app.chip_cursor = app.ordered_on_day(target).len().saturating_sub(1);
        app.reconcile();
        app.follow_cursor();
    }
}

fn reorder_by(app: &mut App, delta: i64) {
    let ordered: Vec<String> = app
        .ordered_on_day(app.cursor_day)
        .iter()
        .map(|t| t.id.clone())
        .collect();
    let from = app.chip_cursor;
    let to = from as i64 + delta;
    if to < 0 || to as usize >= ordered.len() {
        return;
    }
    let moving = ordered[from].clone();
    let target = ordered[to as usize].clone();
    if placement::drop_on_chip(
        &mut app.board.tasks,
        &mut app.board.day_order,
        &moving,
        app.cursor_day,
        app.cursor_day,
        &target,
    )
    .is_ok()
    {
        app.chip_cursor = to as usize;
    }
}

// ---------------------------------------------------------------------------
// Edit modal
// ---------------------------------------------------------------------------

fn handle_edit(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            // Cancel keeps the task; an unsaved one stays a "New Task" chip
            app.edit_task = None;
            app.edit_error = None;
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => {
            let Some(id) = app.edit_task.clone() else {
                app.mode = Mode::Navigate;
                return;
            };
            let name = app.edit_buffer.trim().to_string();
            match store_ops::apply_modal_save(&mut app.board.tasks, &id, &name, app.edit_status) {
                Ok(()) => {
                    app.save_tasks();
                    app.reconcile();
                    app.edit_task = None;
                    app.edit_error = None;
                    app.mode = Mode::Navigate;
                }
                Err(e) => {
                    app.edit_error = Some(e.to_string());
                }
            }
        }
        KeyCode::Tab => {
            let i = TaskStatus::ALL
                .iter()
                .position(|&s| s == app.edit_status)
                .unwrap_or(0);
            app.edit_status = TaskStatus::ALL[(i + 1) % TaskStatus::ALL.len()];
        }
        KeyCode::BackTab => {
            let i = TaskStatus::ALL
                .iter()
                .position(|&s| s == app.edit_status)
                .unwrap_or(0);
            app.edit_status = TaskStatus::ALL[(i + TaskStatus::ALL.len() - 1) % TaskStatus::ALL.len()];
        }
        KeyCode::Backspace => {
            let up_to = app
                .edit_buffer
                .grapheme_indices(true)
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            app.edit_buffer.truncate(up_to);
            app.edit_error = None;
        }
        KeyCode::Char(c) => {
            app.edit_buffer.push(c);
            app.edit_error = None;
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Filter panel
// ---------------------------------------------------------------------------

/// Rows: one per status, then one per time window.
pub fn filter_row_count() -> usize {
    TaskStatus::ALL.len() + TIME_WINDOWS.len()
}

fn handle_filter(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => {
            app.mode = Mode::Navigate;
            app.clamp_chip_cursor();
            save_ui_state(app);
        }
        KeyCode::Up => {
            app.filter_cursor = app.filter_cursor.saturating_sub(1);
        }
        KeyCode::Down => {
            if app.filter_cursor + 1 < filter_row_count() {
                app.filter_cursor += 1;
            }
        }
        KeyCode::Char(' ') => {
            let statuses = TaskStatus::ALL.len();
            if app.filter_cursor < statuses {
                app.board.filters.toggle_status(TaskStatus::ALL[app.filter_cursor]);
            } else if let Some(&w) = TIME_WINDOWS.get(app.filter_cursor - statuses) {
                app.board.filters.toggle_window(w);
            }
        }
        KeyCode::Delete => {
            app.board.filters.clear();
        }
        KeyCode::Backspace => {
            let up_to = app
                .board
                .filters
                .query
                .grapheme_indices(true)
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            app.board.filters.query.truncate(up_to);
        }
        KeyCode::Char(c) => {
            app.board.filters.query.push(c);
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Key hints per mode
// ---------------------------------------------------------------------------

pub fn mode_hints(mode: Mode) -> &'static str {
    match mode {
        Mode::Navigate => {
            "hjkl move  [/] month  t today  tab chip  n new  e edit  s status  m move  r/R resize  o reorder  f filter  q quit"
        }
        Mode::Move => "hjkl drag by cell/row  enter commit  esc cancel",
        Mode::Resize => "h/l drag edge  enter commit  esc cancel",
        Mode::Reorder => "j/k restack  h/l carry to neighbor day  enter/esc done",
        Mode::Edit => "type name  tab status  enter save  esc cancel",
        Mode::Filter => "up/down row  space toggle  type to search  del clear  esc done",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::filter::window_label;

    #[test]
    fn window_labels_cover_filter_rows() {
        assert_eq!(filter_row_count(), 7);
        for w in TIME_WINDOWS {
            assert!(window_label(w).contains("week"));
        }
    }
}
