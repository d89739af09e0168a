use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::model::config::LayoutConfig;
use crate::model::task::Task;
use crate::ops::date_ops::{days_from_sunday, days_to_saturday, week_end, week_start};

/// Phase of a pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Start,
    Move,
    End,
}

/// Which edge a resize gesture grabs. Left changes `start`, right changes
/// `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
}

/// What kind of gesture is being performed on a chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    Resize(Edge),
}

/// One frame of a toolkit-independent gesture stream. Deltas are pixels
/// relative to the previous frame.
#[derive(Debug, Clone, Copy)]
pub struct GestureEvent {
    pub kind: GestureKind,
    pub phase: GesturePhase,
    pub delta_x: f64,
    pub delta_y: f64,
}

/// Visual feedback for an in-flight gesture. Never touches the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Feedback {
    /// Drag in progress: translate the chip by the accumulated delta.
    Translate { x: f64, y: f64 },
    /// Resize in progress: draw the chip at this width.
    Width(f64),
}

/// The committed result of a finished gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeCommit {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub width: f64,
}

/// What a gesture frame produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureUpdate {
    /// Live feedback only; nothing committed.
    Live(Feedback),
    /// Gesture ended: commit this range to the store and reset the visual
    /// transform.
    Commit(RangeCommit),
    /// Gesture ended without a range change (refused growth or a no-op).
    Reset,
}

/// Snapshot of the task taken when a gesture starts. All commit math is
/// relative to this, never to intermediate frames.
#[derive(Debug, Clone, Copy)]
struct Baseline {
    start: NaiveDate,
    end: NaiveDate,
    width: f64,
    single_day_width: f64,
}

impl Baseline {
    fn of(task: &Task) -> Self {
        Baseline {
            start: task.start,
            end: task.end,
            width: task.width,
            single_day_width: task.single_day_width,
        }
    }

    fn days(&self) -> i64 {
        (self.width / self.single_day_width).round().max(1.0) as i64
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    Idle,
    Dragging {
        total_x: f64,
        total_y: f64,
    },
    Resizing {
        edge: Edge,
        /// Raw tracked rect width; commit math sees this.
        rect_width: f64,
        /// Last width shown on screen; frozen while a frame overshoots the
        /// week cap.
        visual_width: f64,
    },
}

/// Per-chip drag/resize state machine: `Idle -> Dragging -> Idle` and
/// `Idle -> Resizing(edge) -> Idle`. Intermediate frames only produce visual
/// feedback; the store is touched exactly once, at gesture end.
#[derive(Debug)]
pub struct ChipGesture {
    state: State,
    baseline: Option<Baseline>,
    layout: LayoutConfig,
}

impl ChipGesture {
    pub fn new(layout: LayoutConfig) -> Self {
        ChipGesture {
            state: State::Idle,
            baseline: None,
            layout,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, State::Idle)
    }

    /// Feed one gesture frame for `task`. Start snapshots the baseline (a
    /// start while active restarts the gesture).
    pub fn handle(&mut self, task: &Task, event: GestureEvent) -> Option<GestureUpdate> {
        match event.phase {
            GesturePhase::Start => {
                let baseline = Baseline::of(task);
                self.state = match event.kind {
                    GestureKind::Drag => State::Dragging {
                        total_x: 0.0,
                        total_y: 0.0,
                    },
                    GestureKind::Resize(edge) => State::Resizing {
                        edge,
                        rect_width: baseline.width,
                        visual_width: baseline.width,
                    },
                };
                self.baseline = Some(baseline);
                None
            }
            GesturePhase::Move => self.on_move(event),
            GesturePhase::End => self.on_end(),
        }
    }

    fn on_move(&mut self, event: GestureEvent) -> Option<GestureUpdate> {
        let baseline = self.baseline?;
        match &mut self.state {
            State::Idle => None,
            State::Dragging { total_x, total_y } => {
                *total_x += event.delta_x;
                *total_y += event.delta_y;
                Some(GestureUpdate::Live(Feedback::Translate {
                    x: *total_x,
                    y: *total_y,
                }))
            }
            State::Resizing {
                edge,
                rect_width,
                visual_width,
            } => {
                // Dragging the left edge leftwards widens the rect.
                let candidate = match edge {
                    Edge::Left => *rect_width - event.delta_x,
                    Edge::Right => *rect_width + event.delta_x,
                };
                *rect_width = candidate.max(0.0);

                // A frame past the week boundary of the un-moved edge shows
                // nothing new; the row layout cannot take a chip wider than
                // the remaining cells in this week. The raw rect still
                // tracks, and the commit clamps it.
                let sdw = baseline.single_day_width;
                let cap = match edge {
                    Edge::Right => days_to_saturday(baseline.start) as f64 * sdw,
                    Edge::Left => days_from_sunday(baseline.end) as f64 * sdw,
                };
                if *rect_width <= cap {
                    *visual_width = *rect_width;
                }

                // Below one day-cell the chip floors at the single-day size.
                let visual = if *visual_width < sdw {
                    sdw - self.layout.single_day_inset
                } else {
                    *visual_width
                };
                Some(GestureUpdate::Live(Feedback::Width(visual)))
            }
        }
    }

    fn on_end(&mut self) -> Option<GestureUpdate> {
        let baseline = self.baseline.take()?;
        let state = std::mem::replace(&mut self.state, State::Idle);
        match state {
            State::Idle => None,
            State::Dragging { total_x, total_y } => {
                Some(GestureUpdate::Commit(drag_commit(&baseline, total_x, total_y, &self.layout)))
            }
            State::Resizing {
                edge, rect_width, ..
            } => Some(resize_commit(&baseline, edge, rect_width, &self.layout)),
        }
    }
}

/// Translate accumulated drag deltas into a whole-range shift.
///
/// Cells moved round toward zero, so a wander of less than one cell width
/// (or one row height) snaps back to the origin. One row is one week.
fn drag_commit(baseline: &Baseline, total_x: f64, total_y: f64, layout: &LayoutConfig) -> RangeCommit {
    let day_width = baseline.width / baseline.days() as f64;
    let delta_days = (total_x / day_width).trunc() as i64;
    let delta_rows = (total_y / layout.row_height).trunc() as i64;
    let shift = Duration::days(delta_days + delta_rows * 7);
    RangeCommit {
        start: baseline.start + shift,
        end: baseline.end + shift,
        width: baseline.width,
    }
}

fn resize_commit(
    baseline: &Baseline,
    edge: Edge,
    rect_width: f64,
    layout: &LayoutConfig,
) -> GestureUpdate {
    let sdw = baseline.single_day_width;
    let base_days = baseline.days();

    if rect_width < baseline.width {
        // Shrinking: snap up to whole cells, floor at one.
        let snapped_days = ((rect_width / sdw).ceil()).max(1.0) as i64;
        let removed = base_days - snapped_days;
        if removed <= 0 {
            return GestureUpdate::Reset;
        }
        let (start, end) = match edge {
            Edge::Left => {
                let moved = baseline.start + Duration::days(removed);
                // An inverted range collapses to a single day at the
                // un-moved edge.
                (moved.min(baseline.end), baseline.end)
            }
            Edge::Right => {
                let moved = baseline.end - Duration::days(removed);
                (baseline.start, moved.max(baseline.start))
            }
        };
        let span = (end - start).num_days() + 1;
        GestureUpdate::Commit(RangeCommit {
            start,
            end,
            width: span as f64 * sdw,
        })
    } else if rect_width > baseline.width {
        // Growing is refused outright when the anchor already sits on the
        // boundary being grown toward; committing would ask the grid for a
        // row it has not laid out yet.
        match edge {
            Edge::Left if baseline.start.weekday() == Weekday::Sun => {
                return GestureUpdate::Reset;
            }
            Edge::Right if baseline.end.weekday() == Weekday::Sat => {
                return GestureUpdate::Reset;
            }
            _ => {}
        }

        let snapped_days = (((rect_width - layout.span_inset) / sdw).ceil()).max(1.0) as i64;
        let added = snapped_days - base_days;
        if added <= 0 {
            return GestureUpdate::Reset;
        }
        // Growth never crosses the week boundary of the baseline start in
        // a single gesture.
        let (start, end) = match edge {
            Edge::Left => {
                let moved = baseline.start - Duration::days(added);
                (moved.max(week_start(baseline.start)).min(baseline.start), baseline.end)
            }
            Edge::Right => {
                let moved = baseline.end + Duration::days(added);
                (baseline.start, moved.min(week_end(baseline.start)).max(baseline.end))
            }
        };
        let span = (end - start).num_days() + 1;
        GestureUpdate::Commit(RangeCommit {
            start,
            end,
            width: span as f64 * sdw,
        })
    } else {
        GestureUpdate::Reset
    }
}
