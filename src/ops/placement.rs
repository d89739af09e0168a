use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::model::board::DayOrder;
use crate::model::config::LayoutConfig;
use crate::model::task::Task;
use crate::ops::store_ops::{self, StoreError};

// ---------------------------------------------------------------------------
// Day membership & ordering
// ---------------------------------------------------------------------------

/// Tasks visible on `day`, in stacking order.
///
/// Membership is `start <= day <= end`. If the day has a manual order, tasks
/// appear in that order with new arrivals appended in discovery order; stale
/// overlay ids are skipped. Without an order, natural collection order is
/// used.
pub fn tasks_on_day<'a>(tasks: &'a [Task], day: NaiveDate, order: &DayOrder) -> Vec<&'a Task> {
    let on_day: Vec<&Task> = tasks.iter().filter(|t| t.is_on_day(day)).collect();

    let Some(manual) = order.get(&day).filter(|o| !o.is_empty()) else {
        return on_day;
    };

    let mut remaining: Vec<&Task> = on_day;
    let mut ordered = Vec::with_capacity(remaining.len());
    for id in manual {
        if let Some(pos) = remaining.iter().position(|t| &t.id == id) {
            ordered.push(remaining.remove(pos));
        }
    }
    ordered.extend(remaining);
    ordered
}

/// Ids of the tasks on each day of the visible grid, in natural order.
pub fn per_day_ids(
    tasks: &[Task],
    days: impl IntoIterator<Item = NaiveDate>,
) -> IndexMap<NaiveDate, Vec<String>> {
    let mut map = IndexMap::new();
    for day in days {
        let ids: Vec<String> = tasks
            .iter()
            .filter(|t| t.is_on_day(day))
            .map(|t| t.id.clone())
            .collect();
        map.insert(day, ids);
    }
    map
}

/// Reconcile the manual order overlay against the current per-day task sets.
///
/// For each visible day: keep only ids still on the day (in their existing
/// order), then append newly discovered ids in discovery order. Days absent
/// from the visible grid are dropped. Returns true if anything changed.
pub fn reconcile_day_order(order: &mut DayOrder, visible: &IndexMap<NaiveDate, Vec<String>>) -> bool {
    let mut changed = false;

    for (day, ids) in visible {
        let existing = order.get(day).cloned().unwrap_or_default();
        let mut combined: Vec<String> = existing
            .iter()
            .filter(|id| ids.contains(id))
            .cloned()
            .collect();
        for id in ids {
            if !combined.contains(id) {
                combined.push(id.clone());
            }
        }
        if combined != existing {
            order.insert(*day, combined);
            changed = true;
        }
    }

    let before = order.len();
    order.retain(|day, _| visible.contains_key(day));
    if order.len() != before {
        changed = true;
    }

    changed
}

// ---------------------------------------------------------------------------
// Chip geometry
// ---------------------------------------------------------------------------

/// Pixel placement of one chip within its day cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChipLayout {
    /// Vertical offset from the top of the day cell.
    pub top_offset: f64,
    /// Horizontal span the chip reserves.
    pub width: f64,
}

/// Layout for the chips *starting* on a day.
///
/// `ordered` is the full on-day list from [`tasks_on_day`]. Chips whose span
/// started on an earlier day stack above and count into the offset of every
/// chip anchored here, so no two same-day chips overlap.
pub fn chips_starting_on_day<'a>(
    ordered: &[&'a Task],
    day: NaiveDate,
    layout: &LayoutConfig,
) -> Vec<(&'a Task, ChipLayout)> {
    let starts_here: Vec<&Task> = ordered.iter().copied().filter(|t| t.start == day).collect();
    let carryover = (ordered.len() - starts_here.len()) as f64;
    let slot = layout.task_height + layout.stack_gap;

    starts_here
        .iter()
        .enumerate()
        .map(|(index, task)| {
            let inset = if task.is_single_day() {
                layout.single_day_inset
            } else {
                layout.span_inset
            };
            let chip = ChipLayout {
                top_offset: (index as f64 + 1.0 + carryover) * slot,
                width: task.width - inset,
            };
            (*task, chip)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Reorder drops
// ---------------------------------------------------------------------------

/// dnd array-move: remove at `from`, insert at `to`.
fn array_move(list: &mut Vec<String>, from: usize, to: usize) {
    let item = list.remove(from);
    let to = to.min(list.len());
    list.insert(to, item);
}

/// A dragged chip dropped onto another chip.
///
/// Same-day drop reorders only the overlay (dates untouched). Cross-day drop
/// shifts the whole range by the day delta, removes the id from the source
/// overlay, and inserts it immediately before the target id in the target
/// overlay.
pub fn drop_on_chip(
    tasks: &mut [Task],
    order: &mut DayOrder,
    moving_id: &str,
    source_day: NaiveDate,
    target_day: NaiveDate,
    target_id: &str,
) -> Result<(), StoreError> {
    if store_ops::find_task(tasks, moving_id).is_none() {
        return Err(StoreError::NotFound(moving_id.to_string()));
    }

    if source_day == target_day {
        if let Some(day_list) = order.get_mut(&source_day) {
            let from = day_list.iter().position(|id| id == moving_id);
            let to = day_list.iter().position(|id| id == target_id);
            if let (Some(from), Some(to)) = (from, to) {
                array_move(day_list, from, to);
            }
        }
        return Ok(());
    }

    let delta = (target_day - source_day).num_days();
    store_ops::shift_task(tasks, moving_id, delta)?;

    if let Some(src) = order.get_mut(&source_day) {
        src.retain(|id| id != moving_id);
    }
    let tgt = order.entry(target_day).or_default();
    tgt.retain(|id| id != moving_id);
    let at = tgt
        .iter()
        .position(|id| id == target_id)
        .unwrap_or(tgt.len());
    tgt.insert(at, moving_id.to_string());
    Ok(())
}

/// A dragged chip dropped onto an empty day cell: shift the range by the day
/// delta and append the id to the end of the target day's overlay.
pub fn drop_on_day(
    tasks: &mut [Task],
    order: &mut DayOrder,
    moving_id: &str,
    source_day: NaiveDate,
    target_day: NaiveDate,
) -> Result<(), StoreError> {
    let delta = (target_day - source_day).num_days();
    store_ops::shift_task(tasks, moving_id, delta)?;

    if let Some(src) = order.get_mut(&source_day) {
        src.retain(|id| id != moving_id);
    }
    let tgt = order.entry(target_day).or_default();
    if !tgt.iter().any(|id| id == moving_id) {
        tgt.push(moving_id.to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::store_ops::{create_task_on_day, update_range};

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn layout() -> LayoutConfig {
        LayoutConfig::default()
    }

    /// Three tasks: task-1 spans 06-03..06-05, task-2 and task-3 on 06-04.
    fn sample_tasks() -> Vec<Task> {
        let mut tasks = Vec::new();
        create_task_on_day(&mut tasks, day("2024-06-03"), 120.0);
        create_task_on_day(&mut tasks, day("2024-06-04"), 120.0);
        create_task_on_day(&mut tasks, day("2024-06-04"), 120.0);
        update_range(&mut tasks, "task-1", day("2024-06-03"), day("2024-06-05")).unwrap();
        tasks
    }

    #[test]
    fn membership_is_inclusive_range() {
        let tasks = sample_tasks();
        let order = DayOrder::new();

        let on = |d: &str| -> Vec<String> {
            tasks_on_day(&tasks, day(d), &order)
                .iter()
                .map(|t| t.id.clone())
                .collect()
        };

        assert_eq!(on("2024-06-02"), Vec::<String>::new());
        assert_eq!(on("2024-06-03"), vec!["task-1"]);
        assert_eq!(on("2024-06-04"), vec!["task-1", "task-2", "task-3"]);
        assert_eq!(on("2024-06-05"), vec!["task-1"]);
        assert_eq!(on("2024-06-06"), Vec::<String>::new());
    }

    #[test]
    fn manual_order_applies_with_new_arrivals_appended() {
        let tasks = sample_tasks();
        let mut order = DayOrder::new();
        // manual order knows task-3 and task-1 only; task-2 is a new arrival
        order.insert(
            day("2024-06-04"),
            vec!["task-3".to_string(), "task-1".to_string()],
        );

        let ids: Vec<&str> = tasks_on_day(&tasks, day("2024-06-04"), &order)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["task-3", "task-1", "task-2"]);
    }

    #[test]
    fn stale_overlay_ids_are_skipped() {
        let tasks = sample_tasks();
        let mut order = DayOrder::new();
        order.insert(
            day("2024-06-03"),
            vec!["task-99".to_string(), "task-1".to_string()],
        );

        let ids: Vec<&str> = tasks_on_day(&tasks, day("2024-06-03"), &order)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["task-1"]);
    }

    #[test]
    fn reconcile_prunes_appends_and_drops_days() {
        let tasks = sample_tasks();
        let mut order = DayOrder::new();
        order.insert(
            day("2024-06-04"),
            vec!["task-3".to_string(), "task-gone".to_string()],
        );
        order.insert(day("2020-01-01"), vec!["task-1".to_string()]);

        let visible = per_day_ids(
            &tasks,
            (0..7).map(|i| day("2024-06-02") + chrono::Duration::days(i)),
        );
        let changed = reconcile_day_order(&mut order, &visible);
        assert!(changed);

        // pruned stale id, appended arrivals in discovery order
        assert_eq!(
            order.get(&day("2024-06-04")).unwrap(),
            &vec![
                "task-3".to_string(),
                "task-1".to_string(),
                "task-2".to_string()
            ]
        );
        // day outside the visible grid dropped
        assert!(!order.contains_key(&day("2020-01-01")));

        // invariant: overlays only name tasks currently on that day
        for (d, ids) in &order {
            for id in ids {
                assert!(tasks.iter().any(|t| &t.id == id && t.is_on_day(*d)));
            }
        }

        // reconciling again is a no-op
        assert!(!reconcile_day_order(&mut order, &visible));
    }

    #[test]
    fn offsets_stack_below_carryover_spans() {
        let tasks = sample_tasks();
        let order = DayOrder::new();
        let cfg = layout();
        let slot = cfg.task_height + cfg.stack_gap; // 33

        // 06-04: task-1 carries over, task-2 and task-3 start here
        let on_day = tasks_on_day(&tasks, day("2024-06-04"), &order);
        let chips = chips_starting_on_day(&on_day, day("2024-06-04"), &cfg);
        assert_eq!(chips.len(), 2);
        assert_eq!(chips[0].0.id, "task-2");
        assert_eq!(chips[0].1.top_offset, 2.0 * slot); // index 0 + 1 + 1 carryover
        assert_eq!(chips[1].1.top_offset, 3.0 * slot);
        // offsets never collide
        assert_ne!(chips[0].1.top_offset, chips[1].1.top_offset);
    }

    #[test]
    fn chip_widths_distinguish_spans_from_single_days() {
        let tasks = sample_tasks();
        let order = DayOrder::new();
        let cfg = layout();

        let on_start = tasks_on_day(&tasks, day("2024-06-03"), &order);
        let span_chips = chips_starting_on_day(&on_start, day("2024-06-03"), &cfg);
        // task-1 spans 3 days: width 360 - span inset 20
        assert_eq!(span_chips[0].1.width, 340.0);

        let on_mid = tasks_on_day(&tasks, day("2024-06-04"), &order);
        let single_chips = chips_starting_on_day(&on_mid, day("2024-06-04"), &cfg);
        // single-day chips: width 120 - single-day inset 30
        assert_eq!(single_chips[0].1.width, 90.0);
    }

    #[test]
    fn same_day_drop_reorders_overlay_only() {
        let mut tasks = sample_tasks();
        let mut order = DayOrder::new();
        order.insert(
            day("2024-06-04"),
            vec![
                "task-1".to_string(),
                "task-2".to_string(),
                "task-3".to_string(),
            ],
        );

        let before: Vec<(NaiveDate, NaiveDate)> =
            tasks.iter().map(|t| (t.start, t.end)).collect();

        drop_on_chip(
            &mut tasks,
            &mut order,
            "task-3",
            day("2024-06-04"),
            day("2024-06-04"),
            "task-1",
        )
        .unwrap();

        assert_eq!(
            order.get(&day("2024-06-04")).unwrap(),
            &vec![
                "task-3".to_string(),
                "task-1".to_string(),
                "task-2".to_string()
            ]
        );
        let after: Vec<(NaiveDate, NaiveDate)> = tasks.iter().map(|t| (t.start, t.end)).collect();
        assert_eq!(before, after); // dates untouched
    }

    #[test]
    fn cross_day_drop_shifts_range_and_inserts_before_target() {
        let mut tasks = sample_tasks();
        let mut order = DayOrder::new();
        order.insert(day("2024-06-04"), vec!["task-2".to_string()]);
        order.insert(day("2024-06-10"), vec!["task-4x".to_string()]);

        // move task-2 from 06-04 onto the chip "task-4x" on 06-10
        // (target overlay id need not resolve to a live task for insertion)
        drop_on_chip(
            &mut tasks,
            &mut order,
            "task-2",
            day("2024-06-04"),
            day("2024-06-10"),
            "task-4x",
        )
        .unwrap();

        let moved = tasks.iter().find(|t| t.id == "task-2").unwrap();
        assert_eq!(moved.start, day("2024-06-10"));
        assert_eq!(moved.end, day("2024-06-10"));
        assert!(order.get(&day("2024-06-04")).unwrap().is_empty());
        assert_eq!(
            order.get(&day("2024-06-10")).unwrap(),
            &vec!["task-2".to_string(), "task-4x".to_string()]
        );
    }

    #[test]
    fn empty_day_drop_appends_and_shifts() {
        let mut tasks = sample_tasks();
        let mut order = DayOrder::new();
        order.insert(day("2024-06-03"), vec!["task-1".to_string()]);

        drop_on_day(
            &mut tasks,
            &mut order,
            "task-1",
            day("2024-06-03"),
            day("2024-06-17"),
        )
        .unwrap();

        let moved = tasks.iter().find(|t| t.id == "task-1").unwrap();
        // span preserved: was 06-03..06-05
        assert_eq!(moved.start, day("2024-06-17"));
        assert_eq!(moved.end, day("2024-06-19"));
        assert_eq!(
            order.get(&day("2024-06-17")).unwrap(),
            &vec!["task-1".to_string()]
        );
    }
}
