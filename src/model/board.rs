use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::model::filter::FilterState;
use crate::model::task::Task;

/// Manual stacking order within a day: day -> task ids, top to bottom.
///
/// Holds only ids currently on that day; reconciled (never rebuilt) when the
/// per-day task sets change, so unrelated chips keep their positions.
pub type DayOrder = IndexMap<NaiveDate, Vec<String>>;

/// Process-wide board state: the task store, the per-day ordering overlay,
/// and the active filters. Owned by one controller and passed by reference
/// to every operation; there is no global state.
#[derive(Debug, Clone, Default)]
pub struct Board {
    pub tasks: Vec<Task>,
    pub day_order: DayOrder,
    pub filters: FilterState,
}

impl Board {
    pub fn new(tasks: Vec<Task>) -> Self {
        Board {
            tasks,
            day_order: DayOrder::new(),
            filters: FilterState::default(),
        }
    }
}
