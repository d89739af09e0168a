use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::board_io;
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::watcher::BoardWatcher;
use crate::model::board::Board;
use crate::model::config::BoardConfig;
use crate::model::task::{Task, TaskStatus};
use crate::ops::gesture::{ChipGesture, Feedback, GestureKind};
use crate::ops::{date_ops, filter_ops, placement};

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Dragging the selected chip to another day
    Move,
    /// Dragging one edge of the selected chip
    Resize,
    /// Restacking chips within the cursor day
    Reorder,
    /// Name/status modal for one task
    Edit,
    /// Filter panel
    Filter,
}

/// Main application state
pub struct App {
    pub board_dir: PathBuf,
    pub config: BoardConfig,
    pub theme: Theme,
    /// Task store, day-order overlay, and active filters
    pub board: Board,
    /// First day of the month being viewed
    pub month: NaiveDate,
    pub cursor_day: NaiveDate,
    /// Index into the cursor day's visible stack
    pub chip_cursor: usize,
    pub mode: Mode,
    pub should_quit: bool,
    /// Drag/resize state machine for the grabbed chip
    pub gesture: ChipGesture,
    /// Id of the chip a gesture is acting on
    pub gesture_task: Option<String>,
    /// What the active gesture is doing
    pub gesture_kind: GestureKind,
    /// Live feedback from the last gesture frame
    pub gesture_feedback: Option<Feedback>,
    /// Task the edit modal is open for
    pub edit_task: Option<String>,
    pub edit_buffer: String,
    pub edit_status: TaskStatus,
    pub edit_error: Option<String>,
    /// Row selected in the filter panel
    pub filter_cursor: usize,
    /// Transient message for the status row
    pub status_line: Option<String>,
    pub watcher: Option<BoardWatcher>,
}

impl App {
    pub fn new(board_dir: PathBuf, config: BoardConfig, tasks: Vec<Task>) -> Self {
        let theme = Theme::from_config(&config.ui);
        let today = chrono::Local::now().date_naive();
        let gesture = ChipGesture::new(config.layout.clone());
        App {
            board_dir,
            config,
            theme,
            board: Board::new(tasks),
            month: date_ops::month_start(today),
            cursor_day: today,
            chip_cursor: 0,
            mode: Mode::Navigate,
            should_quit: false,
            gesture,
            gesture_task: None,
            gesture_kind: GestureKind::Drag,
            gesture_feedback: None,
            edit_task: None,
            edit_buffer: String::new(),
            edit_status: TaskStatus::ToDo,
            edit_error: None,
            filter_cursor: 0,
            status_line: None,
            watcher: None,
        }
    }

    pub fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    /// Ids of the tasks passing the active filters.
    fn visible_ids(&self) -> Vec<String> {
        filter_ops::visible_tasks(&self.board.tasks, &self.board.filters, self.today())
            .iter()
            .map(|t| t.id.clone())
            .collect()
    }

    /// The visible stack on `day`, in manual order, filters applied.
    pub fn ordered_on_day(&self, day: NaiveDate) -> Vec<&Task> {
        let visible = self.visible_ids();
        placement::tasks_on_day(&self.board.tasks, day, &self.board.day_order)
            .into_iter()
            .filter(|t| visible.contains(&t.id))
            .collect()
    }

    /// The chip under the cursor, if any.
    pub fn selected_task_id(&self) -> Option<String> {
        self.ordered_on_day(self.cursor_day)
            .get(self.chip_cursor)
            .map(|t| t.id.clone())
    }

    pub fn find_task(&self, id: &str) -> Option<&Task> {
        self.board.tasks.iter().find(|t| t.id == id)
    }

    /// Keep the chip cursor inside the cursor day's stack.
    pub fn clamp_chip_cursor(&mut self) {
        let len = self.ordered_on_day(self.cursor_day).len();
        if len == 0 {
            self.chip_cursor = 0;
        } else if self.chip_cursor >= len {
            self.chip_cursor = len - 1;
        }
    }

    /// Rebuild the manual-order overlay against the visible grid.
    pub fn reconcile(&mut self) {
        let days = date_ops::weeks_in_month(self.month)
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();
        let visible = placement::per_day_ids(&self.board.tasks, days);
        placement::reconcile_day_order(&mut self.board.day_order, &visible);
    }

    /// Switch the viewed month if the cursor walked off the current grid.
    pub fn follow_cursor(&mut self) {
        let weeks = date_ops::weeks_in_month(self.month);
        let grid_start = weeks[0][0];
        let grid_end = weeks[weeks.len() - 1][6];
        if self.cursor_day < grid_start || self.cursor_day > grid_end {
            self.month = date_ops::month_start(self.cursor_day);
            self.reconcile();
        }
        self.clamp_chip_cursor();
    }

    pub fn save_tasks(&mut self) {
        if let Err(e) = board_io::save_tasks(&self.board_dir, &self.board.tasks) {
            self.status_line = Some(format!("save failed: {}", e));
        }
    }

    /// Pick up external edits to tasks.json or board.toml.
    pub fn reload_from_disk(&mut self) {
        self.board.tasks = board_io::load_tasks(&self.board_dir);
        if let Ok(config) = board_io::load_config(&self.board_dir) {
            self.theme = Theme::from_config(&config.ui);
            self.config = config;
            self.gesture = ChipGesture::new(self.config.layout.clone());
        }
        self.reconcile();
        self.clamp_chip_cursor();
    }
}

/// Restore UI state from .state.json
pub fn restore_ui_state(app: &mut App) {
    let Some(ui_state) = read_ui_state(&app.board_dir) else {
        return;
    };
    if let Some(month) = ui_state.month {
        app.month = date_ops::month_start(month);
    }
    if let Some(day) = ui_state.cursor_day {
        app.cursor_day = day;
    }
    app.board.day_order = ui_state.day_order;
    app.board.filters = ui_state.filters;
}

/// Save UI state to .state.json
pub fn save_ui_state(app: &App) {
    let ui_state = UiState {
        month: Some(app.month),
        cursor_day: Some(app.cursor_day),
        day_order: app.board.day_order.clone(),
        filters: app.board.filters.clone(),
    };
    let _ = write_ui_state(&app.board_dir, &ui_state);
}

/// Run the TUI application
pub fn run(board_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let start = match board_dir {
        Some(dir) => std::fs::canonicalize(dir)?,
        None => std::env::current_dir()?,
    };
    let root = board_io::discover_board(&start)?;
    let board_dir = root.join("board");
    let config = board_io::load_config(&board_dir)?;
    let tasks = board_io::load_tasks(&board_dir);

    let mut app = App::new(board_dir, config, tasks);
    restore_ui_state(&mut app);
    app.reconcile();
    app.clamp_chip_cursor();
    app.watcher = BoardWatcher::start(&app.board_dir).ok();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Run event loop
    let result = run_event_loop(&mut terminal, &mut app);

    // Save UI state before exit
    save_ui_state(&app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut save_counter = 0u32;
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        // External file changes only land between interactions
        if app.mode == Mode::Navigate
            && let Some(watcher) = &app.watcher
            && !watcher.poll().is_empty()
        {
            app.reload_from_disk();
        }

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
            // Debounced state save: every ~5 key presses
            save_counter += 1;
            if save_counter >= 5 {
                save_ui_state(app);
                save_counter = 0;
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
