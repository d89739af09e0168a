use std::path::PathBuf;
use std::sync::Mutex;

use regex::Regex;

/// Global override for board directory (set by -C flag)
static BOARD_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::board_io;
use crate::io::state;
use crate::model::config::BoardConfig;
use crate::model::filter::FilterState;
use crate::model::task::{Task, TaskStatus};
use crate::ops::{date_ops, filter_ops, placement, search, store_ops};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;

    // Store -C override for load_board_cwd()
    if let Some(ref dir) = cli.board_dir {
        let abs = std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?;
        BOARD_DIR_OVERRIDE.lock().unwrap().replace(abs);
    }

    match cli.command {
        None => unreachable!("no subcommand launches the TUI from main"),
        Some(cmd) => match cmd {
            // Init does not require an existing board
            Commands::Init(args) => cmd_init(args),

            // Read commands
            Commands::List(args) => cmd_list(args, json),
            Commands::Day(args) => cmd_day(args, json),
            Commands::Show(args) => cmd_show(args, json),
            Commands::Search(args) => cmd_search(args, json),

            // Write commands
            Commands::Add(args) => cmd_add(args, json),
            Commands::Status(args) => cmd_status(args),
            Commands::Title(args) => cmd_title(args),
            Commands::Mv(args) => cmd_mv(args),
            Commands::Resize(args) => cmd_resize(args),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct BoardCtx {
    board_dir: PathBuf,
    config: BoardConfig,
    tasks: Vec<Task>,
}

fn start_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    match BOARD_DIR_OVERRIDE.lock().unwrap().as_ref() {
        Some(dir) => Ok(dir.clone()),
        None => Ok(std::env::current_dir()?),
    }
}

fn load_board_cwd() -> Result<BoardCtx, Box<dyn std::error::Error>> {
    let root = board_io::discover_board(&start_dir()?)?;
    let board_dir = root.join("board");
    let config = board_io::load_config(&board_dir)?;
    let tasks = board_io::load_tasks(&board_dir);
    Ok(BoardCtx {
        board_dir,
        config,
        tasks,
    })
}

fn parse_day_arg(s: &str) -> Result<chrono::NaiveDate, Box<dyn std::error::Error>> {
    date_ops::parse_day(s).ok_or_else(|| format!("invalid date '{}' (expected YYYY-MM-DD)", s).into())
}

fn parse_status_arg(s: &str) -> Result<TaskStatus, Box<dyn std::error::Error>> {
    TaskStatus::from_label(s).ok_or_else(|| {
        format!(
            "unknown status '{}' (expected: to-do, in-progress, review, completed)",
            s
        )
        .into()
    })
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

pub fn cmd_init(args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let root = start_dir()?;
    let name = match args.name {
        Some(name) => name,
        None => root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("board")
            .to_string(),
    };
    let board_dir = board_io::init_board(&root, &name, args.force)?;
    println!("initialized board '{}' in {}", name, board_dir.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = load_board_cwd()?;

    let mut filters = FilterState::default();
    for s in &args.status {
        filters.statuses.insert(parse_status_arg(s)?);
    }
    if let Some(w) = args.due_within {
        if w <= 0 {
            return Err(format!("--due-within must be positive, got {}", w).into());
        }
        filters.windows.insert(w);
    }
    if let Some(text) = args.text {
        filters.query = text;
    }

    let today = chrono::Local::now().date_naive();
    let visible = filter_ops::visible_tasks(&ctx.tasks, &filters, today);

    if json {
        let out: Vec<TaskJson> = visible.iter().map(|t| task_to_json(t)).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for task in visible {
            println!("{}", format_task_line(task));
        }
    }
    Ok(())
}

fn cmd_day(args: DayArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = load_board_cwd()?;
    let day = parse_day_arg(&args.date)?;

    let day_order = state::read_ui_state(&ctx.board_dir)
        .map(|s| s.day_order)
        .unwrap_or_default();
    let ordered = placement::tasks_on_day(&ctx.tasks, day, &day_order);
    let chips = placement::chips_starting_on_day(&ordered, day, &ctx.config.layout);

    let with_geometry: Vec<(&Task, Option<placement::ChipLayout>)> = ordered
        .iter()
        .map(|t| {
            let chip = chips
                .iter()
                .find(|(ct, _)| ct.id == t.id)
                .map(|(_, chip)| *chip);
            (*t, chip)
        })
        .collect();

    if json {
        let out = DayJson {
            day: date_ops::format_day(day),
            tasks: with_geometry
                .iter()
                .enumerate()
                .map(|(position, (task, chip))| DayTaskJson {
                    task: task_to_json(task),
                    position,
                    top_offset: chip.map(|c| c.top_offset),
                    chip_width: chip.map(|c| c.width),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in format_day_listing(&date_ops::format_day(day), &with_geometry) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = load_board_cwd()?;
    let task = store_ops::find_task(&ctx.tasks, &args.id)
        .ok_or_else(|| format!("task not found: {}", args.id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(task))?);
    } else {
        for line in format_task_detail(task) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_search(args: SearchArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = load_board_cwd()?;
    let re = Regex::new(&args.pattern).map_err(|e| format!("invalid pattern: {}", e))?;
    let hits = search::search_tasks(&ctx.tasks, &re);

    if json {
        let out: Vec<SearchHitJson> = hits.iter().map(hit_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for hit in &hits {
            if let Some(task) = store_ops::find_task(&ctx.tasks, &hit.task_id) {
                println!("{}  ({})", format_task_line(task), hit.field.label());
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = load_board_cwd()?;
    let day = parse_day_arg(&args.day)?;
    let status = match args.status.as_deref() {
        Some(s) => parse_status_arg(s)?,
        None => TaskStatus::ToDo,
    };

    let id = store_ops::create_task_on_day(&mut ctx.tasks, day, ctx.config.layout.cell_width);
    store_ops::apply_modal_save(&mut ctx.tasks, &id, &args.name, status)?;
    board_io::save_tasks(&ctx.board_dir, &ctx.tasks)?;

    let task =
        store_ops::find_task(&ctx.tasks, &id).ok_or_else(|| format!("task not found: {}", id))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(task))?);
    } else {
        println!("{}", format_task_line(task));
    }
    Ok(())
}

fn cmd_status(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = load_board_cwd()?;
    let status = parse_status_arg(&args.status)?;
    store_ops::set_status(&mut ctx.tasks, &args.id, status)?;
    board_io::save_tasks(&ctx.board_dir, &ctx.tasks)?;
    println!("{} -> {}", args.id, status.label());
    Ok(())
}

fn cmd_title(args: TitleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = load_board_cwd()?;
    store_ops::rename_task(&mut ctx.tasks, &args.id, &args.name)?;
    board_io::save_tasks(&ctx.board_dir, &ctx.tasks)?;
    println!("{} -> {}", args.id, args.name);
    Ok(())
}

fn cmd_mv(args: MvArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = load_board_cwd()?;
    store_ops::shift_task(&mut ctx.tasks, &args.id, args.delta_days)?;
    board_io::save_tasks(&ctx.board_dir, &ctx.tasks)?;
    let task = store_ops::find_task(&ctx.tasks, &args.id)
        .ok_or_else(|| format!("task not found: {}", args.id))?;
    println!("{}", format_task_line(task));
    Ok(())
}

fn cmd_resize(args: ResizeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = load_board_cwd()?;
    let task = store_ops::find_task(&ctx.tasks, &args.id)
        .ok_or_else(|| format!("task not found: {}", args.id))?;

    let (start, end) = match args.edge.as_str() {
        "left" => (task.start + chrono::Duration::days(args.delta_days), task.end),
        "right" => (task.start, task.end + chrono::Duration::days(args.delta_days)),
        other => return Err(format!("unknown edge '{}' (expected: left, right)", other).into()),
    };

    store_ops::update_range(&mut ctx.tasks, &args.id, start, end)?;
    board_io::save_tasks(&ctx.board_dir, &ctx.tasks)?;
    let task = store_ops::find_task(&ctx.tasks, &args.id)
        .ok_or_else(|| format!("task not found: {}", args.id))?;
    println!("{}", format_task_line(task));
    Ok(())
}
