use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pb", about = concat!("[#] planboard v", env!("CARGO_PKG_VERSION"), " - a month-grid task board"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different board directory
    #[arg(short = 'C', long = "board-dir", global = true)]
    pub board_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new board in the current directory
    Init(InitArgs),
    /// Add a task on a day
    Add(AddArgs),
    /// List tasks
    List(ListArgs),
    /// Show the tasks stacked on one day
    Day(DayArgs),
    /// Show task details
    Show(ShowArgs),
    /// Change task status
    Status(StatusArgs),
    /// Rename a task
    Title(TitleArgs),
    /// Move a task by whole days
    Mv(MvArgs),
    /// Move one edge of a task's range
    Resize(ResizeArgs),
    /// Search tasks by regex
    Search(SearchArgs),
}

// ---------------------------------------------------------------------------
// Command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Board name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Reinitialize even if board/ already exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Day the task starts and ends on (YYYY-MM-DD)
    pub day: String,
    /// Task name
    pub name: String,
    /// Initial status (to-do, in-progress, review, completed)
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Filter by status (repeatable)
    #[arg(long)]
    pub status: Vec<String>,
    /// Filter to tasks due within N days of today (7, 14, or 21)
    #[arg(long)]
    pub due_within: Option<i64>,
    /// Filter by case-insensitive substring of name or title
    #[arg(long)]
    pub text: Option<String>,
}

#[derive(Args)]
pub struct DayArgs {
    /// Day to inspect (YYYY-MM-DD)
    pub date: String,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Task ID (task-N)
    pub id: String,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Task ID
    pub id: String,
    /// New status (to-do, in-progress, review, completed)
    pub status: String,
}

#[derive(Args)]
pub struct TitleArgs {
    /// Task ID
    pub id: String,
    /// New name
    pub name: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// Task ID
    pub id: String,
    /// Days to shift by (negative = earlier)
    #[arg(allow_hyphen_values = true)]
    pub delta_days: i64,
}

#[derive(Args)]
pub struct ResizeArgs {
    /// Task ID
    pub id: String,
    /// Which edge to move (left, right)
    pub edge: String,
    /// Days to move the edge by (negative = earlier)
    #[arg(allow_hyphen_values = true)]
    pub delta_days: i64,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Regex pattern
    pub pattern: String,
}
