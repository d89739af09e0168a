use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::config::BoardConfig;
use crate::model::task::Task;

pub const CONFIG_FILE: &str = "board.toml";
pub const TASKS_FILE: &str = "tasks.json";

/// Error type for board I/O operations
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("not a planboard directory: no board/ directory found")]
    NotABoard,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse board.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not serialize board.toml: {0}")]
    ConfigSerializeError(#[from] toml::ser::Error),
    #[error("could not serialize tasks: {0}")]
    TasksSerializeError(#[from] serde_json::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Discover the board by walking up from the given directory, looking for a
/// `board/` subdirectory with a `board.toml`. Returns the directory
/// containing `board/`.
pub fn discover_board(start: &Path) -> Result<PathBuf, BoardError> {
    let mut current = start.to_path_buf();
    loop {
        let board_dir = current.join("board");
        if board_dir.is_dir() && board_dir.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(BoardError::NotABoard);
        }
    }
}

/// Read and parse `board.toml`.
pub fn load_config(board_dir: &Path) -> Result<BoardConfig, BoardError> {
    let path = board_dir.join(CONFIG_FILE);
    let text = fs::read_to_string(&path).map_err(|e| BoardError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    Ok(toml::from_str(&text)?)
}

/// Load the task list from `tasks.json`. A missing or unparseable file is an
/// empty list, never an error surfaced to the user.
pub fn load_tasks(board_dir: &Path) -> Vec<Task> {
    let path = board_dir.join(TASKS_FILE);
    let Ok(text) = fs::read_to_string(&path) else {
        return Vec::new();
    };
    serde_json::from_str(&text).unwrap_or_default()
}

/// Write the full task list as JSON, atomically (write-to-temp + rename),
/// so a crash mid-write never leaves a truncated store behind.
pub fn save_tasks(board_dir: &Path, tasks: &[Task]) -> Result<(), BoardError> {
    let content = serde_json::to_string_pretty(tasks)?;
    atomic_write(&board_dir.join(TASKS_FILE), content.as_bytes())?;
    Ok(())
}

fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Scaffold a new board directory under `root`. Fails if one already exists
/// unless `force` is set.
pub fn init_board(root: &Path, name: &str, force: bool) -> Result<PathBuf, BoardError> {
    let board_dir = root.join("board");
    if board_dir.join(CONFIG_FILE).exists() && !force {
        return Err(BoardError::IoError(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "board already initialized (use --force to reinitialize)",
        )));
    }
    fs::create_dir_all(&board_dir)?;

    let mut config = BoardConfig::default();
    config.board.name = name.to_string();
    let text = toml::to_string_pretty(&config)?;
    fs::write(board_dir.join(CONFIG_FILE), text)?;
    save_tasks(&board_dir, &[])?;
    Ok(board_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::store_ops::create_task_on_day;
    use tempfile::TempDir;

    #[test]
    fn init_then_discover() {
        let tmp = TempDir::new().unwrap();
        init_board(tmp.path(), "team", false).unwrap();

        let root = discover_board(tmp.path()).unwrap();
        assert_eq!(root, tmp.path());

        // discover from a nested directory
        let sub = tmp.path().join("a/b");
        fs::create_dir_all(&sub).unwrap();
        let root = discover_board(&sub).unwrap();
        assert_eq!(root, tmp.path());

        let config = load_config(&tmp.path().join("board")).unwrap();
        assert_eq!(config.board.name, "team");
        assert_eq!(config.layout.cell_width, 120.0);
    }

    #[test]
    fn init_twice_requires_force() {
        let tmp = TempDir::new().unwrap();
        init_board(tmp.path(), "one", false).unwrap();
        assert!(init_board(tmp.path(), "two", false).is_err());
        init_board(tmp.path(), "two", true).unwrap();
        let config = load_config(&tmp.path().join("board")).unwrap();
        assert_eq!(config.board.name, "two");
    }

    #[test]
    fn discover_fails_outside_a_board() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            discover_board(tmp.path()),
            Err(BoardError::NotABoard)
        ));
    }

    #[test]
    fn tasks_round_trip() {
        let tmp = TempDir::new().unwrap();
        let board_dir = init_board(tmp.path(), "team", false).unwrap();

        let mut tasks = Vec::new();
        create_task_on_day(&mut tasks, "2024-06-03".parse().unwrap(), 120.0);
        create_task_on_day(&mut tasks, "2024-06-05".parse().unwrap(), 120.0);
        save_tasks(&board_dir, &tasks).unwrap();

        let loaded = load_tasks(&board_dir);
        assert_eq!(loaded, tasks);
    }

    #[test]
    fn missing_tasks_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(load_tasks(tmp.path()).is_empty());
    }

    #[test]
    fn malformed_tasks_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(TASKS_FILE), "not json {{{").unwrap();
        assert!(load_tasks(tmp.path()).is_empty());
    }
}
