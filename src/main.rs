use clap::Parser;
use planboard::cli::commands::Cli;
use planboard::cli::handlers;

fn main() {
    let cli = Cli::parse();
    let board_dir = cli.board_dir.clone();

    match cli.command {
        None => {
            // No subcommand → launch TUI
            if let Err(e) = planboard::tui::run(board_dir.as_deref()) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
