pub mod calendar;
pub mod clients;
pub mod commands;
pub mod config;
pub mod dates;
pub mod detail;
pub mod events;
pub mod logging;
pub mod models;
pub mod render;
pub mod state;
pub mod storage;
pub mod tasks;

#[cfg(all(feature = "app", not(test)))]
use std::io::{BufRead, Write};

#[cfg(all(feature = "app", not(test)))]
use crate::commands::{execute, Command};
#[cfg(all(feature = "app", not(test)))]
use crate::state::AppState;
#[cfg(all(feature = "app", not(test)))]
use crate::storage::{FileStore, KeyValueStore, MemoryStore, Storage};

#[cfg(all(feature = "app", not(test)))]
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    use clap::Parser;

    let args = config::Args::parse();
    let today = args.today.unwrap_or_else(dates::today);

    if args.ephemeral {
        let _logger = logging::init_logging(None)?;
        return run_shell(Storage::new(MemoryStore::default()), today);
    }

    let root = args
        .resolved_data_dir()
        .ok_or("no data directory available; pass --data-dir")?;
    let _logger = logging::init_logging(Some(root.as_path()))?;
    let store = FileStore::new(root);
    store.ensure_dirs()?;
    run_shell(Storage::new(store), today)
}

#[cfg(all(feature = "app", not(test)))]
fn run_shell<S: KeyValueStore>(
    mut storage: Storage<S>,
    today: chrono::NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = AppState::new(
        storage.load_tasks(),
        storage.load_clients(),
        storage.load_settings(),
        today,
    );
    log::info!(
        "shell started tasks={} clients={}",
        state.tasks().len(),
        state.clients().len()
    );

    let stdin = std::io::stdin();
    let mut out = std::io::stdout();
    writeln!(out, "{}", render::task_list(&state))?;
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let command = match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "error: {message}")?;
                continue;
            }
        };
        let result = execute(&mut state, &mut storage, command);
        match (result.data, result.error) {
            (Some(view), _) => writeln!(out, "{view}")?,
            (None, Some(message)) => writeln!(out, "error: {message}")?,
            (None, None) => {}
        }
    }
    log::info!("shell stopped");
    Ok(())
}
