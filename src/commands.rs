use chrono::NaiveDate;

use crate::dates::parse_day;
use crate::detail::DraftEdit;
use crate::events::Change;
use crate::models::Color;
use crate::render;
use crate::state::AppState;
use crate::storage::{KeyValueStore, Storage, StorageError};

pub const HELP: &str = "\
add <text>                      add a task due on the selected date
toggle <i> | rm <i>             flip completion | delete a task
notes <i> <text>                replace a task's notes
show-notes <i>                  show or hide a task's notes
color <i> <red|orange|green>    set a task's priority
date <YYYY-MM-DD>               select a calendar date
calendar [YYYY-MM]              list highlighted days
client add <name> | client rm <i> | client select <name|->
open <i> | edit | set <field> <value> | save | close
                                task detail; fields: text notes date color client
list | clients | theme | export | help | quit";

#[derive(Debug)]
pub struct CommandResult<T> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

fn ok<T>(data: T) -> CommandResult<T> {
    CommandResult {
        ok: true,
        data: Some(data),
        error: None,
    }
}

fn err<T>(message: &str) -> CommandResult<T> {
    CommandResult {
        ok: false,
        data: None,
        error: Some(message.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add(String),
    Toggle(usize),
    Delete(usize),
    Notes(usize, String),
    ShowNotes(usize),
    SetColor(usize, Color),
    SelectDate(NaiveDate),
    Calendar(Option<NaiveDate>),
    AddClient(String),
    DeleteClient(usize),
    SelectClient(Option<String>),
    Open(usize),
    Edit,
    Set(DraftEdit),
    Save,
    Close,
    Theme,
    List,
    Clients,
    Export,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, String> {
        let line = line.trim();
        let (head, rest) = split_word(line);
        let command = match head {
            "add" => Command::Add(rest.to_string()),
            "toggle" => Command::Toggle(parse_index(rest)?),
            "rm" => Command::Delete(parse_index(rest)?),
            "notes" => {
                let (index, text) = split_word(rest);
                Command::Notes(parse_index(index)?, text.to_string())
            }
            "show-notes" => Command::ShowNotes(parse_index(rest)?),
            "color" => {
                let (index, color) = split_word(rest);
                Command::SetColor(parse_index(index)?, color.parse()?)
            }
            "date" => Command::SelectDate(parse_date(rest)?),
            "calendar" if rest.is_empty() => Command::Calendar(None),
            "calendar" => Command::Calendar(Some(parse_date(&format!("{rest}-01"))?)),
            "client" => {
                let (action, arg) = split_word(rest);
                match action {
                    "add" => Command::AddClient(arg.to_string()),
                    "rm" => Command::DeleteClient(parse_index(arg)?),
                    "select" if arg.is_empty() || arg == "-" => Command::SelectClient(None),
                    "select" => Command::SelectClient(Some(arg.to_string())),
                    other => return Err(format!("unknown client action: {other}")),
                }
            }
            "open" => Command::Open(parse_index(rest)?),
            "edit" => Command::Edit,
            "set" => Command::Set(parse_draft_edit(rest)?),
            "save" => Command::Save,
            "close" => Command::Close,
            "theme" => Command::Theme,
            "list" => Command::List,
            "clients" => Command::Clients,
            "export" => Command::Export,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "" => return Err("empty command".to_string()),
            other => return Err(format!("unknown command: {other}")),
        };
        Ok(command)
    }
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim_start()),
        None => (input, ""),
    }
}

fn parse_index(raw: &str) -> Result<usize, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("invalid index: {raw:?}"))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    parse_day(raw).ok_or_else(|| format!("invalid date: {raw:?}"))
}

fn parse_draft_edit(rest: &str) -> Result<DraftEdit, String> {
    let (field, value) = split_word(rest);
    let edit = match field {
        "text" => DraftEdit::Text(value.to_string()),
        "notes" => DraftEdit::Notes(value.to_string()),
        "date" => DraftEdit::Date(parse_date(value)?),
        "color" => DraftEdit::Color(value.parse()?),
        "client" if value.is_empty() || value == "-" => DraftEdit::Client(None),
        "client" => DraftEdit::Client(Some(value.to_string())),
        other => return Err(format!("unknown field: {other}")),
    };
    Ok(edit)
}

fn persist<S: KeyValueStore>(
    storage: &mut Storage<S>,
    state: &AppState,
    change: Option<Change>,
) -> Result<(), StorageError> {
    match change {
        Some(change) => storage.persist(state, change),
        None => Ok(()),
    }
}

/// Runs one command against the state, writes back whatever it changed and
/// renders the affected view.
pub fn execute<S: KeyValueStore>(
    state: &mut AppState,
    storage: &mut Storage<S>,
    command: Command,
) -> CommandResult<String> {
    let change = match &command {
        // Blank text is ignored without complaint.
        Command::Add(text) => state.add_task(text),
        Command::Toggle(index) => match state.toggle_completed(*index) {
            Some(change) => Some(change),
            None => return err("task not found"),
        },
        Command::Delete(index) => match state.delete_task(*index) {
            Some(change) => Some(change),
            None => return err("task not found"),
        },
        Command::Notes(index, text) => match state.update_notes(*index, text) {
            Some(change) => Some(change),
            None => return err("task not found"),
        },
        Command::SetColor(index, color) => match state.update_color(*index, *color) {
            Some(change) => Some(change),
            None => return err("task not found"),
        },
        Command::ShowNotes(index) => {
            if !state.toggle_notes(*index) {
                return err("task not found");
            }
            None
        }
        Command::SelectDate(date) => {
            state.select_date(*date);
            None
        }
        Command::AddClient(name) => state.add_client(name),
        Command::DeleteClient(index) => match state.delete_client(*index) {
            Some(change) => Some(change),
            None => return err("client not found"),
        },
        Command::SelectClient(name) => {
            state.select_client(name.as_deref());
            None
        }
        Command::Open(index) => {
            if !state.open_detail(*index) {
                return err("cannot open task: close the open task first or check the index");
            }
            None
        }
        Command::Edit => {
            if !state.edit_detail() {
                return err("no task is being viewed");
            }
            None
        }
        Command::Set(edit) => {
            if !state.apply_draft(edit.clone()) {
                return err("no task is being edited");
            }
            None
        }
        Command::Save => match state.save_detail() {
            Some(change) => Some(change),
            None => return err("no task is being edited"),
        },
        Command::Close => {
            state.close_detail();
            None
        }
        Command::Theme => Some(state.toggle_theme()),
        Command::Calendar(_)
        | Command::List
        | Command::Clients
        | Command::Export
        | Command::Help
        | Command::Quit => None,
    };

    if let Err(error) = persist(storage, state, change) {
        return err(&format!("storage error: {error}"));
    }

    let view = match command {
        Command::Add(_)
        | Command::Toggle(_)
        | Command::Delete(_)
        | Command::Notes(..)
        | Command::ShowNotes(_)
        | Command::SetColor(..)
        | Command::List => render::task_list(state),
        Command::SelectDate(date) => render::month(state, date),
        Command::Calendar(anchor) => render::month(state, anchor.unwrap_or(state.selected_date())),
        Command::AddClient(_)
        | Command::DeleteClient(_)
        | Command::SelectClient(_)
        | Command::Clients => render::client_list(state),
        Command::Open(_) | Command::Edit | Command::Set(_) | Command::Save | Command::Close => {
            render::task_detail(state)
        }
        Command::Theme => {
            let mode = if state.settings().dark_mode { "dark" } else { "light" };
            format!("{mode} mode")
        }
        Command::Export => match serde_json::to_string_pretty(&state.payload()) {
            Ok(json) => json,
            Err(error) => return err(&format!("export error: {error}")),
        },
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
    };
    ok(view)
}
