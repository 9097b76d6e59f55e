use std::fmt::Write;

use chrono::{Datelike, NaiveDate};

use crate::calendar::{month_highlights, tasks_on};
use crate::dates::display_day;
use crate::models::Task;
use crate::state::AppState;

pub fn task_row(index: usize, task: &Task) -> String {
    let check = if task.completed { "x" } else { " " };
    let mut row = format!(
        "{index:>3} [{check}] ({}) {} - {}",
        task.color,
        task.text,
        display_day(task.date)
    );
    if !task.notes.is_empty() {
        row.push_str(" [notes]");
    }
    if let Some(client) = &task.client {
        let _ = write!(row, " @{client}");
    }
    row
}

pub fn task_list(state: &AppState) -> String {
    let tasks = state.tasks();
    if tasks.is_empty() {
        return "no tasks".to_string();
    }
    let mut out = String::new();
    for (index, task) in tasks.tasks().iter().enumerate() {
        let _ = writeln!(out, "{}", task_row(index, task));
        if state.notes_expanded(index) {
            let notes = if task.notes.is_empty() { "(no notes)" } else { task.notes.as_str() };
            for line in notes.lines() {
                let _ = writeln!(out, "        | {line}");
            }
        }
    }
    out.trim_end().to_string()
}

pub fn client_list(state: &AppState) -> String {
    let clients = state.clients();
    if clients.is_empty() {
        return "no clients".to_string();
    }
    let selected = state.selected_client();
    clients
        .clients()
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let marker = if selected == Some(name.as_str()) { "*" } else { " " };
            format!("{index:>3}{marker}{name}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn task_detail(state: &AppState) -> String {
    let detail = state.detail();
    let Some(task) = detail.current(state.tasks()) else {
        return "no task open".to_string();
    };
    let mut out = String::new();
    let heading = if detail.is_editing() {
        "Task Detail (editing)"
    } else {
        "Task Detail"
    };
    let _ = writeln!(out, "{heading}");
    let _ = writeln!(out, "Title:       {}", task.text);
    let _ = writeln!(out, "Description: {}", task.notes);
    let _ = writeln!(out, "Due Date:    {}", display_day(task.date));
    let _ = writeln!(out, "Priority:    {}", task.color);
    let _ = writeln!(out, "Client:      {}", task.client.as_deref().unwrap_or(""));
    if !detail.is_editing() {
        for (label, items) in [
            ("Attachments", &task.attachments),
            ("Comments", &task.comments),
            ("History", &task.history),
        ] {
            let _ = writeln!(out, "{label}:");
            for item in items {
                let _ = writeln!(out, "  - {item}");
            }
        }
    }
    out.trim_end().to_string()
}

/// Highlighted days of the month containing `anchor`; the selected day is starred.
pub fn month(state: &AppState, anchor: NaiveDate) -> String {
    let highlights = month_highlights(state.tasks().tasks(), anchor.year(), anchor.month());
    let mut out = anchor.format("%B %Y").to_string();
    let selected = state.selected_date();
    if highlights.is_empty() {
        out.push_str("\n  no tasks due");
    }
    for (day, color) in highlights {
        let marker = if day == selected { "*" } else { " " };
        let _ = write!(out, "\n {marker}{}  {color}", display_day(day));
    }
    if selected.year() == anchor.year() && selected.month() == anchor.month() {
        let mut due = tasks_on(state.tasks().tasks(), selected).peekable();
        if due.peek().is_some() {
            let _ = write!(out, "\n\nDue {}:", display_day(selected));
        }
        for (index, task) in due {
            let _ = write!(out, "\n{}", task_row(index, task));
        }
    }
    out
}
