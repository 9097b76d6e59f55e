use chrono::NaiveDate;

use crate::models::{Color, Task};
use crate::tasks::TaskStore;

/// Task detail panel. An open panel is addressed by position in the task store.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TaskDetail {
    #[default]
    Closed,
    Viewing {
        index: usize,
    },
    Editing {
        index: usize,
        draft: Task,
    },
}

/// A single field edit applied to the staged copy.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftEdit {
    Text(String),
    Notes(String),
    Date(NaiveDate),
    Color(Color),
    Client(Option<String>),
}

impl TaskDetail {
    pub fn index(&self) -> Option<usize> {
        match self {
            TaskDetail::Closed => None,
            TaskDetail::Viewing { index } | TaskDetail::Editing { index, .. } => Some(*index),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, TaskDetail::Editing { .. })
    }

    /// The record the panel shows: the staged copy while editing, the stored one otherwise.
    pub fn current<'a>(&'a self, store: &'a TaskStore) -> Option<&'a Task> {
        match self {
            TaskDetail::Closed => None,
            TaskDetail::Viewing { index } => store.get(*index),
            TaskDetail::Editing { draft, .. } => Some(draft),
        }
    }

    /// Closed -> Viewing. Refused from any other state or for a missing task.
    pub fn open(&mut self, store: &TaskStore, index: usize) -> bool {
        if !matches!(self, TaskDetail::Closed) || store.get(index).is_none() {
            return false;
        }
        *self = TaskDetail::Viewing { index };
        true
    }

    /// Viewing -> Editing with a staged copy of the stored record.
    pub fn edit(&mut self, store: &TaskStore) -> bool {
        let TaskDetail::Viewing { index } = *self else {
            return false;
        };
        match store.get(index) {
            Some(task) => {
                *self = TaskDetail::Editing {
                    index,
                    draft: task.clone(),
                };
                true
            }
            None => false,
        }
    }

    /// Applies an edit to the staged copy only.
    pub fn apply(&mut self, edit: DraftEdit) -> bool {
        let TaskDetail::Editing { draft, .. } = self else {
            return false;
        };
        match edit {
            DraftEdit::Text(text) => draft.text = text,
            DraftEdit::Notes(notes) => draft.notes = notes,
            DraftEdit::Date(date) => draft.date = date,
            DraftEdit::Color(color) => draft.color = color,
            DraftEdit::Client(client) => draft.client = client.filter(|name| !name.is_empty()),
        }
        true
    }

    /// Editing -> Viewing, writing the staged copy over the stored record.
    pub fn save(&mut self, store: &mut TaskStore) -> bool {
        if !self.is_editing() {
            return false;
        }
        let TaskDetail::Editing { index, draft } = std::mem::take(self) else {
            return false;
        };
        if !store.replace_task(index, draft.clone()) {
            *self = TaskDetail::Editing { index, draft };
            return false;
        }
        *self = TaskDetail::Viewing { index };
        true
    }

    /// Back to Closed, dropping any staged edits.
    pub fn close(&mut self) {
        *self = TaskDetail::Closed;
    }

    /// Keeps the panel on the same record after the task at `removed` is deleted.
    pub fn task_removed(&mut self, removed: usize) {
        match self {
            TaskDetail::Closed => {}
            TaskDetail::Viewing { index } | TaskDetail::Editing { index, .. } => {
                if *index == removed {
                    *self = TaskDetail::Closed;
                } else if *index > removed {
                    *index -= 1;
                }
            }
        }
    }
}
