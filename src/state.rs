use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::calendar::color_for_date;
use crate::clients::ClientStore;
use crate::detail::{DraftEdit, TaskDetail};
use crate::events::{Change, StatePayload};
use crate::models::{Color, Settings};
use crate::tasks::TaskStore;

/// Everything the application shell owns. Mutators return the persisted entry
/// they changed, or `None` when the call was a no-op.
#[derive(Debug, Clone)]
pub struct AppState {
    tasks: TaskStore,
    clients: ClientStore,
    settings: Settings,
    detail: TaskDetail,
    selected_date: NaiveDate,
    selected_client: Option<String>,
    expanded_notes: BTreeSet<usize>,
}

impl AppState {
    pub fn new(
        tasks: Vec<crate::models::Task>,
        clients: Vec<String>,
        settings: Settings,
        today: NaiveDate,
    ) -> Self {
        Self {
            tasks: TaskStore::new(tasks),
            clients: ClientStore::new(clients),
            settings,
            detail: TaskDetail::default(),
            selected_date: today,
            selected_client: None,
            expanded_notes: BTreeSet::new(),
        }
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn clients(&self) -> &ClientStore {
        &self.clients
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn detail(&self) -> &TaskDetail {
        &self.detail
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn selected_client(&self) -> Option<&str> {
        self.selected_client.as_deref()
    }

    pub fn notes_expanded(&self, index: usize) -> bool {
        self.expanded_notes.contains(&index)
    }

    pub fn payload(&self) -> StatePayload {
        StatePayload {
            tasks: self.tasks.tasks().to_vec(),
            clients: self.clients.clients().to_vec(),
            settings: self.settings.clone(),
        }
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = date;
    }

    /// An empty name clears the selection.
    pub fn select_client(&mut self, name: Option<&str>) {
        self.selected_client = name.filter(|n| !n.is_empty()).map(str::to_string);
    }

    pub fn color_for_date(&self, date: NaiveDate) -> Option<Color> {
        color_for_date(self.tasks.tasks(), date)
    }

    /// Adds a task due on the selected date, tagged with the selected client.
    pub fn add_task(&mut self, text: &str) -> Option<Change> {
        let index = self
            .tasks
            .add_task(text, self.selected_date, self.selected_client.as_deref())?;
        log::info!("added task index={index}");
        Some(Change::Tasks)
    }

    pub fn toggle_completed(&mut self, index: usize) -> Option<Change> {
        self.tasks.toggle_completed(index).then(|| {
            log::info!("toggled task index={index}");
            Change::Tasks
        })
    }

    pub fn delete_task(&mut self, index: usize) -> Option<Change> {
        self.tasks.delete_task(index)?;
        self.detail.task_removed(index);
        self.expanded_notes = self
            .expanded_notes
            .iter()
            .filter(|&&i| i != index)
            .map(|&i| if i > index { i - 1 } else { i })
            .collect();
        log::info!("deleted task index={index}");
        Some(Change::Tasks)
    }

    pub fn update_notes(&mut self, index: usize, notes: &str) -> Option<Change> {
        self.tasks.update_notes(index, notes).then(|| {
            log::info!("updated notes index={index}");
            Change::Tasks
        })
    }

    pub fn update_color(&mut self, index: usize, color: Color) -> Option<Change> {
        self.tasks.update_color(index, color).then(|| {
            log::info!("updated color index={index} color={color}");
            Change::Tasks
        })
    }

    /// Shows or hides the notes panel of a row. Not persisted.
    pub fn toggle_notes(&mut self, index: usize) -> bool {
        if self.tasks.get(index).is_none() {
            return false;
        }
        if !self.expanded_notes.remove(&index) {
            self.expanded_notes.insert(index);
        }
        true
    }

    pub fn add_client(&mut self, name: &str) -> Option<Change> {
        let index = self.clients.add_client(name)?;
        log::info!("added client index={index}");
        Some(Change::Clients)
    }

    /// Tasks that name the removed client keep the name.
    pub fn delete_client(&mut self, index: usize) -> Option<Change> {
        let removed = self.clients.delete_client(index)?;
        log::info!("deleted client index={index}");
        if self.selected_client.as_deref() == Some(removed.as_str())
            && !self.clients.contains(&removed)
        {
            self.selected_client = None;
        }
        Some(Change::Clients)
    }

    pub fn toggle_theme(&mut self) -> Change {
        self.settings.dark_mode = !self.settings.dark_mode;
        log::info!("theme dark_mode={}", self.settings.dark_mode);
        Change::Settings
    }

    pub fn open_detail(&mut self, index: usize) -> bool {
        self.detail.open(&self.tasks, index)
    }

    pub fn edit_detail(&mut self) -> bool {
        self.detail.edit(&self.tasks)
    }

    pub fn apply_draft(&mut self, edit: DraftEdit) -> bool {
        self.detail.apply(edit)
    }

    pub fn save_detail(&mut self) -> Option<Change> {
        self.detail.save(&mut self.tasks).then(|| {
            log::info!("saved task detail index={:?}", self.detail.index());
            Change::Tasks
        })
    }

    pub fn close_detail(&mut self) {
        self.detail.close();
    }
}
