use chrono::NaiveDate;

use crate::models::{Color, Task};

/// Ordered task collection. Insertion order is display order and positions
/// shift down after a removal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Appends a task unless `text` is blank. Returns the new position.
    pub fn add_task(
        &mut self,
        text: &str,
        date: NaiveDate,
        client: Option<&str>,
    ) -> Option<usize> {
        if text.trim().is_empty() {
            return None;
        }
        let task = Task::new(text, date, client.map(str::to_string));
        log::debug!("tasks: add text={:?} date={} client={:?}", task.text, task.date, task.client);
        self.tasks.push(task);
        Some(self.tasks.len() - 1)
    }

    pub fn toggle_completed(&mut self, index: usize) -> bool {
        match self.tasks.get_mut(index) {
            Some(task) => {
                task.completed = !task.completed;
                log::debug!("tasks: toggle index={index} completed={}", task.completed);
                true
            }
            None => false,
        }
    }

    pub fn delete_task(&mut self, index: usize) -> Option<Task> {
        if index >= self.tasks.len() {
            return None;
        }
        log::debug!("tasks: delete index={index}");
        Some(self.tasks.remove(index))
    }

    /// Replaces the notes verbatim, empty string included.
    pub fn update_notes(&mut self, index: usize, notes: &str) -> bool {
        match self.tasks.get_mut(index) {
            Some(task) => {
                task.notes = notes.to_string();
                log::debug!("tasks: notes index={index} len={}", notes.len());
                true
            }
            None => false,
        }
    }

    pub fn update_color(&mut self, index: usize, color: Color) -> bool {
        match self.tasks.get_mut(index) {
            Some(task) => {
                task.color = color;
                log::debug!("tasks: color index={index} color={color}");
                true
            }
            None => false,
        }
    }

    /// Overwrites the whole record; nothing is merged from the previous one.
    pub fn replace_task(&mut self, index: usize, task: Task) -> bool {
        match self.tasks.get_mut(index) {
            Some(existing) => {
                *existing = task;
                log::debug!("tasks: replace index={index}");
                true
            }
            None => false,
        }
    }
}
