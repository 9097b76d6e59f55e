use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::{Color, Task};

/// Tile color for `date`: the color of the first task due that day.
pub fn color_for_date(tasks: &[Task], date: NaiveDate) -> Option<Color> {
    tasks
        .iter()
        .find(|task| task.date == date)
        .map(|task| task.color)
}

/// One highlight per day of the given month, first matching task wins.
pub fn month_highlights(tasks: &[Task], year: i32, month: u32) -> BTreeMap<NaiveDate, Color> {
    let mut highlights = BTreeMap::new();
    for task in tasks {
        if task.date.year() == year && task.date.month() == month {
            highlights.entry(task.date).or_insert(task.color);
        }
    }
    highlights
}

pub fn tasks_on(tasks: &[Task], date: NaiveDate) -> impl Iterator<Item = (usize, &Task)> {
    tasks
        .iter()
        .enumerate()
        .filter(move |(_, task)| task.date == date)
}
