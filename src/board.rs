use crate::models::{Schedule, TODAY_KEY, Task, TaskStatus};
use chrono::Weekday;

pub fn weekday_key(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "sun",
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
    }
}

/// `today` beats the real weekday, which beats the first imported column.
pub fn select_default_day(schedule: &Schedule, weekday: Weekday) -> Option<String> {
    if schedule.contains_day(TODAY_KEY) {
        return Some(TODAY_KEY.to_string());
    }
    let current = weekday_key(weekday);
    if schedule.contains_day(current) {
        return Some(current.to_string());
    }
    schedule.first_key().map(str::to_string)
}

/// Tasks grouped by day plus the active day and Pomodoro selection.
#[derive(Default)]
pub struct Board {
    schedule: Schedule,
    active_day: Option<String>,
    selected: Option<String>,
}

impl Board {
    pub fn new(schedule: Schedule, weekday: Weekday) -> Self {
        let active_day = select_default_day(&schedule, weekday);
        Self {
            schedule,
            active_day,
            selected: None,
        }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn active_day(&self) -> Option<&str> {
        self.active_day.as_deref()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn day_keys(&self) -> Vec<String> {
        self.schedule.day_keys()
    }

    /// Swaps in a freshly imported schedule. Statuses from the old one are
    /// gone for good.
    pub fn replace_schedule(&mut self, schedule: Schedule, weekday: Weekday) {
        self.active_day = select_default_day(&schedule, weekday);
        self.schedule = schedule;
        self.selected = None;
    }

    /// Returns false when the key is not part of the schedule.
    pub fn switch_day(&mut self, key: &str) -> bool {
        if !self.schedule.contains_day(key) {
            return false;
        }
        self.active_day = Some(key.to_string());
        self.selected = None;
        true
    }

    pub fn active_tasks(&self) -> &[Task] {
        self.active_day
            .as_deref()
            .and_then(|key| self.schedule.tasks(key))
            .unwrap_or_default()
    }

    pub fn tasks_with_status(&self, status: TaskStatus) -> Vec<&Task> {
        self.active_tasks()
            .iter()
            .filter(|task| task.status == status)
            .collect()
    }

    pub fn find_active(&self, task_id: &str) -> Option<&Task> {
        self.active_tasks().iter().find(|task| task.id == task_id)
    }

    /// Looks the task up in the active day only. Returns whether it was found.
    pub fn set_status(&mut self, task_id: &str, status: TaskStatus) -> bool {
        let Some(key) = self.active_day.as_deref() else {
            return false;
        };
        let Some(task) = self
            .schedule
            .tasks_mut(key)
            .and_then(|tasks| tasks.iter_mut().find(|task| task.id == task_id))
        else {
            return false;
        };
        task.status = status;
        if status == TaskStatus::Completed && self.selected.as_deref() == Some(task_id) {
            self.selected = None;
        }
        true
    }

    pub fn toggle_select(&mut self, task_id: &str) {
        if self.selected.as_deref() == Some(task_id) {
            self.selected = None;
        } else if self.find_active(task_id).is_some() {
            self.selected = Some(task_id.to_string());
        }
    }

    pub fn completed_count(&self) -> usize {
        self.active_tasks()
            .iter()
            .filter(|task| task.status == TaskStatus::Completed)
            .count()
    }

    pub fn progress_percent(&self) -> u16 {
        let total = self.active_tasks().len();
        if total == 0 {
            return 0;
        }
        ((self.completed_count() as f64 / total as f64) * 100.0).round() as u16
    }
}
