use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const TODAY_KEY: &str = "today";

#[derive(PartialEq)]
pub enum InputMode {
    Navigate,
    ImportFile,
    ImportSheet,
    Durations,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn all() -> [TaskStatus; 3] {
        [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Completed]
    }

    pub fn title(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            TaskStatus::Todo => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Completed => 2,
        }
    }

    /// Neighbouring column, used by the keyboard move commands.
    pub fn shifted(&self, direction: MoveDirection) -> Option<TaskStatus> {
        match (self, direction) {
            (TaskStatus::Todo, MoveDirection::Right) => Some(TaskStatus::InProgress),
            (TaskStatus::InProgress, MoveDirection::Right) => Some(TaskStatus::Completed),
            (TaskStatus::InProgress, MoveDirection::Left) => Some(TaskStatus::Todo),
            (TaskStatus::Completed, MoveDirection::Left) => Some(TaskStatus::InProgress),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDirection {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub time: String,
    pub desc: String,
    pub status: TaskStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct DayTasks {
    pub key: String,
    pub tasks: Vec<Task>,
}

/// Day-keyed task lists in header order.
///
/// Serialized as a JSON object whose key order follows the import order, so a
/// reload keeps the same day tabs in the same order.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Schedule {
    days: Vec<DayTasks>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn contains_day(&self, key: &str) -> bool {
        self.days.iter().any(|day| day.key == key)
    }

    pub fn day_keys(&self) -> Vec<String> {
        self.days.iter().map(|day| day.key.clone()).collect()
    }

    pub fn first_key(&self) -> Option<&str> {
        self.days.first().map(|day| day.key.as_str())
    }

    pub fn tasks(&self, key: &str) -> Option<&[Task]> {
        self.days
            .iter()
            .find(|day| day.key == key)
            .map(|day| day.tasks.as_slice())
    }

    pub fn tasks_mut(&mut self, key: &str) -> Option<&mut Vec<Task>> {
        self.days
            .iter_mut()
            .find(|day| day.key == key)
            .map(|day| &mut day.tasks)
    }

    /// Adds an empty day if the key is new. Existing days are left alone.
    pub fn ensure_day(&mut self, key: &str) {
        if !self.contains_day(key) {
            self.days.push(DayTasks {
                key: key.to_string(),
                tasks: Vec::new(),
            });
        }
    }

    pub fn push_task(&mut self, key: &str, task: Task) {
        self.ensure_day(key);
        if let Some(tasks) = self.tasks_mut(key) {
            tasks.push(task);
        }
    }

    pub fn task_count(&self) -> usize {
        self.days.iter().map(|day| day.tasks.len()).sum()
    }
}

impl Serialize for Schedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for day in &self.days {
            map.serialize_entry(&day.key, &day.tasks)?;
        }
        map.end()
    }
}

struct ScheduleVisitor;

impl<'de> Visitor<'de> for ScheduleVisitor {
    type Value = Schedule;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of day keys to task lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Schedule, A::Error> {
        let mut schedule = Schedule::new();
        while let Some((key, tasks)) = access.next_entry::<String, Vec<Task>>()? {
            schedule.ensure_day(&key);
            if let Some(existing) = schedule.tasks_mut(&key) {
                existing.extend(tasks);
            }
        }
        Ok(schedule)
    }
}

impl<'de> Deserialize<'de> for Schedule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Schedule, D::Error> {
        deserializer.deserialize_map(ScheduleVisitor)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub name: String,
    pub cost: u64,
}

pub fn default_rewards() -> Vec<Reward> {
    [
        ("Browsing Twitter", 2),
        ("YouTube Video", 3),
        ("Nap", 5),
        ("Calling Friends", 6),
        ("Eating Outside (Favourite Dish)", 8),
        ("Movie", 10),
    ]
    .into_iter()
    .map(|(name, cost)| Reward {
        name: name.to_string(),
        cost,
    })
    .collect()
}

/// Human label for a day tab.
pub fn day_label(key: &str) -> String {
    match key {
        "sun" => "Sun".to_string(),
        "mon" => "Mon".to_string(),
        "tue" => "Tue".to_string(),
        "wed" => "Wed".to_string(),
        "thu" => "Thu".to_string(),
        "fri" => "Fri".to_string(),
        "sat" => "Sat".to_string(),
        TODAY_KEY => "Today".to_string(),
        "" => "(blank)".to_string(),
        other => other.to_string(),
    }
}
