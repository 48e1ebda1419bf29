use crate::models::Schedule;
#[cfg(test)]
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const SCHEDULE_KEY: &str = "schedule";
pub const REWARD_POINTS_KEY: &str = "rewardPoints";

/// Minimal string blob store. Each key holds one serialized value.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// One file per key under the state directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(path).map(Some)
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        ensure_dir(&self.dir)?;
        let path = self.path_for(key);
        // Readers only ever see a complete blob.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(tmp, path)
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads the persisted schedule. Missing, unreadable or malformed data all
/// come back as an empty schedule.
pub fn load_schedule(store: &dyn KeyValueStore) -> Schedule {
    match store.get(SCHEDULE_KEY) {
        Ok(Some(content)) => match serde_json::from_str::<Schedule>(&content) {
            Ok(schedule) => schedule,
            Err(err) => {
                tracing::warn!(error = %err, "stored schedule is malformed, starting empty");
                Schedule::new()
            }
        },
        Ok(None) => Schedule::new(),
        Err(err) => {
            tracing::warn!(error = %err, "failed to read stored schedule");
            Schedule::new()
        }
    }
}

pub fn save_schedule(store: &mut dyn KeyValueStore, schedule: &Schedule) -> io::Result<()> {
    let content = serde_json::to_string(schedule).map_err(io::Error::other)?;
    store.set(SCHEDULE_KEY, &content)
}

pub fn load_reward_points(store: &dyn KeyValueStore) -> u64 {
    match store.get(REWARD_POINTS_KEY) {
        Ok(Some(content)) => content.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(value = %content.trim(), "stored reward points are malformed");
            0
        }),
        Ok(None) => 0,
        Err(err) => {
            tracing::warn!(error = %err, "failed to read stored reward points");
            0
        }
    }
}

pub fn save_reward_points(store: &mut dyn KeyValueStore, points: u64) -> io::Result<()> {
    store.set(REWARD_POINTS_KEY, &points.to_string())
}
