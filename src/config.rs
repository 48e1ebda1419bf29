use crate::models::{Reward, default_rewards};
use crate::pomodoro::{DEFAULT_BREAK_MINUTES, DEFAULT_WORK_MINUTES, MAX_MINUTES};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const MAX_ALERT_SECONDS: u64 = 60;

pub fn key_match(key: &KeyEvent, bindings: &[String]) -> bool {
    bindings.iter().any(|binding| is_match(key, binding))
}

fn parse_binding(binding: &str) -> (KeyModifiers, KeyCode) {
    let binding = binding.to_lowercase();
    let mut modifiers = KeyModifiers::NONE;
    let mut code = KeyCode::Null;

    for part in binding.split('+') {
        match part {
            "ctrl" => modifiers.insert(KeyModifiers::CONTROL),
            "opt" | "alt" => modifiers.insert(KeyModifiers::ALT),
            "shift" => modifiers.insert(KeyModifiers::SHIFT),
            "enter" => code = KeyCode::Enter,
            "esc" => code = KeyCode::Esc,
            "backspace" => code = KeyCode::Backspace,
            "tab" => code = KeyCode::Tab,
            "backtab" => code = KeyCode::BackTab,
            "space" => code = KeyCode::Char(' '),
            "up" => code = KeyCode::Up,
            "down" => code = KeyCode::Down,
            "left" => code = KeyCode::Left,
            "right" => code = KeyCode::Right,
            c if c.chars().count() == 1 => {
                if let Some(ch) = c.chars().next() {
                    code = KeyCode::Char(ch);
                }
            }
            _ => {}
        }
    }
    (modifiers, code)
}

fn is_match(key: &KeyEvent, binding: &str) -> bool {
    let (target_mods, target_code) = parse_binding(binding);

    let code_matches = match (key.code, target_code) {
        (KeyCode::Char(c), KeyCode::Char(tc)) => c.to_lowercase().next() == Some(tc),
        (code, target) => code == target,
    };
    if !code_matches {
        return false;
    }

    if target_code == KeyCode::Enter {
        return key.modifiers == target_mods;
    }

    // Shift only counts when the binding asks for it ("?" arrives as shift+/).
    let mut key_mods = key.modifiers;
    if !target_mods.contains(KeyModifiers::SHIFT) {
        key_mods.remove(KeyModifiers::SHIFT);
    }
    key_mods == target_mods
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "meghendra", "taskboard")
}

fn default_data_dir() -> PathBuf {
    if let Some(path) = std::env::var_os("TASKBOARD_DATA_DIR") {
        return PathBuf::from(path);
    }
    if let Some(dirs) = project_dirs() {
        return dirs.data_dir().to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".taskboard")
}

fn default_state_dir() -> PathBuf {
    default_data_dir().join("state")
}

pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("TASKBOARD_CONFIG") {
        return PathBuf::from(path);
    }
    if let Some(dirs) = project_dirs() {
        return dirs.config_dir().join("config.toml");
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".taskboard-config.toml")
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub keybindings: KeyBindings,
    pub theme: Theme,
    pub data: DataConfig,
    pub pomodoro: PomodoroConfig,
    pub sheets: SheetsConfig,
    pub rewards: Vec<Reward>,
    /// Problems found while loading, logged once logging is up.
    #[serde(skip)]
    pub load_warnings: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keybindings: KeyBindings::default(),
            theme: Theme::default(),
            data: DataConfig::default(),
            pomodoro: PomodoroConfig::default(),
            sheets: SheetsConfig::default(),
            rewards: default_rewards(),
            load_warnings: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DataConfig {
    pub state_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            state_path: default_state_dir(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct KeyBindings {
    pub global: GlobalBindings,
    pub board: BoardBindings,
    pub prompt: PromptBindings,
    pub popup: PopupBindings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GlobalBindings {
    pub quit: Vec<String>,
    pub help: Vec<String>,
    pub import_file: Vec<String>,
    pub import_sheet: Vec<String>,
    pub durations: Vec<String>,
    pub rewards: Vec<String>,
    pub focus_view: Vec<String>,
    pub data_dir: Vec<String>,
}

impl Default for GlobalBindings {
    fn default() -> Self {
        Self {
            quit: vec!["ctrl+q".to_string(), "q".to_string()],
            help: vec!["?".to_string()],
            import_file: vec!["i".to_string()],
            import_sheet: vec!["u".to_string()],
            durations: vec!["d".to_string()],
            rewards: vec!["r".to_string()],
            focus_view: vec!["f".to_string()],
            data_dir: vec!["o".to_string()],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct BoardBindings {
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub column_left: Vec<String>,
    pub column_right: Vec<String>,
    pub move_left: Vec<String>,
    pub move_right: Vec<String>,
    pub select: Vec<String>,
    pub next_day: Vec<String>,
    pub prev_day: Vec<String>,
    pub start_timer: Vec<String>,
    pub pause_timer: Vec<String>,
    pub reset_timer: Vec<String>,
}

impl Default for BoardBindings {
    fn default() -> Self {
        Self {
            up: vec!["k".to_string(), "up".to_string()],
            down: vec!["j".to_string(), "down".to_string()],
            column_left: vec!["h".to_string(), "left".to_string()],
            column_right: vec!["l".to_string(), "right".to_string()],
            move_left: vec!["shift+h".to_string(), "shift+left".to_string()],
            move_right: vec!["shift+l".to_string(), "shift+right".to_string()],
            select: vec!["space".to_string(), "enter".to_string()],
            next_day: vec!["tab".to_string(), "]".to_string()],
            prev_day: vec!["backtab".to_string(), "[".to_string()],
            start_timer: vec!["s".to_string()],
            pause_timer: vec!["p".to_string()],
            reset_timer: vec!["x".to_string()],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PromptBindings {
    pub submit: Vec<String>,
    pub cancel: Vec<String>,
    pub next_field: Vec<String>,
}

impl Default for PromptBindings {
    fn default() -> Self {
        Self {
            submit: vec!["enter".to_string()],
            cancel: vec!["esc".to_string()],
            next_field: vec!["tab".to_string(), "backtab".to_string()],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PopupBindings {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub up: Vec<String>,
    pub down: Vec<String>,
}

impl Default for PopupBindings {
    fn default() -> Self {
        Self {
            confirm: vec!["enter".to_string(), "y".to_string()],
            cancel: vec!["esc".to_string(), "n".to_string(), "q".to_string()],
            up: vec!["k".to_string(), "up".to_string()],
            down: vec!["j".to_string(), "down".to_string()],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Theme {
    pub border_default: String,
    pub border_focus: String,
    pub todo: String,
    pub in_progress: String,
    pub completed: String,
    pub selected: String,
    pub text_highlight: String,
    pub time_label: String,
    pub points: String,
    pub toast: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border_default: "Reset".to_string(),
            border_focus: "Cyan".to_string(),
            todo: "Yellow".to_string(),
            in_progress: "Blue".to_string(),
            completed: "Green".to_string(),
            selected: "#f5a623".to_string(),
            text_highlight: "50,50,50".to_string(),
            time_label: "DarkGray".to_string(),
            points: "Magenta".to_string(),
            toast: "Cyan".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PomodoroConfig {
    pub work_minutes: u64,
    pub break_minutes: u64,
    pub alert_seconds: u64,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
            alert_seconds: 4,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SheetsConfig {
    pub timeout_seconds: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 20,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(config_path: &Path) -> Self {
        let mut warnings = Vec::new();
        let mut config = match fs::read_to_string(config_path) {
            Ok(content) => match toml::from_str::<Config>(&content) {
                Ok(config) => config,
                Err(e) => {
                    warnings.push(format!(
                        "failed to parse {}, using defaults: {e}",
                        config_path.display()
                    ));
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        };

        let changed = config.normalize();

        if (changed || !config_path.exists())
            && let Err(e) = config.save_to_path(config_path)
        {
            warnings.push(format!("failed to write {}: {e}", config_path.display()));
        }

        config.load_warnings = warnings;
        config
    }

    pub fn save_to_path(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, content)
    }

    fn normalize(&mut self) -> bool {
        let mut changed = false;

        if self.data.state_path.as_os_str().is_empty() {
            self.data.state_path = default_state_dir();
            changed = true;
        }
        if self.data.state_path.is_relative() {
            self.data.state_path = default_data_dir().join(&self.data.state_path);
            changed = true;
        }

        let pomodoro = &mut self.pomodoro;
        for (minutes, default) in [
            (&mut pomodoro.work_minutes, DEFAULT_WORK_MINUTES),
            (&mut pomodoro.break_minutes, DEFAULT_BREAK_MINUTES),
        ] {
            let fixed = if *minutes == 0 {
                default
            } else {
                (*minutes).min(MAX_MINUTES)
            };
            changed |= fixed != *minutes;
            *minutes = fixed;
        }
        let alert = pomodoro.alert_seconds.clamp(1, MAX_ALERT_SECONDS);
        changed |= alert != pomodoro.alert_seconds;
        pomodoro.alert_seconds = alert;

        let before = self.rewards.len();
        self.rewards.retain(|reward| !reward.name.trim().is_empty());
        changed |= before != self.rewards.len();

        changed
    }
}
