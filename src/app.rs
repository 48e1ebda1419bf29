use crate::board::{Board, weekday_key};
use crate::config::Config;
use crate::error::{AppError, ImportError};
use crate::importer::import_schedule;
use crate::models::{InputMode, MoveDirection, TODAY_KEY, Task, TaskStatus};
use crate::pomodoro::{Durations, Period, Timer, Wallet};
use crate::storage::{self, FileStore, KeyValueStore};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};
use ratatui::widgets::ListState;
use std::fs;
use std::path::Path;
use std::sync::mpsc::Receiver;
use tui_textarea::TextArea;

const PLACEHOLDER_FILE: &str = "Path to a CSV file (Enter to import, Esc to cancel)";
const PLACEHOLDER_SHEET: &str = "Published Google Sheets link (Enter to load, Esc to cancel)";
const TOAST_SECONDS: i64 = 3;

/// What happened when a countdown reached zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodOutcome {
    TaskCompleted { desc: String, awarded: u64 },
    WorkEnded,
    BreakEnded,
}

/// A finished period plus the result of saving what it changed.
#[derive(Debug)]
pub struct FinishedPeriod {
    pub outcome: PeriodOutcome,
    pub saved: Result<(), AppError>,
}

pub struct App<'a> {
    pub config: Config,
    board: Board,
    timer: Timer,
    wallet: Wallet,
    store: Box<dyn KeyValueStore>,
    pub active_date: NaiveDate,

    pub input_mode: InputMode,
    pub focus_column: TaskStatus,
    pub column_states: [ListState; 3],
    pub prompt: TextArea<'a>,
    pub work_minutes_input: String,
    pub break_minutes_input: String,
    pub duration_field: usize,

    pub show_help_popup: bool,
    pub show_rewards_popup: bool,
    pub reward_list_state: ListState,
    pub show_focus_view: bool,

    pub fetch_receiver: Option<Receiver<Result<String, ImportError>>>,
    pub next_tick: Option<DateTime<Local>>,

    // Completion alert (blocks input until expiry)
    pub alert_message: Option<String>,
    pub alert_expiry: Option<DateTime<Local>>,

    pub toast_message: Option<String>,
    pub toast_expiry: Option<DateTime<Local>>,
    pub should_quit: bool,
}

impl<'a> App<'a> {
    pub fn new(config: Config) -> App<'a> {
        let store = FileStore::new(&config.data.state_path);
        App::with_store(config, Box::new(store), Local::now().date_naive())
    }

    pub fn with_store(config: Config, store: Box<dyn KeyValueStore>, today: NaiveDate) -> App<'a> {
        let schedule = storage::load_schedule(store.as_ref());
        let wallet = Wallet::new(storage::load_reward_points(store.as_ref()));
        let board = Board::new(schedule, today.weekday());
        tracing::info!(
            empty = board.schedule().is_empty(),
            days = board.day_keys().len(),
            points = wallet.balance(),
            "loaded board state"
        );

        let work_minutes_input = config.pomodoro.work_minutes.to_string();
        let break_minutes_input = config.pomodoro.break_minutes.to_string();

        let mut app = App {
            config,
            board,
            timer: Timer::default(),
            wallet,
            store,
            active_date: today,
            input_mode: InputMode::Navigate,
            focus_column: TaskStatus::Todo,
            column_states: Default::default(),
            prompt: TextArea::default(),
            work_minutes_input,
            break_minutes_input,
            duration_field: 0,
            show_help_popup: false,
            show_rewards_popup: false,
            reward_list_state: ListState::default(),
            show_focus_view: false,
            fetch_receiver: None,
            next_tick: None,
            alert_message: None,
            alert_expiry: None,
            toast_message: None,
            toast_expiry: None,
            should_quit: false,
        };
        app.clamp_card_selection();
        app
    }

    // ---- read accessors ----

    pub fn active_tasks(&self) -> &[Task] {
        self.board.active_tasks()
    }

    pub fn tasks_in_column(&self, status: TaskStatus) -> Vec<&Task> {
        self.board.tasks_with_status(status)
    }

    pub fn day_keys(&self) -> Vec<String> {
        self.board.day_keys()
    }

    pub fn active_day(&self) -> Option<&str> {
        self.board.active_day()
    }

    pub fn selected_task(&self) -> Option<&str> {
        self.board.selected()
    }

    pub fn selected_task_desc(&self) -> Option<&str> {
        let id = self.board.selected()?;
        self.board.find_active(id).map(|task| task.desc.as_str())
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn timer_remaining(&self) -> u64 {
        self.timer.remaining_secs()
    }

    pub fn reward_points(&self) -> u64 {
        self.wallet.balance()
    }

    pub fn progress_percent(&self) -> u16 {
        self.board.progress_percent()
    }

    #[cfg(test)]
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn durations(&self) -> Durations {
        Durations::from_inputs(&self.work_minutes_input, &self.break_minutes_input)
    }

    // ---- commands ----

    /// Replaces every day with the tasks parsed from `text`.
    pub fn import_from_text(&mut self, text: &str) -> Result<usize, AppError> {
        let schedule = import_schedule(text)?;
        let count = schedule.task_count();
        self.board
            .replace_schedule(schedule, self.active_date.weekday());
        self.column_states = Default::default();
        self.clamp_card_selection();
        tracing::info!(tasks = count, days = self.board.day_keys().len(), "imported schedule");
        self.persist_schedule()?;
        Ok(count)
    }

    pub fn import_from_file(&mut self, path: &Path) -> Result<usize, AppError> {
        let text = fs::read_to_string(path).map_err(|source| ImportError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.import_from_text(&text)
    }

    pub fn switch_day(&mut self, key: &str) -> bool {
        let switched = self.board.switch_day(key);
        if switched {
            self.column_states = Default::default();
            self.clamp_card_selection();
        }
        switched
    }

    /// Moves to the neighbouring day tab, wrapping around.
    pub fn cycle_day(&mut self, forward: bool) {
        let keys = self.board.day_keys();
        if keys.is_empty() {
            return;
        }
        let current = self
            .board
            .active_day()
            .and_then(|active| keys.iter().position(|key| key == active))
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % keys.len()
        } else {
            (current + keys.len() - 1) % keys.len()
        };
        self.switch_day(&keys[next]);
    }

    pub fn set_status(&mut self, task_id: &str, status: TaskStatus) -> Result<(), AppError> {
        if !self.board.set_status(task_id, status) {
            return Ok(());
        }
        self.clamp_card_selection();
        self.persist_schedule()
    }

    pub fn move_task(
        &mut self,
        task_id: &str,
        direction: MoveDirection,
    ) -> Result<Option<TaskStatus>, AppError> {
        let Some(next) = self
            .board
            .find_active(task_id)
            .and_then(|task| task.status.shifted(direction))
        else {
            return Ok(None);
        };
        self.set_status(task_id, next)?;
        Ok(Some(next))
    }

    pub fn toggle_select(&mut self, task_id: &str) {
        self.board.toggle_select(task_id);
    }

    pub fn start_timer(&mut self) -> Result<(), AppError> {
        let was_running = self.timer.is_running();
        let durations = self.durations();
        self.timer
            .start(self.board.selected().is_some(), durations)?;
        if !was_running {
            self.next_tick = Some(Local::now() + Duration::seconds(1));
            tracing::debug!(period = self.timer.period().label(), "timer started");
        }
        Ok(())
    }

    pub fn pause_timer(&mut self) {
        self.timer.pause();
        self.next_tick = None;
    }

    pub fn reset_timer(&mut self) {
        self.timer.reset();
        self.next_tick = None;
    }

    /// Advances the countdown by one second and settles a finished period.
    ///
    /// A failed save does not undo the completion or the award. Both blobs
    /// are written even when the first write fails.
    pub fn tick_second(&mut self) -> Option<FinishedPeriod> {
        let finished = self.timer.tick()?;
        self.next_tick = None;

        let task_id = match finished {
            Period::Work => self.board.selected().map(str::to_string),
            Period::Break => None,
        };
        let Some(task_id) = task_id else {
            let outcome = match finished {
                Period::Work => PeriodOutcome::WorkEnded,
                Period::Break => PeriodOutcome::BreakEnded,
            };
            return Some(FinishedPeriod {
                outcome,
                saved: Ok(()),
            });
        };

        let desc = self
            .board
            .find_active(&task_id)
            .map(|task| task.desc.clone())
            .unwrap_or_default();
        self.board.set_status(&task_id, TaskStatus::Completed);
        let awarded = self.board.completed_count() as u64;
        self.wallet.award(awarded);
        tracing::info!(task = %task_id, awarded, balance = self.wallet.balance(), "pomodoro completed task");
        self.clamp_card_selection();

        let schedule_saved = self.persist_schedule();
        let points_saved = self.persist_points();
        Some(FinishedPeriod {
            outcome: PeriodOutcome::TaskCompleted { desc, awarded },
            saved: schedule_saved.and(points_saved),
        })
    }

    pub fn claim(&mut self, cost: u64) -> Result<u64, AppError> {
        let balance = self.wallet.claim(cost)?;
        tracing::info!(cost, balance, "claimed reward");
        self.persist_points()?;
        Ok(balance)
    }

    /// Called when the local date changes. Follows the weekday unless the
    /// schedule pins a `today` column.
    pub fn roll_over_day(&mut self, today: NaiveDate) -> bool {
        if today == self.active_date {
            return false;
        }
        self.active_date = today;
        if self.board.schedule().contains_day(TODAY_KEY) {
            return false;
        }
        self.switch_day(weekday_key(today.weekday()))
    }

    fn persist_schedule(&mut self) -> Result<(), AppError> {
        storage::save_schedule(self.store.as_mut(), self.board.schedule())?;
        Ok(())
    }

    fn persist_points(&mut self) -> Result<(), AppError> {
        storage::save_reward_points(self.store.as_mut(), self.wallet.balance())?;
        Ok(())
    }

    // ---- presentation helpers ----

    pub fn toast(&mut self, message: impl Into<String>) {
        self.toast_message = Some(message.into());
        self.toast_expiry = Some(Local::now() + Duration::seconds(TOAST_SECONDS));
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    fn column_state_mut(&mut self) -> &mut ListState {
        &mut self.column_states[self.focus_column.index()]
    }

    /// Task under the cursor in the focused column.
    pub fn focused_card(&self) -> Option<&Task> {
        let index = self.column_states[self.focus_column.index()].selected()?;
        self.tasks_in_column(self.focus_column).get(index).copied()
    }

    pub fn focused_card_id(&self) -> Option<String> {
        self.focused_card().map(|task| task.id.clone())
    }

    pub fn card_up(&mut self) {
        let state = self.column_state_mut();
        if let Some(i) = state.selected() {
            state.select(Some(i.saturating_sub(1)));
        }
    }

    pub fn card_down(&mut self) {
        let len = self.tasks_in_column(self.focus_column).len();
        let state = self.column_state_mut();
        if let Some(i) = state.selected()
            && i + 1 < len
        {
            state.select(Some(i + 1));
        }
    }

    pub fn focus_column_by(&mut self, direction: MoveDirection) {
        if let Some(next) = self.focus_column.shifted(direction) {
            self.focus_column = next;
        }
    }

    /// Keeps every column cursor on an existing card.
    pub fn clamp_card_selection(&mut self) {
        for status in TaskStatus::all() {
            let len = self.tasks_in_column(status).len();
            let state = &mut self.column_states[status.index()];
            match state.selected() {
                _ if len == 0 => state.select(None),
                Some(i) if i >= len => state.select(Some(len - 1)),
                None => state.select(Some(0)),
                _ => {}
            }
        }
    }

    /// Puts the cursor on a task after it changed columns.
    pub fn follow_card(&mut self, task_id: &str) {
        let Some(task) = self.board.find_active(task_id) else {
            return;
        };
        let status = task.status;
        let index = self
            .tasks_in_column(status)
            .iter()
            .position(|task| task.id == task_id);
        if index.is_some() {
            self.focus_column = status;
            self.column_states[status.index()].select(index);
        }
    }

    pub fn open_prompt(&mut self, mode: InputMode) {
        let mut prompt = TextArea::default();
        match mode {
            InputMode::ImportFile => prompt.set_placeholder_text(PLACEHOLDER_FILE),
            InputMode::ImportSheet => prompt.set_placeholder_text(PLACEHOLDER_SHEET),
            _ => {}
        }
        self.prompt = prompt;
        self.input_mode = mode;
    }

    pub fn prompt_text(&self) -> String {
        self.prompt.lines().join("").trim().to_string()
    }

    pub fn close_prompt(&mut self) {
        self.input_mode = InputMode::Navigate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::storage::{MemoryStore, REWARD_POINTS_KEY, SCHEDULE_KEY};
    use std::io;

    // 2024-01-01 is a Monday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date")
    }

    fn make_test_app() -> App<'static> {
        App::with_store(Config::default(), Box::new(MemoryStore::default()), monday())
    }

    fn app_with_points(points: u64) -> App<'static> {
        let mut store = MemoryStore::default();
        storage::save_reward_points(&mut store, points).expect("seed points");
        App::with_store(Config::default(), Box::new(store), monday())
    }

    fn finish_period(app: &mut App) -> Option<FinishedPeriod> {
        for _ in 0..100_000 {
            if let Some(finished) = app.tick_second() {
                return Some(finished);
            }
        }
        None
    }

    fn finish_work(app: &mut App) -> Option<PeriodOutcome> {
        let finished = finish_period(app)?;
        finished.saved.expect("saved");
        Some(finished.outcome)
    }

    fn reload(app: &App) -> App<'static> {
        let mut store = MemoryStore::default();
        for key in [SCHEDULE_KEY, REWARD_POINTS_KEY] {
            if let Some(blob) = app.store().get(key).expect("get") {
                store.set(key, &blob).expect("copy");
            }
        }
        App::with_store(Config::default(), Box::new(store), monday())
    }

    /// Accepts everything except schedule writes.
    struct ScheduleWritesFail(MemoryStore);

    impl KeyValueStore for ScheduleWritesFail {
        fn get(&self, key: &str) -> io::Result<Option<String>> {
            self.0.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
            if key == SCHEDULE_KEY {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
            }
            self.0.set(key, value)
        }
    }

    fn select_first(app: &mut App) -> String {
        let id = app.active_tasks()[0].id.clone();
        app.toggle_select(&id);
        id
    }

    #[test]
    fn import_picks_today_and_persists() {
        let mut app = make_test_app();
        let count = app
            .import_from_text("Time,Sat,Sun,Today\n9am,Gym,Church,Write report")
            .expect("import");

        assert_eq!(count, 3);
        assert_eq!(app.day_keys(), vec!["sat", "sun", "today"]);
        assert_eq!(app.active_day(), Some("today"));
        assert_eq!(app.active_tasks()[0].desc, "Write report");

        let stored = app.store().get(SCHEDULE_KEY).expect("get").expect("saved");
        assert!(stored.contains("Write report"));
    }

    #[test]
    fn empty_import_keeps_existing_schedule() {
        let mut app = make_test_app();
        app.import_from_text("Time,Mon\n9,Read").expect("import");

        let err = app.import_from_text("\n\n").expect_err("empty");
        assert!(err.is_silent());
        assert_eq!(app.active_tasks().len(), 1);

        let err = app.import_from_text("Time\n9").expect_err("no days");
        assert!(!err.is_silent());
        assert_eq!(app.active_tasks()[0].desc, "Read");
    }

    #[test]
    fn reimport_discards_completed_tasks() {
        let csv = "Time,Today\n9,Write\n10,Read";
        let mut app = make_test_app();
        app.import_from_text(csv).expect("import");
        let id = app.active_tasks()[0].id.clone();
        app.set_status(&id, TaskStatus::Completed).expect("status");
        assert_eq!(app.tasks_in_column(TaskStatus::Completed).len(), 1);

        app.import_from_text(csv).expect("reimport");
        assert!(app.tasks_in_column(TaskStatus::Completed).is_empty());
        assert!(app.active_tasks().iter().all(|task| task.id != id));
    }

    #[test]
    fn starting_work_without_selection_changes_nothing() {
        let mut app = make_test_app();
        app.import_from_text("Time,Today\n9,Write").expect("import");

        let err = app.start_timer().expect_err("needs task");
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::NoTaskSelected)
        ));
        assert_eq!(app.timer_remaining(), 0);
        assert!(!app.timer().is_running());
        assert_eq!(app.next_tick, None);
    }

    #[test]
    fn nth_completion_awards_n_points() {
        let mut app = make_test_app();
        app.work_minutes_input = "1".to_string();
        app.import_from_text("Time,Today\n1,a\n2,b\n3,c\n4,d").expect("import");
        let ids: Vec<String> = app.active_tasks().iter().map(|t| t.id.clone()).collect();
        app.set_status(&ids[1], TaskStatus::Completed).expect("status");
        app.set_status(&ids[3], TaskStatus::Completed).expect("status");

        app.toggle_select(&ids[0]);
        app.start_timer().expect("start");
        let outcome = finish_work(&mut app).expect("finished");

        assert_eq!(
            outcome,
            PeriodOutcome::TaskCompleted {
                desc: "a".to_string(),
                awarded: 3
            }
        );
        assert_eq!(app.reward_points(), 3);
        assert_eq!(app.selected_task(), None);
        assert_eq!(
            app.store().get(REWARD_POINTS_KEY).expect("get").as_deref(),
            Some("3")
        );
    }

    #[test]
    fn work_without_selection_only_flips_period() {
        let mut app = make_test_app();
        app.work_minutes_input = "1".to_string();
        app.import_from_text("Time,Today\n1,a").expect("import");
        let id = select_first(&mut app);
        app.start_timer().expect("start");
        app.toggle_select(&id);

        assert_eq!(finish_work(&mut app), Some(PeriodOutcome::WorkEnded));
        assert_eq!(app.reward_points(), 0);
        assert_eq!(app.timer().period(), Period::Break);
        assert_eq!(app.active_tasks()[0].status, TaskStatus::Todo);
    }

    #[test]
    fn claim_checks_balance_and_persists() {
        let mut app = app_with_points(5);
        let err = app.claim(8).expect_err("too expensive");
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::InsufficientPoints { .. })
        ));
        assert_eq!(app.reward_points(), 5);

        assert_eq!(app.claim(2).expect("claim"), 3);
        assert_eq!(
            app.store().get(REWARD_POINTS_KEY).expect("get").as_deref(),
            Some("3")
        );
    }

    #[test]
    fn cycle_day_wraps_around() {
        let mut app = make_test_app();
        app.import_from_text("Time,Sun,Mon,Tue\n9,a,b,c").expect("import");
        assert_eq!(app.active_day(), Some("mon"));

        app.cycle_day(true);
        assert_eq!(app.active_day(), Some("tue"));
        app.cycle_day(true);
        assert_eq!(app.active_day(), Some("sun"));
        app.cycle_day(false);
        assert_eq!(app.active_day(), Some("tue"));
    }

    #[test]
    fn rollover_follows_weekday_unless_today_column_exists() {
        let mut app = make_test_app();
        app.import_from_text("Time,Mon,Tue\n9,a,b").expect("import");
        assert!(app.roll_over_day(monday() + Duration::days(1)));
        assert_eq!(app.active_day(), Some("tue"));

        let mut pinned = make_test_app();
        pinned
            .import_from_text("Time,Today,Tue\n9,a,b")
            .expect("import");
        assert!(!pinned.roll_over_day(monday() + Duration::days(1)));
        assert_eq!(pinned.active_day(), Some("today"));
    }

    #[test]
    fn moving_a_card_follows_it_to_the_next_column() {
        let mut app = make_test_app();
        app.import_from_text("Time,Today\n9,a\n10,b").expect("import");
        let id = app.focused_card_id().expect("card");

        let moved = app.move_task(&id, MoveDirection::Right).expect("move");
        assert_eq!(moved, Some(TaskStatus::InProgress));
        app.follow_card(&id);

        assert_eq!(app.focus_column, TaskStatus::InProgress);
        assert_eq!(app.focused_card_id().as_deref(), Some(id.as_str()));
    }

    #[test]
    fn move_task_stops_at_board_edges() {
        let mut app = make_test_app();
        app.import_from_text("Time,Today\n9,a").expect("import");
        let id = app.active_tasks()[0].id.clone();

        assert_eq!(app.move_task(&id, MoveDirection::Left).expect("move"), None);
        assert_eq!(
            app.move_task(&id, MoveDirection::Right).expect("move"),
            Some(TaskStatus::InProgress)
        );
        assert_eq!(
            app.move_task(&id, MoveDirection::Right).expect("move"),
            Some(TaskStatus::Completed)
        );
        assert_eq!(app.move_task(&id, MoveDirection::Right).expect("move"), None);
        assert_eq!(app.progress_percent(), 100);
    }

    #[test]
    fn status_changes_are_saved_immediately() {
        let mut app = make_test_app();
        app.work_minutes_input = "1".to_string();
        app.import_from_text("Time,Today\n9,a\n10,b\n11,c").expect("import");
        let ids: Vec<String> = app.active_tasks().iter().map(|t| t.id.clone()).collect();

        app.set_status(&ids[0], TaskStatus::InProgress).expect("status");
        let saved = reload(&app);
        assert_eq!(saved.active_tasks()[0].status, TaskStatus::InProgress);

        app.move_task(&ids[1], MoveDirection::Right).expect("move");
        let saved = reload(&app);
        assert_eq!(saved.active_tasks()[1].status, TaskStatus::InProgress);

        app.toggle_select(&ids[2]);
        app.start_timer().expect("start");
        finish_work(&mut app).expect("finished");
        let saved = reload(&app);
        assert_eq!(saved.active_tasks()[2].status, TaskStatus::Completed);
        assert_eq!(saved.reward_points(), 1);
    }

    #[test]
    fn import_clears_selection() {
        let mut app = make_test_app();
        app.import_from_text("Time,Today\n9,a").expect("import");
        select_first(&mut app);
        assert!(app.selected_task().is_some());

        app.import_from_text("Time,Today\n9,b").expect("reimport");
        assert_eq!(app.selected_task(), None);
        assert_eq!(app.selected_task_desc(), None);
    }

    #[test]
    fn points_are_kept_when_schedule_save_fails() {
        let mut seed = MemoryStore::default();
        let schedule = import_schedule("Time,Today\n9,a").expect("import");
        storage::save_schedule(&mut seed, &schedule).expect("seed");
        let mut app = App::with_store(
            Config::default(),
            Box::new(ScheduleWritesFail(seed)),
            monday(),
        );
        app.work_minutes_input = "1".to_string();
        select_first(&mut app);
        app.start_timer().expect("start");

        let finished = finish_period(&mut app).expect("finished");
        assert_eq!(
            finished.outcome,
            PeriodOutcome::TaskCompleted {
                desc: "a".to_string(),
                awarded: 1
            }
        );
        assert!(matches!(finished.saved, Err(AppError::Storage(_))));
        assert_eq!(app.reward_points(), 1);
        assert_eq!(app.active_tasks()[0].status, TaskStatus::Completed);
        assert_eq!(
            app.store().get(REWARD_POINTS_KEY).expect("get").as_deref(),
            Some("1")
        );
    }

    #[test]
    fn state_reloads_from_store() {
        let mut store = MemoryStore::default();
        let mut first = App::with_store(Config::default(), Box::new(MemoryStore::default()), monday());
        first.import_from_text("Time,Mon\n9,a").expect("import");
        let blob = first.store().get(SCHEDULE_KEY).expect("get").expect("saved");
        store.set(SCHEDULE_KEY, &blob).expect("copy");

        let reloaded = App::with_store(Config::default(), Box::new(store), monday());
        assert_eq!(reloaded.active_day(), Some("mon"));
        assert_eq!(reloaded.active_tasks()[0].desc, "a");
    }
}
