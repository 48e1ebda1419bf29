//! CSV text to day-keyed schedule.
//!
//! Lines are split on commas with no quote handling, so a comma inside a
//! cell shifts the remaining columns.

use crate::error::ImportError;
use crate::models::{Schedule, TODAY_KEY, Task, TaskStatus};
use rand::Rng;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

const HEADER_TOKENS: [&str; 11] = [
    "sun", "mon", "tue", "wed", "thu", "fri", "sat", "today", "tod", "current", "cur",
];
const TODAY_ALIASES: [&str; 4] = ["today", "tod", "current", "cur"];
const WEEKDAYS: [(&str, &str); 7] = [
    ("sun", "sunday"),
    ("mon", "monday"),
    ("tue", "tuesday"),
    ("wed", "wednesday"),
    ("thu", "thursday"),
    ("fri", "friday"),
    ("sat", "saturday"),
];
const EXTRA_ABBREVIATIONS: [(&str, &str); 3] = [("weds", "wed"), ("thr", "thu"), ("thrs", "thu")];
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 9;

fn non_letters() -> &'static Regex {
    static NON_LETTERS: OnceLock<Regex> = OnceLock::new();
    NON_LETTERS.get_or_init(|| Regex::new(r"[^a-z]").expect("Valid regex pattern"))
}

/// Lowercases and drops everything outside `a-z`.
pub fn clean_header_cell(cell: &str) -> String {
    non_letters()
        .replace_all(&cell.to_lowercase(), "")
        .into_owned()
}

/// Maps a header cell to its day key. Unrecognised headers keep their cleaned
/// text as a key of their own.
pub fn canonical_day(cell: &str) -> String {
    let clean = clean_header_cell(cell);
    if TODAY_ALIASES.contains(&clean.as_str()) {
        return TODAY_KEY.to_string();
    }
    for (code, full) in WEEKDAYS {
        if clean.len() >= 3 && clean.starts_with(code) && full.starts_with(clean.as_str()) {
            return code.to_string();
        }
    }
    // Abbreviations that are not a prefix of the full name.
    if let Some((_, code)) = EXTRA_ABBREVIATIONS.iter().find(|(abbr, _)| *abbr == clean) {
        return code.to_string();
    }
    clean
}

pub fn split_rows(text: &str) -> Vec<Vec<String>> {
    text.split(['\n', '\r'])
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split(',').map(|cell| cell.trim().to_string()).collect())
        .collect()
}

/// Index of the first row naming a day in column 1 or later; row 0 otherwise.
pub fn find_header_row(rows: &[Vec<String>]) -> usize {
    rows.iter()
        .position(|row| {
            row.iter()
                .skip(1)
                .any(|cell| HEADER_TOKENS.contains(&clean_header_cell(cell).as_str()))
        })
        .unwrap_or(0)
}

/// Generates `task-xxxxxxxxx` ids that do not collide with any id handed out
/// by the same generator.
#[derive(Default)]
pub struct IdGenerator {
    issued: HashSet<String>,
}

impl IdGenerator {
    pub fn next_id(&mut self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let suffix: String = (0..ID_LEN)
                .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
                .collect();
            let id = format!("task-{suffix}");
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }
}

/// Builds a fresh schedule from raw CSV text.
pub fn import_schedule(text: &str) -> Result<Schedule, ImportError> {
    let rows = split_rows(text);
    if rows.is_empty() {
        return Err(ImportError::EmptyInput);
    }

    let header_index = find_header_row(&rows);
    let header = &rows[header_index];
    if header.len() < 2 {
        return Err(ImportError::NoDayColumns);
    }

    let columns: Vec<(usize, String)> = header
        .iter()
        .enumerate()
        .skip(1)
        .map(|(col, cell)| (col, canonical_day(cell)))
        .collect();

    let mut schedule = Schedule::new();
    for (_, key) in &columns {
        schedule.ensure_day(key);
    }

    let mut ids = IdGenerator::default();
    for (col, key) in &columns {
        for row in rows.iter().skip(header_index + 1) {
            let Some(desc) = row.get(*col).filter(|cell| !cell.is_empty()) else {
                continue;
            };
            let time = row.first().cloned().unwrap_or_default();
            schedule.push_task(
                key,
                Task {
                    id: ids.next_id(),
                    time,
                    desc: desc.clone(),
                    status: TaskStatus::Todo,
                },
            );
        }
    }

    tracing::debug!(
        header_row = header_index,
        days = columns.len(),
        tasks = schedule.task_count(),
        "parsed schedule"
    );
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descs(schedule: &Schedule, key: &str) -> Vec<String> {
        schedule
            .tasks(key)
            .unwrap_or_default()
            .iter()
            .map(|task| task.desc.clone())
            .collect()
    }

    #[test]
    fn imports_weekday_and_today_columns() {
        let schedule =
            import_schedule("Time,Sat,Sun,Today\n9am,Gym,Church,Write report").expect("import");

        assert_eq!(schedule.day_keys(), vec!["sat", "sun", "today"]);
        for (key, desc) in [("sat", "Gym"), ("sun", "Church"), ("today", "Write report")] {
            let tasks = schedule.tasks(key).expect("day present");
            assert_eq!(tasks.len(), 1);
            assert_eq!(tasks[0].time, "9am");
            assert_eq!(tasks[0].desc, desc);
            assert_eq!(tasks[0].status, TaskStatus::Todo);
        }
    }

    #[test]
    fn header_row_found_after_leading_notes() {
        let text = "Weekly plan,,\nnotes,whatever,\nTime,Mon,Tue\n8:00,Run,\n9:00,Read,Swim\n";
        let rows = split_rows(text);
        assert_eq!(find_header_row(&rows), 2);

        let schedule = import_schedule(text).expect("import");
        assert_eq!(descs(&schedule, "mon"), vec!["Run", "Read"]);
        assert_eq!(descs(&schedule, "tue"), vec!["Swim"]);
    }

    #[test]
    fn falls_back_to_first_row_without_day_tokens() {
        let schedule = import_schedule("Slot,Project A,Project B\n1,Plan,\n2,,Ship").expect("import");
        assert_eq!(schedule.day_keys(), vec!["projecta", "projectb"]);
        assert_eq!(descs(&schedule, "projecta"), vec!["Plan"]);
        assert_eq!(descs(&schedule, "projectb"), vec!["Ship"]);
    }

    #[test]
    fn canonicalizes_full_names_and_aliases() {
        assert_eq!(canonical_day("Monday"), "mon");
        assert_eq!(canonical_day(" WED. "), "wed");
        assert_eq!(canonical_day("Tues"), "tue");
        assert_eq!(canonical_day("Thurs"), "thu");
        assert_eq!(canonical_day("Current"), "today");
        assert_eq!(canonical_day("tod"), "today");
        assert_eq!(canonical_day("Week 3"), "week");
        assert_eq!(canonical_day("Month"), "month");
    }

    #[test]
    fn name_like_headers_keep_their_own_key() {
        for name in ["Mona", "Satya", "Satay", "Fria", "Sunny", "Wedding"] {
            assert_eq!(canonical_day(name), clean_header_cell(name));
        }
        assert_eq!(canonical_day("Weds"), "wed");

        let schedule = import_schedule("Time,Mon,Mona,Satya\n9,a,b,c").expect("import");
        assert_eq!(schedule.day_keys(), vec!["mon", "mona", "satya"]);
        assert_eq!(descs(&schedule, "mon"), vec!["a"]);
        assert_eq!(descs(&schedule, "mona"), vec!["b"]);
    }

    #[test]
    fn duplicate_day_columns_concatenate_column_then_row() {
        let text = "Time,Today,Today\n9,A,B\n10,C,D";
        let schedule = import_schedule(text).expect("import");
        assert_eq!(schedule.day_keys(), vec!["today"]);
        assert_eq!(descs(&schedule, "today"), vec!["A", "C", "B", "D"]);
    }

    #[test]
    fn empty_columns_still_create_days() {
        let schedule = import_schedule("Time,Mon,Fri\n9,Write,").expect("import");
        assert_eq!(schedule.day_keys(), vec!["mon", "fri"]);
        assert!(schedule.tasks("fri").is_some_and(|tasks| tasks.is_empty()));
    }

    #[test]
    fn lengths_match_non_empty_cells() {
        let text = "Time,Mon,Tue,Wed\r\n1,a,,c\r\n2,,b,\r\n\r\n3,d,e\r\n4,,,f";
        let schedule = import_schedule(text).expect("import");
        assert_eq!(schedule.tasks("mon").map(|t| t.len()), Some(2));
        assert_eq!(schedule.tasks("tue").map(|t| t.len()), Some(2));
        assert_eq!(schedule.tasks("wed").map(|t| t.len()), Some(2));
    }

    #[test]
    fn blank_input_is_empty_error() {
        assert!(matches!(import_schedule(""), Err(ImportError::EmptyInput)));
        assert!(matches!(
            import_schedule("  \n\r\n  "),
            Err(ImportError::EmptyInput)
        ));
    }

    #[test]
    fn header_without_day_columns_is_rejected() {
        assert!(matches!(
            import_schedule("Time\n9am\n10am"),
            Err(ImportError::NoDayColumns)
        ));
    }

    #[test]
    fn ids_are_unique_and_prefixed() {
        let mut text = String::from("Time,Mon,Today\n");
        for i in 0..200 {
            text.push_str(&format!("{i},task {i},other {i}\n"));
        }
        let schedule = import_schedule(&text).expect("import");
        let mut seen = HashSet::new();
        for key in schedule.day_keys() {
            for task in schedule.tasks(&key).unwrap_or_default() {
                assert!(task.id.starts_with("task-"));
                assert_eq!(task.id.len(), "task-".len() + ID_LEN);
                assert!(seen.insert(task.id.clone()));
            }
        }
        assert_eq!(seen.len(), 400);
    }

    #[test]
    fn embedded_commas_shift_columns() {
        let schedule = import_schedule("Time,Mon,Tue\n9,Call Bob, Alice,Gym").expect("import");
        assert_eq!(descs(&schedule, "mon"), vec!["Call Bob"]);
        assert_eq!(descs(&schedule, "tue"), vec!["Alice"]);
    }
}
