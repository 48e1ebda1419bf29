use crate::error::ValidationError;

pub const DEFAULT_WORK_MINUTES: u64 = 25;
pub const DEFAULT_BREAK_MINUTES: u64 = 5;
pub const MAX_MINUTES: u64 = 999;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Period {
    Work,
    Break,
}

impl Period {
    pub fn label(&self) -> &'static str {
        match self {
            Period::Work => "Work",
            Period::Break => "Break",
        }
    }

    fn flipped(self) -> Period {
        match self {
            Period::Work => Period::Break,
            Period::Break => Period::Work,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// Reads a minutes field the way a browser number input would be read:
/// leading digits only, and anything empty, non-numeric or zero falls back.
/// Values are capped at `MAX_MINUTES`.
pub fn parse_minutes(input: &str, default: u64) -> u64 {
    let digits: String = input
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    match digits.parse::<u64>() {
        Ok(0) => default,
        Ok(minutes) => minutes.min(MAX_MINUTES),
        // Too many digits for u64.
        Err(_) if !digits.is_empty() => MAX_MINUTES,
        Err(_) => default,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Durations {
    pub work_minutes: u64,
    pub break_minutes: u64,
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
        }
    }
}

impl Durations {
    pub fn from_inputs(work: &str, brk: &str) -> Self {
        Self {
            work_minutes: parse_minutes(work, DEFAULT_WORK_MINUTES),
            break_minutes: parse_minutes(brk, DEFAULT_BREAK_MINUTES),
        }
    }

    fn seconds_for(&self, period: Period) -> u64 {
        match period {
            Period::Work => self.work_minutes.saturating_mul(60),
            Period::Break => self.break_minutes.saturating_mul(60),
        }
    }
}

/// Countdown for alternating work and break periods.
#[derive(Debug)]
pub struct Timer {
    state: TimerState,
    period: Period,
    remaining_secs: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self {
            state: TimerState::Idle,
            period: Period::Work,
            remaining_secs: 0,
        }
    }
}

impl Timer {
    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// A work period needs a selected task; breaks do not.
    pub fn start(&mut self, has_selection: bool, durations: Durations) -> Result<(), ValidationError> {
        if self.state == TimerState::Running {
            return Ok(());
        }
        if self.period == Period::Work && !has_selection {
            return Err(ValidationError::NoTaskSelected);
        }
        if self.remaining_secs == 0 {
            self.remaining_secs = durations.seconds_for(self.period);
        }
        self.state = TimerState::Running;
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
        }
    }

    pub fn reset(&mut self) {
        self.state = TimerState::Idle;
        self.period = Period::Work;
        self.remaining_secs = 0;
    }

    /// Advances one second. Returns the period that just finished, if any.
    pub fn tick(&mut self) -> Option<Period> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }
        let finished = self.period;
        self.state = TimerState::Idle;
        self.period = finished.flipped();
        Some(finished)
    }

    pub fn display(&self) -> String {
        format_clock(self.remaining_secs)
    }
}

pub fn format_clock(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Reward point balance. Only a claim can lower it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Wallet {
    balance: u64,
}

impl Wallet {
    pub fn new(balance: u64) -> Self {
        Self { balance }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn award(&mut self, points: u64) {
        self.balance = self.balance.saturating_add(points);
    }

    pub fn claim(&mut self, cost: u64) -> Result<u64, ValidationError> {
        if self.balance < cost {
            return Err(ValidationError::InsufficientPoints {
                balance: self.balance,
                cost,
            });
        }
        self.balance -= cost;
        Ok(self.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(timer: &mut Timer) -> Option<Period> {
        for _ in 0..10_000 {
            if let Some(finished) = timer.tick() {
                return Some(finished);
            }
        }
        None
    }

    #[test]
    fn work_start_without_selection_is_rejected() {
        let mut timer = Timer::default();
        let err = timer.start(false, Durations::default());
        assert!(matches!(err, Err(ValidationError::NoTaskSelected)));
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.remaining_secs(), 0);
    }

    #[test]
    fn start_loads_duration_once() {
        let mut timer = Timer::default();
        timer.start(true, Durations::default()).expect("start");
        assert_eq!(timer.remaining_secs(), 25 * 60);

        timer.tick();
        timer.pause();
        assert_eq!(timer.state(), TimerState::Paused);
        assert_eq!(timer.remaining_secs(), 25 * 60 - 1);

        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining_secs(), 25 * 60 - 1);

        timer.start(true, Durations::default()).expect("resume");
        assert_eq!(timer.remaining_secs(), 25 * 60 - 1);
    }

    #[test]
    fn finishing_work_flips_to_break() {
        let mut timer = Timer::default();
        let durations = Durations {
            work_minutes: 1,
            break_minutes: 2,
        };
        timer.start(true, durations).expect("start");

        assert_eq!(run_to_end(&mut timer), Some(Period::Work));
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.period(), Period::Break);
        assert_eq!(timer.remaining_secs(), 0);

        timer.start(false, durations).expect("break needs no task");
        assert_eq!(timer.remaining_secs(), 120);
        assert_eq!(run_to_end(&mut timer), Some(Period::Break));
        assert_eq!(timer.period(), Period::Work);
    }

    #[test]
    fn reset_returns_to_idle_work() {
        let mut timer = Timer::default();
        timer.start(true, Durations::default()).expect("start");
        run_to_end(&mut timer);
        timer.start(false, Durations::default()).expect("break");
        timer.reset();
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.period(), Period::Work);
        assert_eq!(timer.remaining_secs(), 0);
    }

    #[test]
    fn minutes_fall_back_on_bad_input() {
        assert_eq!(parse_minutes("", 25), 25);
        assert_eq!(parse_minutes("abc", 25), 25);
        assert_eq!(parse_minutes("0", 5), 5);
        assert_eq!(parse_minutes(" 40 ", 25), 40);
        assert_eq!(parse_minutes("15min", 25), 15);
    }

    #[test]
    fn oversized_minutes_are_capped() {
        assert_eq!(parse_minutes("5000", 25), MAX_MINUTES);
        assert_eq!(parse_minutes(&u64::MAX.to_string(), 25), MAX_MINUTES);
        assert_eq!(parse_minutes("99999999999999999999999", 25), MAX_MINUTES);

        let mut timer = Timer::default();
        let durations = Durations {
            work_minutes: u64::MAX / 10,
            break_minutes: 5,
        };
        timer.start(true, durations).expect("start");
        assert_eq!(timer.remaining_secs(), u64::MAX);
    }

    #[test]
    fn claim_requires_enough_points() {
        let mut wallet = Wallet::new(5);
        assert!(matches!(
            wallet.claim(8),
            Err(ValidationError::InsufficientPoints { balance: 5, cost: 8 })
        ));
        assert_eq!(wallet.balance(), 5);

        assert_eq!(wallet.claim(5).expect("claim"), 0);
        assert_eq!(wallet.balance(), 0);
    }

    #[test]
    fn clock_is_zero_padded() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(25 * 60), "25:00");
        assert_eq!(format_clock(61), "01:01");
    }
}
