use std::time::Duration;

/// Questions drawn per session; smaller pools use the whole pool.
pub const DEFAULT_QUESTION_COUNT: usize = 10;

/// Flat score for a correct answer. No partial credit, no time bonus.
pub const POINTS_PER_CORRECT: u32 = 10;

/// Countdown resolution. Whole seconds, no partial-second precision.
pub const TIMER_TICK: Duration = Duration::from_secs(1);

/// Mandatory pause between answering and advancing. The next countdown
/// arms only after this elapses.
pub const ADVANCE_DELAY: Duration = Duration::from_millis(2500);

pub const DEFAULT_CATALOG_FILE: &str = "questions.json";
