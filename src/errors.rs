use chrono::NaiveDate;
use thiserror::Error;

/// Error type that captures invalid recurrence input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecurrenceError {
    #[error("Unknown frequency `{value}`{}", suggestion_suffix(.suggestion))]
    UnknownFrequency {
        value: String,
        suggestion: Option<&'static str>,
    },
    #[error("Interval must be at least 1 (got {0})")]
    InvalidInterval(u32),
    #[error("Custom day step must be at least 1 (got {0})")]
    InvalidCustomDays(u32),
    #[error("Occurrences starting {0} run past the supported calendar range")]
    OutOfRange(NaiveDate),
    #[error("Invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid window: end {end} must be after start {start}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },
    #[error("{0} is not an occurrence of this schedule")]
    NotAnOccurrence(NaiveDate),
}

fn suggestion_suffix(suggestion: &Option<&'static str>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean `{name}`?)"),
        None => String::new(),
    }
}
