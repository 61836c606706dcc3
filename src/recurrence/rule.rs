use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    calendar::{add_days, add_months_clamped},
    frequency::{Frequency, Step},
};
use crate::errors::RecurrenceError;

/// Upper bound on how many occurrences a single rule may produce.
pub const MAX_OCCURRENCES: u32 = 365;

/// Describes how a template transaction repeats after its anchor date.
///
/// Rules are validated on construction (and on deserialization), so every
/// instance has a positive interval and a representable final occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RuleFields", into = "RuleFields")]
pub struct RecurrenceRule {
    frequency: Frequency,
    interval: u32,
    start_date: NaiveDate,
    occurrence_count: u32,
    custom_days: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuleFields {
    frequency: Frequency,
    #[serde(default = "default_interval")]
    interval: u32,
    start_date: NaiveDate,
    occurrence_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom_days: Option<u32>,
}

fn default_interval() -> u32 {
    1
}

impl TryFrom<RuleFields> for RecurrenceRule {
    type Error = RecurrenceError;

    fn try_from(fields: RuleFields) -> Result<Self, Self::Error> {
        RecurrenceRule::new(
            fields.frequency,
            fields.interval,
            fields.start_date,
            fields.occurrence_count,
        )?
        .with_custom_days(fields.custom_days)
    }
}

impl From<RecurrenceRule> for RuleFields {
    fn from(rule: RecurrenceRule) -> Self {
        Self {
            frequency: rule.frequency,
            interval: rule.interval,
            start_date: rule.start_date,
            occurrence_count: rule.occurrence_count,
            custom_days: rule.custom_days,
        }
    }
}

impl RecurrenceRule {
    pub fn new(
        frequency: Frequency,
        interval: u32,
        start_date: NaiveDate,
        occurrence_count: u32,
    ) -> Result<Self, RecurrenceError> {
        if interval == 0 {
            return Err(RecurrenceError::InvalidInterval(interval));
        }
        let rule = Self {
            frequency,
            interval,
            start_date,
            occurrence_count,
            custom_days: None,
        };
        rule.ensure_in_range()?;
        Ok(rule)
    }

    /// Sets the day step used by [`Frequency::Custom`]. Ignored by other frequencies.
    pub fn with_custom_days(mut self, custom_days: Option<u32>) -> Result<Self, RecurrenceError> {
        if custom_days == Some(0) {
            return Err(RecurrenceError::InvalidCustomDays(0));
        }
        self.custom_days = custom_days;
        self.ensure_in_range()?;
        Ok(self)
    }

    /// Parses an ISO `YYYY-MM-DD` start date as typed by a user.
    pub fn parse_start_date(raw: &str) -> Result<NaiveDate, RecurrenceError> {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| RecurrenceError::InvalidDate(raw.trim().to_string()))
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// The count as requested, before the safety cap.
    pub fn occurrence_count(&self) -> u32 {
        self.occurrence_count
    }

    pub fn custom_days(&self) -> Option<u32> {
        self.custom_days
    }

    /// Number of occurrences that will actually be produced.
    pub fn effective_count(&self) -> u32 {
        self.occurrence_count.min(MAX_OCCURRENCES)
    }

    /// The step between consecutive occurrences with the interval applied.
    pub fn step(&self) -> Step {
        match (self.frequency, self.frequency.base_step()) {
            (Frequency::Custom, _) => Step::Days(self.custom_days.unwrap_or(self.interval)),
            (_, Step::Days(days)) => Step::Days(days.saturating_mul(self.interval)),
            (_, Step::Months(months)) => Step::Months(months.saturating_mul(self.interval)),
        }
    }

    /// The `index`-th occurrence after the anchor (index 1 is the first future date).
    /// Index 0 is the anchor itself.
    pub fn nth_occurrence(&self, index: u32) -> Option<NaiveDate> {
        match self.step() {
            Step::Days(days) => add_days(self.start_date, days as u64 * index as u64),
            Step::Months(months) => {
                let offset = u32::try_from(months as u64 * index as u64).ok()?;
                add_months_clamped(self.start_date, offset)
            }
        }
    }

    fn ensure_in_range(&self) -> Result<(), RecurrenceError> {
        match self.nth_occurrence(self.effective_count()) {
            Some(_) => Ok(()),
            None => Err(RecurrenceError::OutOfRange(self.start_date)),
        }
    }
}
