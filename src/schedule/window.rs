use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::RecurrenceError;

const PENDING_WINDOW_DAYS: u64 = 7;

/// Half-open date range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WindowBounds")]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Deserialize)]
struct WindowBounds {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<WindowBounds> for DateWindow {
    type Error = RecurrenceError;

    fn try_from(bounds: WindowBounds) -> Result<Self, Self::Error> {
        DateWindow::new(bounds.start, bounds.end)
    }
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RecurrenceError> {
        if end <= start {
            return Err(RecurrenceError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Window of `days` days beginning at `start`. At least one day long.
    pub fn starting_at(start: NaiveDate, days: u32) -> Self {
        let end = start
            .checked_add_days(Days::new(days.max(1) as u64))
            .unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

/// Where an unrecorded occurrence sits relative to a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduledStatus {
    Overdue,
    Pending,
    Future,
}

impl ScheduledStatus {
    pub fn classify(scheduled: NaiveDate, reference: NaiveDate) -> ScheduledStatus {
        if scheduled < reference {
            return ScheduledStatus::Overdue;
        }
        let pending_cutoff = reference
            .checked_add_days(Days::new(PENDING_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MAX);
        if scheduled <= pending_cutoff {
            ScheduledStatus::Pending
        } else {
            ScheduledStatus::Future
        }
    }
}
