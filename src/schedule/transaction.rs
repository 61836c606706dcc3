use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::RecurrenceError,
    recurrence::{generate, RecurrenceRule},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    #[default]
    Active,
    Paused,
    Completed,
}

/// A template transaction that repeats according to a [`RecurrenceRule`].
///
/// The rule's start date is occurrence 0; `recorded_dates` lists occurrences that
/// already exist as real transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ScheduleFields")]
pub struct ScheduledTransaction {
    pub id: Uuid,
    pub description: String,
    /// Magnitude; the sign comes from `kind`.
    pub amount: f64,
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub rule: RecurrenceRule,
    #[serde(default)]
    pub status: ScheduleStatus,
    #[serde(default)]
    pub recorded_dates: Vec<NaiveDate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleFields {
    id: Uuid,
    description: String,
    amount: f64,
    kind: TransactionKind,
    #[serde(default)]
    account_id: Option<Uuid>,
    #[serde(default)]
    category: Option<String>,
    rule: RecurrenceRule,
    #[serde(default)]
    status: ScheduleStatus,
    #[serde(default)]
    recorded_dates: Vec<NaiveDate>,
}

impl From<ScheduleFields> for ScheduledTransaction {
    fn from(fields: ScheduleFields) -> Self {
        let mut recorded_dates = fields.recorded_dates;
        recorded_dates.sort();
        recorded_dates.dedup();
        Self {
            id: fields.id,
            description: fields.description,
            amount: fields.amount.abs(),
            kind: fields.kind,
            account_id: fields.account_id,
            category: fields.category,
            rule: fields.rule,
            status: fields.status,
            recorded_dates,
        }
    }
}

impl ScheduledTransaction {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        kind: TransactionKind,
        rule: RecurrenceRule,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount: amount.abs(),
            kind,
            account_id: None,
            category: None,
            rule,
            status: ScheduleStatus::Active,
            recorded_dates: Vec::new(),
        }
    }

    pub fn with_account(mut self, account_id: Uuid) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, ScheduleStatus::Active)
    }

    /// Amount with income positive and expenses negative.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    /// The anchor date followed by every generated occurrence.
    pub fn occurrences(&self) -> Vec<NaiveDate> {
        let mut dates = Vec::with_capacity(self.rule.effective_count() as usize + 1);
        dates.push(self.rule.start_date());
        dates.extend(generate(&self.rule));
        dates
    }

    pub fn is_recorded(&self, date: NaiveDate) -> bool {
        self.recorded_dates.contains(&date)
    }

    /// Marks an occurrence as turned into a real transaction. Returns `false` when it
    /// was already recorded.
    pub fn record(&mut self, date: NaiveDate) -> Result<bool, RecurrenceError> {
        if !self.occurrences().contains(&date) {
            return Err(RecurrenceError::NotAnOccurrence(date));
        }
        if self.is_recorded(date) {
            return Ok(false);
        }
        self.recorded_dates.push(date);
        self.recorded_dates.sort();
        if self.recorded_dates.len() == self.rule.effective_count() as usize + 1 {
            self.status = ScheduleStatus::Completed;
            tracing::info!(schedule = %self.id, "all occurrences recorded; schedule completed");
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::Frequency;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rent() -> ScheduledTransaction {
        let rule = RecurrenceRule::new(Frequency::Monthly, 1, date(2024, 1, 31), 2).unwrap();
        ScheduledTransaction::new("Aluguel", -1500.0, TransactionKind::Expense, rule)
    }

    #[test]
    fn amount_is_stored_as_magnitude() {
        let txn = rent();
        assert_eq!(txn.amount, 1500.0);
        assert_eq!(txn.signed_amount(), -1500.0);
    }

    #[test]
    fn occurrences_start_with_the_anchor() {
        assert_eq!(
            rent().occurrences(),
            vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)]
        );
    }

    #[test]
    fn record_rejects_dates_off_the_schedule() {
        let mut txn = rent();
        assert_eq!(
            txn.record(date(2024, 2, 28)),
            Err(RecurrenceError::NotAnOccurrence(date(2024, 2, 28)))
        );
    }

    #[test]
    fn record_is_idempotent_and_completes_the_schedule() {
        let mut txn = rent();
        assert_eq!(txn.record(date(2024, 2, 29)), Ok(true));
        assert_eq!(txn.record(date(2024, 2, 29)), Ok(false));
        assert!(txn.is_active());
        txn.record(date(2024, 1, 31)).unwrap();
        txn.record(date(2024, 3, 31)).unwrap();
        assert_eq!(txn.status, ScheduleStatus::Completed);
    }
}
