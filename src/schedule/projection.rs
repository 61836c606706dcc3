use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use super::{
    transaction::{ScheduleStatus, ScheduledTransaction, TransactionKind},
    window::{DateWindow, ScheduledStatus},
};

const MAX_DUE_INSTANCES: usize = 1024;

/// One unrecorded occurrence of a schedule inside a projection window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedOccurrence {
    pub schedule_id: Uuid,
    pub occurrence_index: u32,
    pub date: NaiveDate,
    /// Income positive, expenses negative.
    pub amount: f64,
    pub status: ScheduledStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectionTotals {
    pub count: usize,
    pub inflow: f64,
    pub outflow: f64,
    pub net: f64,
}

impl ProjectionTotals {
    fn from_occurrences(occurrences: &[ProjectedOccurrence]) -> Self {
        let mut totals = ProjectionTotals {
            count: occurrences.len(),
            ..ProjectionTotals::default()
        };
        for item in occurrences {
            if item.amount >= 0.0 {
                totals.inflow += item.amount;
            } else {
                totals.outflow += item.amount.abs();
            }
        }
        totals.net = totals.inflow - totals.outflow;
        totals
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Projection {
    pub window: DateWindow,
    pub reference_date: NaiveDate,
    pub occurrences: Vec<ProjectedOccurrence>,
    pub totals: ProjectionTotals,
}

impl Projection {
    pub fn with_status(&self, status: ScheduledStatus) -> impl Iterator<Item = &ProjectedOccurrence> {
        self.occurrences
            .iter()
            .filter(move |item| item.status == status)
    }
}

/// An occurrence on or before the reference day that has not been recorded yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DueInstance {
    pub schedule_id: Uuid,
    pub occurrence_index: u32,
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub kind: TransactionKind,
    pub account_id: Option<Uuid>,
}

/// Criteria for narrowing a list of schedules. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ScheduleFilter {
    pub kind: Option<TransactionKind>,
    pub account_id: Option<Uuid>,
    pub status: Option<ScheduleStatus>,
    pub category: Option<String>,
}

impl ScheduleFilter {
    pub fn matches(&self, schedule: &ScheduledTransaction) -> bool {
        if self.kind.is_some_and(|kind| kind != schedule.kind) {
            return false;
        }
        if self.status.is_some_and(|status| status != schedule.status) {
            return false;
        }
        if self.account_id.is_some() && self.account_id != schedule.account_id {
            return false;
        }
        match (&self.category, &schedule.category) {
            (None, _) => true,
            (Some(wanted), Some(actual)) => wanted.eq_ignore_ascii_case(actual),
            (Some(_), None) => false,
        }
    }
}

pub fn filter<'a>(
    schedules: &'a [ScheduledTransaction],
    criteria: &ScheduleFilter,
) -> Vec<&'a ScheduledTransaction> {
    schedules
        .iter()
        .filter(|schedule| criteria.matches(schedule))
        .collect()
}

/// Lists the unrecorded occurrences of every active schedule that fall inside
/// `window`, classified against `reference`.
pub fn project(
    schedules: &[ScheduledTransaction],
    window: DateWindow,
    reference: NaiveDate,
) -> Projection {
    let mut occurrences = Vec::new();

    for schedule in schedules.iter().filter(|s| s.is_active()) {
        for (index, date) in schedule.occurrences().into_iter().enumerate() {
            if date >= window.end {
                break;
            }
            if !window.contains(date) || schedule.is_recorded(date) {
                continue;
            }
            occurrences.push(ProjectedOccurrence {
                schedule_id: schedule.id,
                occurrence_index: index as u32,
                date,
                amount: schedule.signed_amount(),
                status: ScheduledStatus::classify(date, reference),
            });
        }
    }

    occurrences.sort_by_key(|item| (item.date, item.schedule_id));
    let totals = ProjectionTotals::from_occurrences(&occurrences);
    tracing::debug!(
        start = %window.start,
        end = %window.end,
        projected = totals.count,
        "projected scheduled transactions"
    );

    Projection {
        window,
        reference_date: reference,
        occurrences,
        totals,
    }
}

/// Projection over the `days` days starting at `reference`.
pub fn upcoming(
    schedules: &[ScheduledTransaction],
    reference: NaiveDate,
    days: u32,
) -> Projection {
    project(schedules, DateWindow::starting_at(reference, days), reference)
}

/// Builds the occurrences that should already exist as real transactions by
/// `reference` but have not been recorded.
pub fn materialize_due(
    schedules: &[ScheduledTransaction],
    reference: NaiveDate,
) -> Vec<DueInstance> {
    let mut due = Vec::new();

    'schedules: for schedule in schedules.iter().filter(|s| s.is_active()) {
        for (index, date) in schedule.occurrences().into_iter().enumerate() {
            if date > reference {
                break;
            }
            if schedule.is_recorded(date) {
                continue;
            }
            due.push(DueInstance {
                schedule_id: schedule.id,
                occurrence_index: index as u32,
                date,
                description: schedule.description.clone(),
                amount: schedule.signed_amount(),
                kind: schedule.kind,
                account_id: schedule.account_id,
            });
            if due.len() >= MAX_DUE_INSTANCES {
                tracing::warn!(limit = MAX_DUE_INSTANCES, "due instance limit reached");
                break 'schedules;
            }
        }
    }

    due.sort_by_key(|item| (item.date, item.schedule_id));
    due
}
