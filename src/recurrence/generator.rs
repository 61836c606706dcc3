use chrono::NaiveDate;

use super::rule::RecurrenceRule;

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Produces every future occurrence of `rule`, strictly after its start date and in
/// increasing order. The result holds `min(occurrence_count, MAX_OCCURRENCES)` dates.
///
/// Each occurrence is computed from the anchor rather than the previous date, so
/// month-based rules clamp short months without losing the anchor's day-of-month.
pub fn generate(rule: &RecurrenceRule) -> Vec<NaiveDate> {
    let dates: Vec<NaiveDate> = (1..=rule.effective_count())
        .map_while(|index| rule.nth_occurrence(index))
        .collect();
    tracing::debug!(
        frequency = %rule.frequency(),
        interval = rule.interval(),
        start = %rule.start_date(),
        generated = dates.len(),
        "generated recurrence dates"
    );
    dates
}

/// Same as [`generate`], rendered as `YYYY-MM-DD` strings.
pub fn generate_iso(rule: &RecurrenceRule) -> Vec<String> {
    generate(rule)
        .into_iter()
        .map(|date| date.format(ISO_DATE_FORMAT).to_string())
        .collect()
}
