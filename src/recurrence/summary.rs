//! Human-readable labels for recurrence rules.

use super::{frequency::Frequency, rule::RecurrenceRule};

const DAYS_PER_MONTH: u64 = 30;
const DAYS_PER_YEAR: u64 = 365;

/// Short label such as `Mensal` or `A cada 3 meses`.
pub fn describe(rule: &RecurrenceRule) -> String {
    let interval = rule.interval();
    let (single, unit) = match rule.frequency() {
        Frequency::Custom => {
            let days = rule.custom_days().unwrap_or(interval);
            return format!("A cada {}", plural(days as u64, "dia", "dias"));
        }
        Frequency::Daily => ("Diário", "dias"),
        Frequency::Weekly => ("Semanal", "semanas"),
        Frequency::Biweekly => ("Quinzenal", "quinzenas"),
        Frequency::Monthly => ("Mensal", "meses"),
        Frequency::Quarterly => ("Trimestral", "trimestres"),
        Frequency::Semiannual => ("Semestral", "semestres"),
        Frequency::Yearly => ("Anual", "anos"),
    };

    if interval == 1 {
        single.to_string()
    } else {
        format!("A cada {interval} {unit}")
    }
}

/// Approximate number of days covered by all capped occurrences of `rule`.
pub fn estimated_days(rule: &RecurrenceRule) -> u64 {
    let per_step = match rule.frequency() {
        Frequency::Custom => rule.custom_days().unwrap_or(rule.interval()) as u64,
        frequency => frequency.approx_days() * rule.interval() as u64,
    };
    per_step * rule.effective_count() as u64
}

/// Rough total span of the rule, e.g. `aproximadamente 1 ano e 2 meses`.
pub fn estimate_duration(rule: &RecurrenceRule) -> String {
    format_days(estimated_days(rule))
}

fn format_days(days: u64) -> String {
    if days == 0 {
        return "0 dias".into();
    }
    if days < DAYS_PER_MONTH {
        return plural(days, "dia", "dias");
    }
    if days < DAYS_PER_YEAR {
        let months = rounded_months(days).max(1);
        return format!("aproximadamente {}", plural(months, "mês", "meses"));
    }

    let mut years = days / DAYS_PER_YEAR;
    let mut months = rounded_months(days % DAYS_PER_YEAR);
    if months >= 12 {
        years += 1;
        months = 0;
    }
    let mut label = format!("aproximadamente {}", plural(years, "ano", "anos"));
    if months > 0 {
        label.push_str(&format!(" e {}", plural(months, "mês", "meses")));
    }
    label
}

fn rounded_months(days: u64) -> u64 {
    (days + DAYS_PER_MONTH / 2) / DAYS_PER_MONTH
}

fn plural(count: u64, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn rule(frequency: Frequency, interval: u32, count: u32) -> RecurrenceRule {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        RecurrenceRule::new(frequency, interval, start, count).unwrap()
    }

    #[test]
    fn describes_single_intervals() {
        assert_eq!(describe(&rule(Frequency::Monthly, 1, 3)), "Mensal");
        assert_eq!(describe(&rule(Frequency::Biweekly, 1, 3)), "Quinzenal");
        assert_eq!(describe(&rule(Frequency::Yearly, 1, 3)), "Anual");
    }

    #[test]
    fn describes_multiplied_intervals() {
        assert_eq!(describe(&rule(Frequency::Monthly, 3, 3)), "A cada 3 meses");
        assert_eq!(describe(&rule(Frequency::Weekly, 2, 3)), "A cada 2 semanas");
        assert_eq!(describe(&rule(Frequency::Quarterly, 2, 3)), "A cada 2 trimestres");
    }

    #[test]
    fn describes_custom_steps() {
        let custom = rule(Frequency::Custom, 1, 3);
        assert_eq!(describe(&custom), "A cada 1 dia");
        let custom = custom.with_custom_days(Some(10)).unwrap();
        assert_eq!(describe(&custom), "A cada 10 dias");
        assert_eq!(describe(&rule(Frequency::Custom, 3, 3)), "A cada 3 dias");
        assert_eq!(describe(&rule(Frequency::Daily, 3, 3)), "A cada 3 dias");
    }

    #[test]
    fn estimates_short_spans_in_days() {
        assert_eq!(estimate_duration(&rule(Frequency::Daily, 1, 0)), "0 dias");
        assert_eq!(estimate_duration(&rule(Frequency::Daily, 1, 1)), "1 dia");
        assert_eq!(estimate_duration(&rule(Frequency::Weekly, 1, 3)), "21 dias");
    }

    #[test]
    fn estimates_medium_spans_in_months() {
        assert_eq!(
            estimate_duration(&rule(Frequency::Monthly, 1, 1)),
            "aproximadamente 1 mês"
        );
        assert_eq!(
            estimate_duration(&rule(Frequency::Monthly, 1, 6)),
            "aproximadamente 6 meses"
        );
    }

    #[test]
    fn estimates_long_spans_in_years_and_months() {
        assert_eq!(
            estimate_duration(&rule(Frequency::Yearly, 1, 2)),
            "aproximadamente 2 anos"
        );
        // 14 * 30 = 420 days -> 1 year and 55 days.
        assert_eq!(
            estimate_duration(&rule(Frequency::Monthly, 1, 14)),
            "aproximadamente 1 ano e 2 meses"
        );
        // 728 days: the 363-day remainder rounds up to a whole year.
        assert_eq!(
            estimate_duration(&rule(Frequency::Weekly, 1, 104)),
            "aproximadamente 2 anos"
        );
    }

    #[test]
    fn estimate_respects_the_occurrence_cap() {
        assert_eq!(estimated_days(&rule(Frequency::Daily, 1, 1000)), 365);
    }
}
