use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strsim::levenshtein;

use crate::errors::RecurrenceError;

/// How often a recurring transaction repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Semiannual,
    Yearly,
    /// Steps by a caller-provided number of days.
    Custom,
}

/// Base unit a frequency advances by, before the interval multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Days(u32),
    Months(u32),
}

impl Frequency {
    pub const ALL: [Frequency; 8] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Biweekly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Semiannual,
        Frequency::Yearly,
        Frequency::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Semiannual => "semiannual",
            Frequency::Yearly => "yearly",
            Frequency::Custom => "custom",
        }
    }

    /// Step covered by one interval unit. `Custom` reports a single day; callers
    /// substitute the rule's own day step.
    pub fn base_step(&self) -> Step {
        match self {
            Frequency::Daily | Frequency::Custom => Step::Days(1),
            Frequency::Weekly => Step::Days(7),
            Frequency::Biweekly => Step::Days(14),
            Frequency::Monthly => Step::Months(1),
            Frequency::Quarterly => Step::Months(3),
            Frequency::Semiannual => Step::Months(6),
            Frequency::Yearly => Step::Months(12),
        }
    }

    /// Rough length of one step in days, used only for duration estimates.
    pub fn approx_days(&self) -> u64 {
        match self {
            Frequency::Daily | Frequency::Custom => 1,
            Frequency::Weekly => 7,
            Frequency::Biweekly => 14,
            Frequency::Monthly => 30,
            Frequency::Quarterly => 90,
            Frequency::Semiannual => 180,
            Frequency::Yearly => 365,
        }
    }

    fn closest(value: &str) -> Option<&'static str> {
        Frequency::ALL
            .iter()
            .map(|freq| (freq.as_str(), levenshtein(value, freq.as_str())))
            .filter(|(_, distance)| *distance <= 3)
            .min_by_key(|(_, distance)| *distance)
            .map(|(name, _)| name)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = RecurrenceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Frequency::ALL
            .iter()
            .copied()
            .find(|freq| freq.as_str() == normalized)
            .ok_or_else(|| RecurrenceError::UnknownFrequency {
                value: value.trim().to_string(),
                suggestion: Frequency::closest(&normalized),
            })
    }
}
