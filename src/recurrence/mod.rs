//! Recurrence rules and the occurrence dates they project.

pub mod calendar;
pub mod frequency;
pub mod generator;
pub mod rule;
pub mod summary;

pub use frequency::{Frequency, Step};
pub use generator::{generate, generate_iso};
pub use rule::{RecurrenceRule, MAX_OCCURRENCES};
pub use summary::{describe, estimate_duration, estimated_days};
