#![doc(test(attr(deny(warnings))))]

//! Recurrence Core projects recurring transactions into concrete occurrence dates,
//! labels recurrence rules for display, and aggregates scheduled transactions over
//! date windows. A small configuration layer and command shell sit on top.
//!
//! ```
//! use chrono::NaiveDate;
//! use recurrence_core::recurrence::{generate_iso, Frequency, RecurrenceRule};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
//! let rule = RecurrenceRule::new(Frequency::Monthly, 1, start, 3).unwrap();
//! assert_eq!(generate_iso(&rule), ["2024-02-29", "2024-03-31", "2024-04-30"]);
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod recurrence;
pub mod schedule;
pub mod time;
pub mod utils;

pub use errors::RecurrenceError;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Recurrence Core tracing initialized.");
    });
}
