//! Scheduled (recurring) transactions and their projections over date windows.

pub mod projection;
pub mod transaction;
pub mod window;

pub use projection::{
    filter, materialize_due, project, upcoming, DueInstance, ProjectedOccurrence, Projection,
    ProjectionTotals, ScheduleFilter,
};
pub use transaction::{ScheduleStatus, ScheduledTransaction, TransactionKind};
pub use window::{DateWindow, ScheduledStatus};
