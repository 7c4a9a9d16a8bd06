//! Read-side views over the application collection.
//!
//! Everything here is a pure function of a slice of applications (and, where
//! relevant, the current time). Nothing is cached or stored.

mod board;
mod filter;
mod stats;

pub use board::{BoardColumn, board_columns};
pub use filter::{ApplicationFilter, recent_applications, upcoming_interviews};
pub use stats::{MonthlyCount, PipelineStats, StatusCount, monthly_counts, status_breakdown};

/// Rounded percentage of `part` in `whole`; 0 when `whole` is 0.
pub(crate) fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}
