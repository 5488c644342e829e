//! Export functionality for analysis
//!
//! CSV export of learning curves and genetic search histories, one row per
//! episode or generation.

mod curves;

pub use curves::{CurveRow, HistoryRow, write_history_csv, write_learning_curve_csv};
