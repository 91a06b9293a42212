//! Data ingestion
//!
//! Schedule log discovery, CSV parsing and the rolling stat schema.

pub mod schedule;
pub mod stats;
pub mod store;

pub use schedule::{LogId, ScheduleLog, ScheduleRow};
pub use stats::{Metric, RollingStats, Window};
pub use store::{LoadReport, LogMap, LogStore};
