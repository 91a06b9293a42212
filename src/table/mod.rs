//! Head-to-head output table
//!
//! Flattened game records, final assembly and writers.

pub mod assemble;
pub mod output;
pub mod record;

pub use assemble::{Cell, GameRow, HeadToHeadTable, MissingPolicy};
pub use record::HeadToHeadRecord;
