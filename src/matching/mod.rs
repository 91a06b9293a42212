//! Game matching
//!
//! Pairs one-sided schedule rows into resolved head-to-head games.

pub mod aggregate;
pub mod key;
pub mod resolve;

pub use aggregate::{GameGroups, GroupEntry};
pub use key::GameKey;
pub use resolve::{resolve, Rejection, RejectionKind, ValidatedPair, Winner};
