//! Change detection module
//!
//! Tracks the last price seen per (item, source) pair and flags moves
//! whose percentage change meets a threshold.

mod change;

pub use change::{ChangeDetector, LastSeenState, NotableChange, Observation};
