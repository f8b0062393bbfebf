//! Monitor module
//!
//! The long-running sweep loop and the clock it runs on.

mod clock;
mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use scheduler::{Monitor, MonitorSettings, MonitorState, SweepReport};
