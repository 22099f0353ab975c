//! Wake/sleep scheduling for a battery-powered e-paper photo frame.
//!
//! The frame deep-sleeps between image rotations; this crate computes how
//! many seconds to sleep given the local time, the rotation interval, a
//! clock-alignment preference, and an optional nightly sleep-schedule
//! window. Pure arithmetic over whole seconds: no clock access, no
//! allocation, no error path.

pub mod schedule;
pub mod wakeup;

// Re-exports for convenience
pub use schedule::SleepSchedule;
pub use wakeup::{MIN_ALIGNED_LEAD_SECONDS, next_wakeup_seconds};

/// Seconds in a civil day.
pub const SECONDS_PER_DAY: u32 = 86_400;
