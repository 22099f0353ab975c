//! Daily sleep-schedule window.

use serde::{Deserialize, Serialize};

use crate::SECONDS_PER_DAY;

/// A recurring daily window during which scheduled wake-ups are deferred
/// to the window's end.
///
/// Expressed in minutes since local midnight. `start_minutes >
/// end_minutes` means the window crosses midnight (e.g. 23:00-07:00). The
/// end is exclusive: a wake exactly at the end boundary is allowed. A
/// window with `start_minutes == end_minutes` is treated as empty and
/// never defers anything; rejecting such configs is the config layer's
/// job, not this crate's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepSchedule {
    pub enabled: bool,
    pub start_minutes: u32,
    pub end_minutes: u32,
}

impl SleepSchedule {
    pub fn start_seconds(&self) -> u32 {
        self.start_minutes * 60
    }

    pub fn end_seconds(&self) -> u32 {
        self.end_minutes * 60
    }

    pub fn crosses_midnight(&self) -> bool {
        self.start_minutes > self.end_minutes
    }

    /// Whether a seconds-of-day instant falls inside the window.
    pub fn contains(&self, seconds_of_day: u32) -> bool {
        debug_assert!(seconds_of_day < SECONDS_PER_DAY);
        let start = self.start_seconds();
        let end = self.end_seconds();

        if self.crosses_midnight() {
            seconds_of_day >= start || seconds_of_day < end
        } else {
            seconds_of_day >= start && seconds_of_day < end
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(start_minutes: u32, end_minutes: u32) -> SleepSchedule {
        SleepSchedule {
            enabled: true,
            start_minutes,
            end_minutes,
        }
    }

    #[test]
    fn test_same_day_window() {
        let s = schedule(720, 840); // 12:00-14:00
        assert!(!s.crosses_midnight());
        assert!(!s.contains(720 * 60 - 1));
        assert!(s.contains(720 * 60)); // start inclusive
        assert!(s.contains(800 * 60));
        assert!(!s.contains(840 * 60)); // end exclusive
    }

    #[test]
    fn test_overnight_window() {
        let s = schedule(1380, 420); // 23:00-07:00
        assert!(s.crosses_midnight());
        assert!(s.contains(1380 * 60)); // 23:00
        assert!(s.contains(0)); // midnight
        assert!(s.contains(420 * 60 - 1)); // 06:59:59
        assert!(!s.contains(420 * 60)); // 07:00, end exclusive
        assert!(!s.contains(12 * 3600)); // noon
    }

    #[test]
    fn test_degenerate_window_is_empty() {
        let s = schedule(600, 600);
        assert!(!s.contains(600 * 60));
        assert!(!s.contains(0));
        assert!(!s.contains(SECONDS_PER_DAY - 1));
    }

    #[test]
    fn test_serde_round_trip_field_names() {
        let s = schedule(1380, 420);
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("start_minutes"));
        let back: SleepSchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
