//! Next-wakeup-time computation.

use chrono::{NaiveTime, Timelike};
use tracing::debug;

use crate::{SECONDS_PER_DAY, SleepSchedule};

/// Aligned wakeups closer than this are skipped to the following interval
/// boundary, so clock drift or an early wake never triggers an immediate
/// re-wake.
pub const MIN_ALIGNED_LEAD_SECONDS: u32 = 60;

/// Seconds until the next wake event.
///
/// `rotate_interval` is in seconds and must be positive. With `aligned`
/// set, wakeups snap to multiples of the interval measured from local
/// midnight; otherwise the interval is a flat offset from now. If the
/// candidate wake lands inside an enabled sleep-schedule window, it is
/// deferred to the window's end (for aligned mode, to the first interval
/// boundary at or after the end).
pub fn next_wakeup_seconds(
    now: NaiveTime,
    rotate_interval: u32,
    aligned: bool,
    sleep_schedule: Option<&SleepSchedule>,
) -> u32 {
    debug_assert!(rotate_interval > 0);
    let current = now.num_seconds_from_midnight();

    let seconds_until_next = if aligned {
        let mut next_aligned = ((current / rotate_interval) + 1) * rotate_interval;
        if next_aligned - current < MIN_ALIGNED_LEAD_SECONDS {
            next_aligned += rotate_interval;
        }
        next_aligned - current
    } else {
        rotate_interval
    };

    let Some(schedule) = sleep_schedule.filter(|s| s.enabled) else {
        return seconds_until_next;
    };

    let wake_seconds_of_day = (current + seconds_until_next) % SECONDS_PER_DAY;
    if !schedule.contains(wake_seconds_of_day) {
        return seconds_until_next;
    }

    // The candidate wake lands inside the sleep window; defer it to the
    // window's end. The end is exclusive, so waking exactly there is fine.
    let end = schedule.end_seconds();
    let deferred_wake_of_day = if aligned {
        // First interval boundary at or after the schedule end.
        (end + rotate_interval - 1) / rotate_interval * rotate_interval
    } else {
        end
    };

    let seconds_until_wake = if schedule.crosses_midnight() {
        if current >= schedule.start_seconds() {
            // In the window before midnight: sleep through midnight to the
            // deferred wake tomorrow.
            (SECONDS_PER_DAY - current) + deferred_wake_of_day
        } else if current < end {
            // In the window after midnight: the deferred wake is later today.
            deferred_wake_of_day - current
        } else {
            // Outside the window, but the candidate wake crossed into it:
            // roll to the deferred wake on the next day.
            (SECONDS_PER_DAY - current) + deferred_wake_of_day
        }
    } else if deferred_wake_of_day >= current {
        deferred_wake_of_day - current
    } else {
        // Candidate wrapped past midnight into a same-day window; the
        // deferred wake is tomorrow.
        (SECONDS_PER_DAY - current) + deferred_wake_of_day
    };

    debug!(
        current,
        seconds_until_next, deferred_wake_of_day, seconds_until_wake, "Wake deferred by schedule"
    );
    seconds_until_wake
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32, min: u32, sec: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, min, sec).unwrap()
    }

    fn overnight() -> SleepSchedule {
        SleepSchedule {
            enabled: true,
            start_minutes: 1380, // 23:00
            end_minutes: 420,    // 07:00
        }
    }

    #[test]
    fn test_aligned_one_hour_interval() {
        // 10:30 with hourly alignment wakes at 11:00.
        assert_eq!(next_wakeup_seconds(at(10, 30, 0), 3600, true, None), 1800);
    }

    #[test]
    fn test_aligned_thirty_minute_interval() {
        // 10:15 with half-hour alignment wakes at 10:30.
        assert_eq!(next_wakeup_seconds(at(10, 15, 0), 1800, true, None), 900);
    }

    #[test]
    fn test_aligned_fifteen_minute_interval() {
        // 10:07 wakes at 10:15.
        assert_eq!(next_wakeup_seconds(at(10, 7, 0), 900, true, None), 480);
    }

    #[test]
    fn test_disabled_schedule_is_ignored() {
        let schedule = SleepSchedule {
            enabled: false,
            ..overnight()
        };
        assert_eq!(
            next_wakeup_seconds(at(10, 30, 0), 3600, true, Some(&schedule)),
            1800
        );
    }

    #[test]
    fn test_drift_guard_skips_near_boundary() {
        // 16:59:20 is 40s from 17:00; under the 60s guard, skip to 18:00.
        assert_eq!(next_wakeup_seconds(at(16, 59, 20), 3600, true, None), 3640);
    }

    #[test]
    fn test_wake_outside_schedule_unaffected() {
        // 18:00 -> candidate 19:00, well before the 23:00 window.
        assert_eq!(
            next_wakeup_seconds(at(18, 0, 0), 3600, true, Some(&overnight())),
            3600
        );
    }

    #[test]
    fn test_wake_inside_overnight_schedule_defers_to_end() {
        // 22:30 -> candidate 23:00 is inside; wake 07:00 next day (8.5 h).
        assert_eq!(
            next_wakeup_seconds(at(22, 30, 0), 3600, true, Some(&overnight())),
            30600
        );
    }

    #[test]
    fn test_currently_inside_overnight_schedule() {
        // 02:00, inside 23:00-07:00; wake at 07:00 (5 h).
        assert_eq!(
            next_wakeup_seconds(at(2, 0, 0), 3600, true, Some(&overnight())),
            18000
        );
    }

    #[test]
    fn test_schedule_end_is_exclusive() {
        // 06:00 -> candidate 07:00 equals the window end, which is
        // allowed: no deferral.
        assert_eq!(
            next_wakeup_seconds(at(6, 0, 0), 3600, true, Some(&overnight())),
            3600
        );
    }

    #[test]
    fn test_aligned_deferral_ceils_to_interval_grid() {
        // Window ends 07:15; with a 2-hour grid the first boundary at or
        // after that is 08:00, so 22:00 sleeps 10 hours.
        let schedule = SleepSchedule {
            enabled: true,
            start_minutes: 1380,
            end_minutes: 435,
        };
        assert_eq!(
            next_wakeup_seconds(at(22, 0, 0), 7200, true, Some(&schedule)),
            36000
        );
    }

    #[test]
    fn test_exactly_at_midnight_inside_schedule() {
        // 00:00 inside 23:00-07:00; wake at 07:00.
        assert_eq!(
            next_wakeup_seconds(at(0, 0, 0), 3600, true, Some(&overnight())),
            25200
        );
    }

    #[test]
    fn test_same_day_schedule_defers_to_end() {
        // 11:30 -> candidate 12:00 is inside 12:00-14:00; wake 14:00 (2.5 h).
        let schedule = SleepSchedule {
            enabled: true,
            start_minutes: 720,
            end_minutes: 840,
        };
        assert_eq!(
            next_wakeup_seconds(at(11, 30, 0), 3600, true, Some(&schedule)),
            9000
        );
    }

    #[test]
    fn test_non_aligned_flat_interval() {
        // 18:05, no alignment: exactly one interval from now.
        assert_eq!(
            next_wakeup_seconds(at(18, 5, 0), 3600, false, Some(&overnight())),
            3600
        );
    }

    #[test]
    fn test_non_aligned_wake_inside_schedule() {
        // 22:30 + 1h = 23:30 inside the window; wake 07:00 next day.
        assert_eq!(
            next_wakeup_seconds(at(22, 30, 0), 3600, false, Some(&overnight())),
            30600
        );
    }

    #[test]
    fn test_non_aligned_currently_inside_schedule() {
        assert_eq!(
            next_wakeup_seconds(at(2, 0, 0), 3600, false, Some(&overnight())),
            18000
        );
    }

    #[test]
    fn test_non_aligned_same_day_schedule() {
        // 11:30 + 1h = 12:30 inside 12:00-14:00; wake exactly at 14:00.
        let schedule = SleepSchedule {
            enabled: true,
            start_minutes: 720,
            end_minutes: 840,
        };
        assert_eq!(
            next_wakeup_seconds(at(11, 30, 0), 3600, false, Some(&schedule)),
            9000
        );
    }

    #[test]
    fn test_candidate_wraps_into_same_day_window_next_day() {
        // 23:30 + 1h wraps to 00:30, inside the same-day window
        // 00:00-02:00; the deferred wake (02:00) is tomorrow.
        let schedule = SleepSchedule {
            enabled: true,
            start_minutes: 0,
            end_minutes: 120,
        };
        assert_eq!(
            next_wakeup_seconds(at(23, 30, 0), 3600, false, Some(&schedule)),
            // 30 min to midnight plus 2 h to the window end.
            1800 + 7200
        );
    }

    #[test]
    fn test_degenerate_window_never_defers() {
        let schedule = SleepSchedule {
            enabled: true,
            start_minutes: 600,
            end_minutes: 600,
        };
        assert_eq!(
            next_wakeup_seconds(at(9, 30, 0), 3600, true, Some(&schedule)),
            1800
        );
    }

    #[test]
    fn test_result_is_never_immediate() {
        // Sweep a day of aligned hourly calls; the drift guard keeps every
        // result at least 60 seconds out.
        for hour in 0..24 {
            for min in [0, 1, 29, 59] {
                for sec in [0, 1, 30, 59] {
                    let r = next_wakeup_seconds(at(hour, min, sec), 3600, true, None);
                    assert!(
                        (60..=7200).contains(&r),
                        "{hour:02}:{min:02}:{sec:02} -> {r}"
                    );
                }
            }
        }
    }
}
