//! Work schedule: work window, lunch window, and extra breaks.
//!
//! All times are minutes since midnight in `[0, 1440)`. The work window is
//! inclusive of its end minute; lunch and break windows are half-open.

use serde::{Deserialize, Serialize};

/// Minutes in one simulated day.
pub const MINUTES_PER_DAY: u32 = 1440;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakKind {
    Coffee,
    Rest,
    Custom,
}

/// An extra break beyond lunch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledBreak {
    pub time: u32,
    pub duration: u32,
    pub kind: BreakKind,
}

impl ScheduledBreak {
    pub fn contains(&self, minute_of_day: u32) -> bool {
        minute_of_day >= self.time && minute_of_day < self.end()
    }

    pub fn end(&self) -> u32 {
        self.time.saturating_add(self.duration)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub work_start: u32,
    pub work_end: u32,
    pub lunch_start: u32,
    pub lunch_duration: u32,
    pub breaks: Vec<ScheduledBreak>,
}

impl Default for Schedule {
    /// 09:00 to 18:00, lunch at 13:00 for an hour, coffee at 11:00 and 16:00.
    fn default() -> Self {
        Self {
            work_start: 540,
            work_end: 1080,
            lunch_start: 780,
            lunch_duration: 60,
            breaks: vec![
                ScheduledBreak {
                    time: 660,
                    duration: 15,
                    kind: BreakKind::Coffee,
                },
                ScheduledBreak {
                    time: 960,
                    duration: 15,
                    kind: BreakKind::Coffee,
                },
            ],
        }
    }
}

impl Schedule {
    pub fn is_work_time(&self, minute_of_day: u32) -> bool {
        minute_of_day >= self.work_start && minute_of_day <= self.work_end
    }

    pub fn is_lunch_time(&self, minute_of_day: u32) -> bool {
        minute_of_day >= self.lunch_start && minute_of_day < self.lunch_end()
    }

    pub fn is_break_time(&self, minute_of_day: u32) -> bool {
        self.active_break(minute_of_day).is_some()
    }

    /// First extra break whose window contains the minute.
    pub fn active_break(&self, minute_of_day: u32) -> Option<&ScheduledBreak> {
        self.breaks.iter().find(|b| b.contains(minute_of_day))
    }

    pub fn lunch_end(&self) -> u32 {
        self.lunch_start.saturating_add(self.lunch_duration)
    }

    /// Minutes left in the lunch window, zero outside it.
    pub fn lunch_minutes_remaining(&self, minute_of_day: u32) -> u32 {
        if self.is_lunch_time(minute_of_day) {
            self.lunch_end() - minute_of_day
        } else {
            0
        }
    }

    /// Minutes left in the active extra break, zero outside any.
    pub fn break_minutes_remaining(&self, minute_of_day: u32) -> u32 {
        self.active_break(minute_of_day)
            .map(|b| b.end() - minute_of_day)
            .unwrap_or(0)
    }

    /// Length of the work window in hours.
    pub fn work_hours(&self) -> f32 {
        self.work_end.saturating_sub(self.work_start) as f32 / 60.0
    }
}

/// Formats a minute of the day as `HH:MM`.
pub fn format_clock(minute_of_day: u32) -> String {
    let m = minute_of_day % MINUTES_PER_DAY;
    format!("{:02}:{:02}", m / 60, m % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_window_includes_end() {
        let s = Schedule::default();
        assert!(!s.is_work_time(539));
        assert!(s.is_work_time(540));
        assert!(s.is_work_time(1080));
        assert!(!s.is_work_time(1081));
    }

    #[test]
    fn lunch_window_is_half_open() {
        let s = Schedule::default();
        assert!(!s.is_lunch_time(779));
        assert!(s.is_lunch_time(780));
        assert!(s.is_lunch_time(839));
        assert!(!s.is_lunch_time(840));
        assert_eq!(s.lunch_minutes_remaining(780), 60);
        assert_eq!(s.lunch_minutes_remaining(839), 1);
        assert_eq!(s.lunch_minutes_remaining(700), 0);
    }

    #[test]
    fn breaks() {
        let s = Schedule::default();
        assert!(s.is_break_time(660));
        assert!(s.is_break_time(674));
        assert!(!s.is_break_time(675));
        assert!(s.is_break_time(960));
        assert!(!s.is_break_time(700));
        assert_eq!(s.break_minutes_remaining(665), 10);
        assert_eq!(s.break_minutes_remaining(700), 0);
    }

    #[test]
    fn scenario_at_eleven_forty() {
        let s = Schedule::default();
        assert!(s.is_work_time(700));
        assert!(!s.is_lunch_time(700));
        assert!(!s.is_break_time(700));
    }

    #[test]
    fn hours_and_format() {
        assert!((Schedule::default().work_hours() - 9.0).abs() < f32::EPSILON);
        assert_eq!(format_clock(540), "09:00");
        assert_eq!(format_clock(700), "11:40");
        assert_eq!(format_clock(1439), "23:59");
        assert_eq!(format_clock(1440 + 5), "00:05");
    }
}
