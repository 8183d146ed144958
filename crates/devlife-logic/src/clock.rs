//! Simulated time, counted in whole minutes since the simulation epoch
//! (midnight of day 0).

use serde::{Deserialize, Serialize};

use crate::schedule::{format_clock, MINUTES_PER_DAY};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimClock {
    minute: u64,
}

impl SimClock {
    pub fn new(minute: u64) -> Self {
        Self { minute }
    }

    /// Clock at a minute of the given day.
    pub fn at(day: u64, minute_of_day: u32) -> Self {
        Self {
            minute: day * MINUTES_PER_DAY as u64 + (minute_of_day % MINUTES_PER_DAY) as u64,
        }
    }

    pub fn minute(&self) -> u64 {
        self.minute
    }

    pub fn advance(&mut self, minutes: u64) {
        self.minute += minutes;
    }

    pub fn day(&self) -> u64 {
        self.minute / MINUTES_PER_DAY as u64
    }

    pub fn minute_of_day(&self) -> u32 {
        minute_of_day(self.minute)
    }

    pub fn hour(&self) -> u32 {
        hour_of_day(self.minute)
    }

    /// `"Day 0 09:00"`.
    pub fn label(&self) -> String {
        format!("Day {} {}", self.day(), format_clock(self.minute_of_day()))
    }
}

pub fn minute_of_day(epoch_minute: u64) -> u32 {
    (epoch_minute % MINUTES_PER_DAY as u64) as u32
}

pub fn hour_of_day(epoch_minute: u64) -> u32 {
    minute_of_day(epoch_minute) / 60
}
