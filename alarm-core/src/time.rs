//! # Time of day
//! Clock times without a date component, and the comparison used to decide if an alarm is due.

use crate::error::AlarmError;

/// A wall-clock time of day (hour, minute, second), without date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeOfDay {
    /// Hour, 0-23
    hour: u8,
    /// Minute, 0-59
    minute: u8,
    /// Second, 0-59
    second: u8,
}

impl TimeOfDay {
    /// Midnight, 00:00:00
    pub const MIDNIGHT: Self = Self {
        hour: 0,
        minute: 0,
        second: 0,
    };

    /// Create a new `TimeOfDay`, validating the ranges of all fields.
    ///
    /// # Errors
    /// Returns [`AlarmError::InvalidTime`] if the hour is above 23 or the minute or second above 59.
    pub const fn new(hour: u8, minute: u8, second: u8) -> Result<Self, AlarmError> {
        if hour > 23 || minute > 59 || second > 59 {
            return Err(AlarmError::InvalidTime {
                hour,
                minute,
                second,
            });
        }
        Ok(Self {
            hour,
            minute,
            second,
        })
    }

    /// Create a `TimeOfDay` at the start of the given minute.
    ///
    /// # Errors
    /// Same as [`TimeOfDay::new`].
    pub const fn hm(hour: u8, minute: u8) -> Result<Self, AlarmError> {
        Self::new(hour, minute, 0)
    }

    /// Get the hour
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// Get the minute
    pub const fn minute(&self) -> u8 {
        self.minute
    }

    /// Get the second
    pub const fn second(&self) -> u8 {
        self.second
    }

    /// Compare the fields selected by `precision`. The date never takes part in the comparison.
    pub const fn matches(&self, other: &Self, precision: Precision) -> bool {
        let same_minute = self.hour == other.hour && self.minute == other.minute;
        match precision {
            Precision::Second => same_minute && self.second == other.second,
            Precision::Minute => same_minute,
        }
    }
}

/// Which fields of the time of day are compared when matching an alarm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Precision {
    /// Hour, minute and second must match: the alarm is due for exactly one second per day.
    #[default]
    Second,
    /// Hour and minute must match: the alarm is due during the whole matching minute,
    /// so a fast polling loop sees it due on every cycle within that minute.
    Minute,
}

/// A source of the current wall-clock time of day, like a real time clock.
pub trait WallClock {
    /// Error raised when the clock cannot be read, e.g. because it is not running yet
    type Error;

    /// Read the current time of day
    ///
    /// # Errors
    /// Returns the clock specific error if the time cannot be read.
    fn now(&mut self) -> Result<TimeOfDay, Self::Error>;
}
