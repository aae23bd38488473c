//! Errors of the alarm core

use core::fmt;

/// Errors raised by alarm record access and time-of-day construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmError {
    /// An alarm index at or past the configured alarm count was used
    IndexOutOfRange {
        /// The index that was requested
        index: usize,
        /// The number of alarms configured when the request was made
        count: usize,
    },
    /// A time-of-day field is out of range (hour > 23, minute > 59 or second > 59)
    InvalidTime {
        /// The requested hour
        hour: u8,
        /// The requested minute
        minute: u8,
        /// The requested second
        second: u8,
    },
}

impl fmt::Display for AlarmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, count } => {
                write!(f, "alarm index {index} out of range, {count} alarm(s) configured")
            }
            Self::InvalidTime {
                hour,
                minute,
                second,
            } => write!(f, "invalid time of day {hour:02}:{minute:02}:{second:02}"),
        }
    }
}

impl core::error::Error for AlarmError {}
