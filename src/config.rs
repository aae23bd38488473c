//! # Configuration
//! The alarm configuration, generated by `build.rs` from `config/alarm_config.json`.
//!
//! make sure to have an `alarm_config.json` file in the config folder formatted as follows:
//!```json
//! {
//!     "variant": "multi",
//!     "poll_interval_ms": 250,
//!     "auto_silence_secs": 300,
//!     "alarms": [{ "hour": 7, "minute": 30, "second": 0, "enabled": true }],
//!     "initial_datetime": { "year": 2026, "month": 1, "day": 1, "day_of_week": 4, "hour": 6, "minute": 0, "second": 0 }
//! }
//! ```
//! `variant` is one of `multi`, `single_second` or `single_minute`. The single variants take one alarm,
//! `poll_interval_ms` must stay below 1000.

include!(concat!(env!("OUT_DIR"), "/alarm_config.rs"));

use alarm_core::{AlarmPolicy, AlarmRecord, OutputDrive, Precision, TimeOfDay};
use defmt::warn;
use embassy_rp::rtc::{DateTime, DayOfWeek};
use embassy_time::Duration;

/// Period of the alarm polling loop
pub const POLL_INTERVAL: Duration = Duration::from_millis(POLL_INTERVAL_MS);

/// Time after which a raised alarm is released if nobody silenced it
pub const AUTO_SILENCE: Duration = Duration::from_secs(AUTO_SILENCE_SECS);

/// The configured alarms. Entries that are not a valid time of day are skipped.
pub fn configured_alarms() -> impl Iterator<Item = AlarmRecord> {
    CONFIGURED_ALARMS
        .iter()
        .filter_map(|&(hour, minute, second, enabled)| match TimeOfDay::new(hour, minute, second) {
            Ok(time) => Some(AlarmRecord::new(time, enabled)),
            Err(e) => {
                warn!("Skipping configured alarm: {}", e);
                None
            }
        })
}

/// The date and time the RTC is started with
pub const fn initial_datetime() -> DateTime {
    let (year, month, day, day_of_week, hour, minute, second) = INITIAL_DATETIME;
    DateTime {
        year,
        month,
        day,
        day_of_week: match day_of_week {
            1 => DayOfWeek::Monday,
            2 => DayOfWeek::Tuesday,
            3 => DayOfWeek::Wednesday,
            4 => DayOfWeek::Thursday,
            5 => DayOfWeek::Friday,
            6 => DayOfWeek::Saturday,
            _ => DayOfWeek::Sunday,
        },
        hour,
        minute,
        second,
    }
}
