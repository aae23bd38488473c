//! # Alarm policy
//! The configuration that selects how the alarm manager evaluates alarms and drives its output line.
//!
//! Three presets cover the behaviours the controller has shipped with:
//!
//! | preset                          | alarms | precision | `enabled` gates due check | tick          |
//! |---------------------------------|--------|-----------|---------------------------|---------------|
//! | [`AlarmPolicy::multi_alarm`]    | 4      | second    | no                        | decoupled     |
//! | [`AlarmPolicy::single_second`]  | 1      | second    | yes                       | decoupled     |
//! | [`AlarmPolicy::single_minute`]  | 1      | minute    | yes                       | self-contained|

use crate::manager::NB_ALARMES_MAX;
use crate::time::Precision;

/// Polling periods of the alarm loop must stay below this many milliseconds, so that
/// every second of the day is seen by at least one cycle.
pub const POLL_INTERVAL_LIMIT_MS: u64 = 1000;

/// Whether an alarm loop polling every `ms` milliseconds can match alarms to the second
pub const fn is_valid_poll_interval_ms(ms: u64) -> bool {
    ms > 0 && ms < POLL_INTERVAL_LIMIT_MS
}

/// How the output line is driven on each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputDrive {
    /// The tick writes the stored `active` flag to the line. Whoever polls the due check decides
    /// when to set or clear `active`.
    Decoupled,
    /// The tick evaluates the alarms itself and writes the result to the line, every cycle.
    /// There is no separately settable `active` flag.
    SelfContained,
}

/// Policy of an alarm manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmPolicy {
    /// Fields compared when matching an alarm against the current time
    pub precision: Precision,
    /// How the tick drives the output line
    pub drive: OutputDrive,
    /// Whether a disabled alarm is excluded from the due check
    pub honor_enabled: bool,
    /// Maximum number of alarms, clamped to the storage capacity of the manager
    pub max_alarms: usize,
}

impl AlarmPolicy {
    /// Create a new policy
    pub const fn new(precision: Precision, drive: OutputDrive, honor_enabled: bool, max_alarms: usize) -> Self {
        Self {
            precision,
            drive,
            honor_enabled,
            max_alarms,
        }
    }

    /// Up to four alarms, matched to the second regardless of their enabled flag.
    /// The caller asserts the output after a positive due check.
    pub const fn multi_alarm() -> Self {
        Self::new(Precision::Second, OutputDrive::Decoupled, false, NB_ALARMES_MAX)
    }

    /// One alarm, matched to the second when enabled. The caller asserts the output after a positive due check.
    pub const fn single_second() -> Self {
        Self::new(Precision::Second, OutputDrive::Decoupled, true, 1)
    }

    /// One alarm, matched to the minute when enabled. The tick drives the output on its own,
    /// high for the whole matching minute.
    pub const fn single_minute() -> Self {
        Self::new(Precision::Minute, OutputDrive::SelfContained, true, 1)
    }

    /// The preset named by a configuration variant: `multi`, `single_second` or `single_minute`
    pub fn from_variant(name: &str) -> Option<Self> {
        match name {
            "multi" => Some(Self::multi_alarm()),
            "single_second" => Some(Self::single_second()),
            "single_minute" => Some(Self::single_minute()),
            _ => None,
        }
    }
}

impl Default for AlarmPolicy {
    fn default() -> Self {
        Self::multi_alarm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_map_to_presets() {
        assert_eq!(AlarmPolicy::from_variant("multi"), Some(AlarmPolicy::multi_alarm()));
        assert_eq!(AlarmPolicy::from_variant("single_second"), Some(AlarmPolicy::single_second()));
        assert_eq!(AlarmPolicy::from_variant("single_minute"), Some(AlarmPolicy::single_minute()));
        assert_eq!(AlarmPolicy::from_variant("Multi"), None);
        assert_eq!(AlarmPolicy::from_variant(""), None);
    }

    #[test]
    fn single_variants_hold_one_alarm() {
        for name in ["single_second", "single_minute"] {
            assert_eq!(AlarmPolicy::from_variant(name).map(|p| p.max_alarms), Some(1));
        }
        assert_eq!(AlarmPolicy::from_variant("multi").map(|p| p.max_alarms), Some(NB_ALARMES_MAX));
    }

    #[test]
    fn poll_interval_stays_below_one_second() {
        assert!(is_valid_poll_interval_ms(1));
        assert!(is_valid_poll_interval_ms(250));
        assert!(is_valid_poll_interval_ms(999));
        assert!(!is_valid_poll_interval_ms(1000));
        assert!(!is_valid_poll_interval_ms(0));
    }
}
