//! # Alarm manager
//! Owns the alarm records and the output line of the sounding device.
//!
//! Each polling cycle the caller hands in the current time of day. Depending on the [`AlarmPolicy`],
//! the manager either only reports whether an alarm is due and leaves asserting the output to the caller
//! ([`OutputDrive::Decoupled`]), or evaluates and drives the line on its own ([`OutputDrive::SelfContained`]).
//!
//! The usual decoupled cycle is
//!
//! ```
//! # use alarm_core::{AlarmManager, AlarmPolicy, AlarmRecord, TimeOfDay};
//! # use core::convert::Infallible;
//! # struct Line;
//! # impl embedded_hal::digital::ErrorType for Line { type Error = Infallible; }
//! # impl embedded_hal::digital::OutputPin for Line {
//! #     fn set_low(&mut self) -> Result<(), Infallible> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Infallible> { Ok(()) }
//! # }
//! let mut manager: AlarmManager<Line> = AlarmManager::new(Line, AlarmPolicy::multi_alarm());
//! manager.add_alarm(AlarmRecord::new(TimeOfDay::hm(7, 30)?, true));
//!
//! let now = TimeOfDay::new(7, 30, 0)?;
//! if manager.is_any_alarm_due(now) {
//!     manager.set_output_active(true);
//! }
//! manager.tick(now).ok();
//! assert!(manager.is_output_active());
//! # Ok::<(), alarm_core::AlarmError>(())
//! ```
//!
//! which [`AlarmManager::run_cycle`] performs in one call.

use crate::error::AlarmError;
use crate::policy::{AlarmPolicy, OutputDrive};
use crate::time::TimeOfDay;
use embedded_hal::digital::{OutputPin, PinState};
use heapless::Vec;

/// Maximum number of alarms a manager stores
pub const NB_ALARMES_MAX: usize = 4;

/// One alarm: the time of day it fires at and whether it may fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmRecord {
    /// Time of day the alarm fires at
    pub time: TimeOfDay,
    /// Whether the alarm is eligible to fire
    pub enabled: bool,
}

impl AlarmRecord {
    /// Create a new `AlarmRecord`
    pub const fn new(time: TimeOfDay, enabled: bool) -> Self {
        Self { time, enabled }
    }
}

/// What happened during one [`AlarmManager::run_cycle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleOutcome {
    /// An alarm matched the current time
    pub due: bool,
    /// The level written to the output line
    pub asserted: bool,
    /// The output went from released to asserted in this cycle
    pub raised: bool,
}

/// Alarm manager, generic over the output line and the storage capacity.
pub struct AlarmManager<P, const N: usize = NB_ALARMES_MAX> {
    /// The output line of the sounding device, owned for the lifetime of the manager
    output: P,
    /// Evaluation and drive policy
    policy: AlarmPolicy,
    /// The configured alarms, in insertion order
    alarms: Vec<AlarmRecord, N>,
    /// Whether the output is currently asserted
    active: bool,
    /// Time of day of the last due check that asserted the output. While `now` still matches it,
    /// a released output is not asserted again.
    last_match: Option<TimeOfDay>,
}

impl<P: OutputPin, const N: usize> AlarmManager<P, N> {
    /// Create a new `AlarmManager` with no alarms and the output released.
    /// The line itself is written on the first [`tick`](Self::tick).
    pub const fn new(output: P, policy: AlarmPolicy) -> Self {
        Self {
            output,
            policy,
            alarms: Vec::new(),
            active: false,
            last_match: None,
        }
    }

    /// Get the policy
    pub const fn policy(&self) -> AlarmPolicy {
        self.policy
    }

    /// Get a reference to the output line
    pub const fn output(&self) -> &P {
        &self.output
    }

    /// Maximum number of alarms under the current policy
    pub fn capacity(&self) -> usize {
        self.policy.max_alarms.min(N)
    }

    /// Number of configured alarms
    pub fn alarm_count(&self) -> usize {
        self.alarms.len()
    }

    /// All configured alarms
    pub fn alarms(&self) -> &[AlarmRecord] {
        &self.alarms
    }

    /// Set the number of configured alarms.
    ///
    /// Shrinking drops the alarms at the end. Growing appends disabled alarms at midnight, which
    /// still take part in the due check when the policy ignores the enabled flag.
    /// A count above [`capacity`](Self::capacity) is ignored and the count stays unchanged.
    pub fn set_alarm_count(&mut self, count: usize) {
        if count > self.capacity() {
            #[cfg(feature = "defmt")]
            defmt::debug!(
                "alarm count {} ignored, capacity is {}",
                count,
                self.capacity()
            );
            return;
        }
        // cannot fail, count is within the storage capacity
        let _ = self
            .alarms
            .resize(count, AlarmRecord::new(TimeOfDay::MIDNIGHT, false));
    }

    /// Append an alarm. Returns false and leaves the alarms unchanged if the capacity is reached.
    pub fn add_alarm(&mut self, record: AlarmRecord) -> bool {
        if self.alarms.len() >= self.capacity() {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "alarm {} rejected, all {} slots in use",
                record,
                self.capacity()
            );
            return false;
        }
        self.alarms.push(record).is_ok()
    }

    /// Get the alarm at `index`
    ///
    /// # Errors
    /// Returns [`AlarmError::IndexOutOfRange`] if `index` is not below the alarm count.
    pub fn alarm(&self, index: usize) -> Result<AlarmRecord, AlarmError> {
        self.alarms
            .get(index)
            .copied()
            .ok_or(AlarmError::IndexOutOfRange {
                index,
                count: self.alarms.len(),
            })
    }

    /// Get the time of day of the alarm at `index`
    ///
    /// # Errors
    /// Returns [`AlarmError::IndexOutOfRange`] if `index` is not below the alarm count.
    pub fn alarm_time(&self, index: usize) -> Result<TimeOfDay, AlarmError> {
        self.alarm(index).map(|record| record.time)
    }

    /// Set the time of day of the alarm at `index`
    ///
    /// # Errors
    /// Returns [`AlarmError::IndexOutOfRange`] if `index` is not below the alarm count.
    pub fn set_alarm_time(&mut self, index: usize, time: TimeOfDay) -> Result<(), AlarmError> {
        self.record_mut(index)?.time = time;
        Ok(())
    }

    /// Whether the alarm at `index` is enabled
    ///
    /// # Errors
    /// Returns [`AlarmError::IndexOutOfRange`] if `index` is not below the alarm count.
    pub fn is_alarm_enabled(&self, index: usize) -> Result<bool, AlarmError> {
        self.alarm(index).map(|record| record.enabled)
    }

    /// Enable or disable the alarm at `index`
    ///
    /// # Errors
    /// Returns [`AlarmError::IndexOutOfRange`] if `index` is not below the alarm count.
    pub fn set_alarm_enabled(&mut self, index: usize, enabled: bool) -> Result<(), AlarmError> {
        self.record_mut(index)?.enabled = enabled;
        Ok(())
    }

    /// Flip the enabled flag of the alarm at `index` and return the new value
    ///
    /// # Errors
    /// Returns [`AlarmError::IndexOutOfRange`] if `index` is not below the alarm count.
    pub fn toggle_alarm_enabled(&mut self, index: usize) -> Result<bool, AlarmError> {
        let record = self.record_mut(index)?;
        record.enabled = !record.enabled;
        Ok(record.enabled)
    }

    /// Whether the output is asserted. Under [`OutputDrive::SelfContained`] this is the level of the last tick.
    pub const fn is_output_active(&self) -> bool {
        self.active
    }

    /// Assert or release the output on the next tick. Under [`OutputDrive::SelfContained`] the next tick
    /// overwrites this with its own evaluation.
    pub const fn set_output_active(&mut self, active: bool) {
        self.active = active;
    }

    /// True if any alarm matches `now` at the policy precision, whether enabled or not.
    pub fn is_any_alarm_due(&self, now: TimeOfDay) -> bool {
        let precision = self.policy.precision;
        self.alarms
            .iter()
            .any(|record| record.time.matches(&now, precision))
    }

    /// True if any enabled alarm matches `now` at the policy precision. Disabled alarms never match.
    pub fn is_due(&self, now: TimeOfDay) -> bool {
        let precision = self.policy.precision;
        self.alarms
            .iter()
            .any(|record| record.enabled && record.time.matches(&now, precision))
    }

    /// The due check selected by the policy: [`is_due`](Self::is_due) when the enabled flag is honored,
    /// [`is_any_alarm_due`](Self::is_any_alarm_due) otherwise.
    pub fn alarm_due(&self, now: TimeOfDay) -> bool {
        if self.policy.honor_enabled {
            self.is_due(now)
        } else {
            self.is_any_alarm_due(now)
        }
    }

    /// Drive the output line for this cycle and return the level written.
    ///
    /// Under [`OutputDrive::Decoupled`] the line follows the `active` flag and `now` is not looked at.
    /// Under [`OutputDrive::SelfContained`] the line is high exactly while an alarm is due at `now`.
    ///
    /// # Errors
    /// Returns the error of the output line if it cannot be written.
    pub fn tick(&mut self, now: TimeOfDay) -> Result<bool, P::Error> {
        if self.policy.drive == OutputDrive::SelfContained {
            self.active = self.alarm_due(now);
        }
        self.output.set_state(PinState::from(self.active))?;
        Ok(self.active)
    }

    /// Run one full polling cycle: evaluate the alarms, assert the output if one is due
    /// (decoupled drive only, releasing is left to the caller), then tick.
    ///
    /// A match asserts the output once. If the output is released while `now` still matches at the
    /// policy precision, later cycles within the same match report `due` but leave the output released.
    ///
    /// # Errors
    /// Returns the error of the output line if it cannot be written.
    pub fn run_cycle(&mut self, now: TimeOfDay) -> Result<CycleOutcome, P::Error> {
        let was_active = self.active;
        let precision = self.policy.precision;
        if self
            .last_match
            .is_some_and(|matched| !matched.matches(&now, precision))
        {
            self.last_match = None;
        }
        let due = self.alarm_due(now);
        if due && self.policy.drive == OutputDrive::Decoupled && self.last_match.is_none() {
            self.active = true;
            self.last_match = Some(now);
        }
        let asserted = self.tick(now)?;
        let raised = asserted && !was_active;

        #[cfg(feature = "defmt")]
        {
            if raised {
                defmt::info!("alarm raised at {}", now);
            }
        }

        Ok(CycleOutcome {
            due,
            asserted,
            raised,
        })
    }

    /// Mutable access to the alarm at `index`
    fn record_mut(&mut self, index: usize) -> Result<&mut AlarmRecord, AlarmError> {
        let count = self.alarms.len();
        self.alarms
            .get_mut(index)
            .ok_or(AlarmError::IndexOutOfRange { index, count })
    }
}
