//! Integration tests for the alarm manager
//!
//! These tests run on the host and drive the manager through a mock output line and a mock clock.

use alarm_core::{
    AlarmError, AlarmManager, AlarmPolicy, AlarmRecord, NB_ALARMES_MAX, OutputDrive, Precision, TimeOfDay, WallClock,
};
use core::convert::Infallible;
use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};

// ============================================================================
// Mocks
// ============================================================================

/// Error of the mock output line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFault;

impl embedded_hal::digital::Error for LineFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Output line recording every level written to it
#[derive(Default)]
pub struct MockOutputLine {
    pub levels: Vec<bool>,
    pub fail_next_write: bool,
}

impl MockOutputLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_level(&self) -> Option<bool> {
        self.levels.last().copied()
    }

    pub fn write_count(&self) -> usize {
        self.levels.len()
    }

    fn write(&mut self, high: bool) -> Result<(), LineFault> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(LineFault);
        }
        self.levels.push(high);
        Ok(())
    }
}

impl ErrorType for MockOutputLine {
    type Error = LineFault;
}

impl OutputPin for MockOutputLine {
    fn set_low(&mut self) -> Result<(), LineFault> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), LineFault> {
        self.write(true)
    }
}

/// Clock advancing one second per read
pub struct MockClock {
    pub seconds_of_day: u32,
}

impl MockClock {
    pub fn at(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            seconds_of_day: u32::from(hour) * 3600 + u32::from(minute) * 60 + u32::from(second),
        }
    }
}

impl WallClock for MockClock {
    type Error = Infallible;

    fn now(&mut self) -> Result<TimeOfDay, Infallible> {
        let s = self.seconds_of_day % 86_400;
        self.seconds_of_day += 1;
        #[allow(clippy::cast_possible_truncation)]
        let time = TimeOfDay::new((s / 3600) as u8, (s / 60 % 60) as u8, (s % 60) as u8).unwrap();
        Ok(time)
    }
}

fn t(hour: u8, minute: u8, second: u8) -> TimeOfDay {
    TimeOfDay::new(hour, minute, second).unwrap()
}

fn manager_with(policy: AlarmPolicy, alarms: &[AlarmRecord]) -> AlarmManager<MockOutputLine> {
    let mut manager = AlarmManager::new(MockOutputLine::new(), policy);
    for record in alarms {
        assert!(manager.add_alarm(*record));
    }
    manager
}

// ============================================================================
// Tests: multiple alarms, explicit output control
// ============================================================================

#[test]
fn test_any_alarm_due_matches_any_record() {
    let manager = manager_with(
        AlarmPolicy::multi_alarm(),
        &[
            AlarmRecord::new(t(6, 0, 0), true),
            AlarmRecord::new(t(7, 15, 30), true),
            AlarmRecord::new(t(22, 0, 0), true),
        ],
    );
    assert!(manager.is_any_alarm_due(t(6, 0, 0)));
    assert!(manager.is_any_alarm_due(t(7, 15, 30)));
    assert!(manager.is_any_alarm_due(t(22, 0, 0)));
    assert!(!manager.is_any_alarm_due(t(7, 15, 31)));
    assert!(!manager.is_any_alarm_due(t(12, 0, 0)));
}

#[test]
fn test_any_alarm_due_ignores_enabled_flag() {
    let manager = manager_with(AlarmPolicy::multi_alarm(), &[AlarmRecord::new(t(7, 30, 0), false)]);
    assert!(manager.is_any_alarm_due(t(7, 30, 0)));
    assert!(!manager.is_due(t(7, 30, 0)));
    assert!(manager.alarm_due(t(7, 30, 0)));
}

#[test]
fn test_any_alarm_due_fires_for_one_second_per_day() {
    let manager = manager_with(AlarmPolicy::multi_alarm(), &[AlarmRecord::new(t(7, 30, 0), true)]);
    let mut clock = MockClock::at(0, 0, 0);
    let due_seconds = (0..86_400)
        .filter(|_| manager.is_any_alarm_due(clock.now().unwrap()))
        .count();
    assert_eq!(due_seconds, 1);
}

#[test]
fn test_add_alarm_rejects_over_capacity() {
    let mut manager: AlarmManager<MockOutputLine> = AlarmManager::new(MockOutputLine::new(), AlarmPolicy::multi_alarm());
    for hour in 0..u8::try_from(NB_ALARMES_MAX).unwrap() {
        assert!(manager.add_alarm(AlarmRecord::new(t(hour, 0, 0), true)));
    }
    assert!(!manager.add_alarm(AlarmRecord::new(t(23, 0, 0), true)));
    assert_eq!(manager.alarm_count(), NB_ALARMES_MAX);
    assert!(!manager.is_any_alarm_due(t(23, 0, 0)));
}

#[test]
fn test_set_alarm_count_above_max_is_noop() {
    let mut manager: AlarmManager<MockOutputLine> = AlarmManager::new(MockOutputLine::new(), AlarmPolicy::multi_alarm());
    manager.set_alarm_count(2);
    manager.set_alarm_count(NB_ALARMES_MAX + 1);
    assert_eq!(manager.alarm_count(), 2);
}

#[test]
fn test_setters_change_the_due_time() {
    let mut manager = manager_with(AlarmPolicy::multi_alarm(), &[AlarmRecord::new(t(7, 0, 0), true)]);
    manager.set_alarm_time(0, t(8, 45, 10)).unwrap();
    assert_eq!(manager.alarm_time(0), Ok(t(8, 45, 10)));
    assert!(!manager.is_any_alarm_due(t(7, 0, 0)));
    assert!(manager.is_any_alarm_due(t(8, 45, 10)));
}

#[test]
fn test_index_past_count_is_rejected() {
    let mut manager = manager_with(AlarmPolicy::multi_alarm(), &[AlarmRecord::new(t(7, 0, 0), true)]);
    manager.set_alarm_count(2);
    assert!(manager.set_alarm_time(1, t(9, 0, 0)).is_ok());
    assert_eq!(
        manager.set_alarm_time(2, t(9, 0, 0)),
        Err(AlarmError::IndexOutOfRange { index: 2, count: 2 })
    );
}

#[test]
fn test_caller_protocol_check_activate_tick() {
    let mut manager = manager_with(AlarmPolicy::multi_alarm(), &[AlarmRecord::new(t(7, 30, 0), true)]);
    let now = t(7, 30, 0);

    assert!(manager.is_any_alarm_due(now));
    manager.set_output_active(true);
    assert_eq!(manager.tick(now), Ok(true));
    assert_eq!(manager.output().last_level(), Some(true));

    // the output stays asserted until released by the caller
    assert_eq!(manager.tick(t(7, 45, 0)), Ok(true));
    manager.set_output_active(false);
    assert_eq!(manager.tick(t(7, 45, 1)), Ok(false));
    assert_eq!(manager.output().levels, vec![true, true, false]);
}

// ============================================================================
// Tests: single alarm, second precision
// ============================================================================

#[test]
fn test_single_second_scenario_0730() {
    let manager = manager_with(AlarmPolicy::single_second(), &[AlarmRecord::new(t(7, 30, 0), true)]);
    assert!(manager.is_due(t(7, 30, 0)));
    assert!(!manager.is_due(t(7, 30, 1)));
    assert!(!manager.is_due(t(7, 30, 45)));
}

#[test]
fn test_disabled_alarm_is_never_due() {
    let mut manager = manager_with(AlarmPolicy::single_second(), &[AlarmRecord::new(t(7, 30, 0), false)]);
    let mut clock = MockClock::at(7, 29, 0);
    for _ in 0..120 {
        let outcome = manager.run_cycle(clock.now().unwrap()).unwrap();
        assert!(!outcome.due);
        assert!(!outcome.asserted);
    }
    assert_eq!(manager.output().write_count(), 120);
    assert!(manager.output().levels.iter().all(|high| !high));
}

#[test]
fn test_decoupled_tick_does_not_evaluate() {
    let mut manager = manager_with(AlarmPolicy::single_second(), &[AlarmRecord::new(t(7, 30, 0), true)]);
    assert_eq!(manager.tick(t(7, 30, 0)), Ok(false));
    assert!(!manager.is_output_active());
}

#[test]
fn test_run_cycle_raises_once_per_match() {
    let mut manager = manager_with(AlarmPolicy::single_second(), &[AlarmRecord::new(t(7, 30, 0), true)]);
    let mut clock = MockClock::at(7, 29, 50);
    let mut raised = 0;
    for _ in 0..30 {
        let outcome = manager.run_cycle(clock.now().unwrap()).unwrap();
        if outcome.raised {
            raised += 1;
        }
    }
    assert_eq!(raised, 1);
    // latched high from 07:30:00 on
    assert_eq!(manager.output().levels.iter().filter(|high| **high).count(), 20);
}

#[test]
fn test_polling_faster_than_once_per_second() {
    let mut manager = manager_with(AlarmPolicy::single_second(), &[AlarmRecord::new(t(7, 30, 0), true)]);
    // four cycles within the matching second: raised on the first only
    let outcomes: Vec<_> = (0..4)
        .map(|_| manager.run_cycle(t(7, 30, 0)).unwrap())
        .collect();
    assert!(outcomes.iter().all(|o| o.due && o.asserted));
    assert_eq!(outcomes.iter().filter(|o| o.raised).count(), 1);
}

#[test]
fn test_silence_within_matching_second_sticks() {
    let mut manager = manager_with(AlarmPolicy::single_second(), &[AlarmRecord::new(t(7, 30, 0), true)]);
    assert!(manager.run_cycle(t(7, 30, 0)).unwrap().raised);

    // silenced, then polled again within 07:30:00
    manager.set_output_active(false);
    for _ in 0..3 {
        let outcome = manager.run_cycle(t(7, 30, 0)).unwrap();
        assert!(outcome.due);
        assert!(!outcome.asserted, "silenced alarm asserted again in the same second");
        assert!(!outcome.raised);
    }
    assert_eq!(manager.output().last_level(), Some(false));
}

#[test]
fn test_silenced_alarm_fires_again_next_day() {
    let mut manager = manager_with(AlarmPolicy::multi_alarm(), &[AlarmRecord::new(t(7, 30, 0), true)]);
    let mut clock = MockClock::at(7, 29, 59);
    let mut raised = 0;
    for _ in 0..86_400 + 2 {
        let now = clock.now().unwrap();
        if manager.run_cycle(now).unwrap().raised {
            raised += 1;
            manager.set_output_active(false);
        }
    }
    assert_eq!(raised, 2);
}

#[test]
fn test_second_alarm_in_other_second_still_raises_after_silence() {
    let mut manager = manager_with(
        AlarmPolicy::multi_alarm(),
        &[
            AlarmRecord::new(t(7, 30, 0), true),
            AlarmRecord::new(t(7, 30, 1), true),
        ],
    );
    assert!(manager.run_cycle(t(7, 30, 0)).unwrap().raised);
    manager.set_output_active(false);
    assert!(manager.run_cycle(t(7, 30, 1)).unwrap().raised);
}

// ============================================================================
// Tests: single alarm, minute precision, self-contained tick
// ============================================================================

#[test]
fn test_single_minute_holds_output_for_the_whole_minute() {
    let mut manager = manager_with(AlarmPolicy::single_minute(), &[AlarmRecord::new(t(7, 30, 0), true)]);
    let mut clock = MockClock::at(7, 29, 0);
    for _ in 0..180 {
        let now = clock.now().unwrap();
        let expected = now.hour() == 7 && now.minute() == 30;
        assert_eq!(manager.tick(now), Ok(expected), "at {now:?}");
        assert_eq!(manager.output().last_level(), Some(expected));
    }
}

#[test]
fn test_single_minute_matches_at_0730_45() {
    let manager = manager_with(AlarmPolicy::single_minute(), &[AlarmRecord::new(t(7, 30, 0), true)]);
    assert!(manager.is_due(t(7, 30, 45)));
    assert!(manager.is_due(t(7, 30, 1)));
    assert!(!manager.is_due(t(7, 31, 0)));
}

#[test]
fn test_single_minute_disabled_forces_low() {
    let mut manager = manager_with(AlarmPolicy::single_minute(), &[AlarmRecord::new(t(7, 30, 0), true)]);
    assert_eq!(manager.tick(t(7, 30, 10)), Ok(true));
    manager.set_alarm_enabled(0, false).unwrap();
    assert_eq!(manager.tick(t(7, 30, 11)), Ok(false));
    assert_eq!(manager.output().last_level(), Some(false));
    assert!(!manager.is_output_active());
}

#[test]
fn test_single_minute_run_cycle_reports_edges() {
    let mut manager = manager_with(AlarmPolicy::single_minute(), &[AlarmRecord::new(t(7, 30, 0), true)]);
    let before = manager.run_cycle(t(7, 29, 59)).unwrap();
    let start = manager.run_cycle(t(7, 30, 0)).unwrap();
    let during = manager.run_cycle(t(7, 30, 30)).unwrap();
    let after = manager.run_cycle(t(7, 31, 0)).unwrap();
    assert!(!before.asserted);
    assert!(start.raised && start.asserted);
    assert!(!during.raised && during.asserted);
    assert!(!after.asserted && !after.due);
}

// ============================================================================
// Tests: custom policies and output faults
// ============================================================================

#[test]
fn test_custom_policy_multi_minute_self_contained() {
    let policy = AlarmPolicy::new(Precision::Minute, OutputDrive::SelfContained, true, NB_ALARMES_MAX);
    let mut manager = manager_with(
        policy,
        &[
            AlarmRecord::new(t(6, 0, 0), true),
            AlarmRecord::new(t(6, 30, 0), false),
        ],
    );
    assert_eq!(manager.tick(t(6, 0, 59)), Ok(true));
    assert_eq!(manager.tick(t(6, 30, 0)), Ok(false));
}

#[test]
fn test_output_fault_is_propagated() {
    let mut line = MockOutputLine::new();
    line.fail_next_write = true;
    let mut manager: AlarmManager<MockOutputLine> = AlarmManager::new(line, AlarmPolicy::single_second());
    manager.set_output_active(true);

    assert_eq!(manager.tick(t(7, 30, 0)), Err(LineFault));
    assert_eq!(manager.output().write_count(), 0);
    // the next cycle writes again
    assert_eq!(manager.tick(t(7, 30, 1)), Ok(true));
    assert_eq!(manager.output().last_level(), Some(true));
}
