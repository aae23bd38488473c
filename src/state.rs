//! # State of the system
//! The alarm manager is the only state of the system. It owns the buzzer output line and is shared
//! between the polling loop and the orchestrator through a mutex.
use crate::config::{ALARM_POLICY, configured_alarms};
use alarm_core::AlarmManager;
use defmt::{info, warn};
use embassy_rp::gpio::Output;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;

/// The alarm manager of the system, driving the buzzer line
pub type SystemAlarmManager = AlarmManager<Output<'static>>;

/// Type alias for the alarm manager protected by a mutex.
///
/// The manager is wrapped in an `Option` because it is created at runtime, once the buzzer pin is available.
type AlarmManagerType = Mutex<CriticalSectionRawMutex, Option<SystemAlarmManager>>;

/// Global instance of the alarm manager protected by a mutex.
///
/// Tasks attempting to access the manager before initialization will need to handle the `None` case.
pub static ALARM_MANAGER: AlarmManagerType = Mutex::new(None);

/// Create the alarm manager with the configured policy and alarms, and put it into the mutex.
/// The buzzer line is owned by the manager from here on.
pub async fn init_alarm_manager(buzzer: Output<'static>) {
    let mut manager = SystemAlarmManager::new(buzzer, ALARM_POLICY);
    for record in configured_alarms() {
        if !manager.add_alarm(record) {
            warn!("No slot left for configured alarm {}", record);
        }
    }
    info!(
        "Alarm manager ready: {} with {} alarm(s)",
        manager.policy(),
        manager.alarm_count()
    );
    *(ALARM_MANAGER.lock().await) = Some(manager);
}
