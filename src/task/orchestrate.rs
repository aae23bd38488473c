//! # Orchestrate Tasks
//! Task to orchestrate the state transitions of the system.
use crate::config::AUTO_SILENCE;
use crate::event::{Event, receive_event, send_event};
use crate::state::{ALARM_MANAGER, SystemAlarmManager};
use alarm_core::OutputDrive;
use defmt::{info, warn};
use embassy_futures::select::{Either, select};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use embassy_time::Timer;

/// Index of the alarm the toggle button switches on and off
const TOGGLED_ALARM: usize = 0;

/// Signal for starting the alarm expirer
static ALARM_EXPIRER_SIGNAL: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Signal for cancelling a running alarm expirer
static ALARM_EXPIRER_CANCEL_SIGNAL: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Signals the alarm expirer to start. A cancel left over from an earlier alarm is dropped first,
/// a cancel sent after this call stops the new expiry.
fn signal_alarm_expirer() {
    ALARM_EXPIRER_CANCEL_SIGNAL.reset();
    ALARM_EXPIRER_SIGNAL.signal(());
}

/// Signals the alarm expirer to stop waiting
fn signal_alarm_expirer_cancel() {
    ALARM_EXPIRER_CANCEL_SIGNAL.signal(());
}

/// This task is responsible for the state transitions of the system.
/// It receives events from the other tasks and reacts to them by changing the alarm manager.
#[embassy_executor::task]
pub async fn orchestrator() {
    info!("Orchestrate task starting");

    loop {
        // receive the events, halting the task until an event is received
        let event = receive_event().await;

        let mut manager_guard = ALARM_MANAGER.lock().await;
        let Some(manager) = manager_guard.as_mut() else {
            warn!("Alarm manager not initialized, dropping {}", event);
            continue;
        };

        handle_event(event, manager);

        drop(manager_guard);
    }
}

/// Handles a single event by updating the alarm manager and signaling appropriate tasks.
fn handle_event(event: Event, manager: &mut SystemAlarmManager) {
    match event {
        Event::ToggleBtn => match manager.toggle_alarm_enabled(TOGGLED_ALARM) {
            Ok(enabled) => info!("Alarm {} enabled: {}", TOGGLED_ALARM, enabled),
            Err(e) => warn!("Cannot toggle alarm: {}", e),
        },
        Event::SilenceBtn => {
            info!("Silence button event");
            release_alarm(manager);
        }
        Event::Alarm => {
            info!("Alarm event");
            signal_alarm_expirer();
        }
        Event::AlarmStop => {
            info!("Alarm stop event");
            release_alarm(manager);
        }
    }
}

/// Releases a sounding alarm. A self-contained drive releases the line by itself once the matching minute is over.
fn release_alarm(manager: &mut SystemAlarmManager) {
    if !manager.is_output_active() {
        return;
    }
    match manager.policy().drive {
        OutputDrive::Decoupled => {
            manager.set_output_active(false);
            signal_alarm_expirer_cancel();
            info!("Alarm released");
        }
        OutputDrive::SelfContained => {
            info!("Alarm follows the clock, it is released when the alarm minute is over");
        }
    }
}

/// This task releases a raised alarm after the configured time, unless it was silenced before.
#[embassy_executor::task]
pub async fn alarm_expirer() {
    info!("Alarm expirer task started");
    '_mainloop: loop {
        // wait for the alarm expiry watcher signal
        ALARM_EXPIRER_SIGNAL.wait().await;

        match select(Timer::after(AUTO_SILENCE), ALARM_EXPIRER_CANCEL_SIGNAL.wait()).await {
            Either::First(()) => {
                info!("Alarm expired");
                send_event(Event::AlarmStop).await;
            }
            Either::Second(()) => {
                info!("Alarm expirer cancelled");
            }
        }
    }
}
