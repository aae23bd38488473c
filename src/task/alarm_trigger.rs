//! # Alarm Trigger Task
//! This module contains the polling loop that evaluates the alarms and drives the buzzer line.
//!
//! Every cycle reads the time of day from the RTC and runs one alarm manager cycle. With a
//! decoupled policy the loop asserts the output when an alarm is due and leaves releasing it to the
//! orchestrator. With a self-contained policy the manager drives the line on its own.

use crate::config::POLL_INTERVAL;
use crate::event::{Event, send_event};
use crate::state::ALARM_MANAGER;
use crate::task::time_keeper::read_time_of_day;
use alarm_core::{CycleOutcome, TimeOfDay};
use defmt::{info, warn};
use embassy_time::{Duration, Ticker, Timer};

/// Delay when waiting for initialization
const INIT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// This task polls the alarms at the configured interval, which stays below one second
/// so that an alarm matched to the second is never skipped.
#[embassy_executor::task]
pub async fn alarm_trigger_task() {
    info!("Alarm trigger task started, polling every {} ms", POLL_INTERVAL.as_millis());
    let mut ticker = Ticker::every(POLL_INTERVAL);

    loop {
        ticker.next().await;

        let Some(now) = read_time_of_day().await else {
            Timer::after(INIT_RETRY_DELAY).await;
            continue;
        };

        let Some(outcome) = run_cycle(now).await else {
            Timer::after(INIT_RETRY_DELAY).await;
            continue;
        };

        if outcome.raised {
            info!("Alarm raised at {}, notifying orchestrator", now);
            send_event(Event::Alarm).await;
        }
    }
}

/// Runs one alarm manager cycle. The manager lock is held for this cycle only.
async fn run_cycle(now: TimeOfDay) -> Option<CycleOutcome> {
    let mut manager_guard = ALARM_MANAGER.lock().await;
    let Some(manager) = manager_guard.as_mut() else {
        warn!("Alarm manager not initialized");
        return None;
    };
    // the gpio output cannot fail
    let outcome = match manager.run_cycle(now) {
        Ok(outcome) => outcome,
        Err(e) => match e {},
    };
    drop(manager_guard);
    Some(outcome)
}
