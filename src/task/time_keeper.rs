//! # Time keeper
//! Starts the RP2040 real time clock and shares it between the tasks.
//!
//! The alarm logic only needs the time of day, which [`RtcClock`] reads from the shared RTC.

use crate::config::initial_datetime;
use crate::task::resources::RtcResources;
use alarm_core::{AlarmError, TimeOfDay, WallClock};
use defmt::{Debug2Format, info, warn};
use embassy_rp::peripherals;
use embassy_rp::rtc::{Rtc, RtcError};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;

/// Type alias for the RTC mutex.
type RtcType = Mutex<CriticalSectionRawMutex, Option<Rtc<'static, peripherals::RTC>>>;
/// The RTC mutex, which is used to access the RTC from multiple tasks.
pub static RTC_MUTEX: RtcType = Mutex::new(None);

/// Start the RTC at the configured date and time and put it into the mutex
pub async fn init_rtc(r: RtcResources) {
    let mut rtc = Rtc::new(r.rtc_inst);
    let start = initial_datetime();
    match rtc.set_datetime(start.clone()) {
        Ok(()) => info!(
            "RTC started at {}-{:02}-{:02} {:02}:{:02}:{:02}",
            start.year, start.month, start.day, start.hour, start.minute, start.second
        ),
        Err(e) => warn!("Failed to set RTC datetime: {:?}", Debug2Format(&e)),
    }
    *(RTC_MUTEX.lock().await) = Some(rtc);
}

/// Errors reading the time of day from the RTC
#[derive(Debug)]
pub enum ClockError {
    /// The RTC could not be read, usually because it is not running yet
    Rtc(RtcError),
    /// The RTC returned a time that is not a valid time of day
    Time(AlarmError),
}

/// Wall clock over the RP2040 RTC
pub struct RtcClock<'a> {
    /// The shared RTC, borrowed from the mutex guard
    rtc: &'a Rtc<'static, peripherals::RTC>,
}

impl<'a> RtcClock<'a> {
    /// Create a new `RtcClock` reading from `rtc`
    pub const fn new(rtc: &'a Rtc<'static, peripherals::RTC>) -> Self {
        Self { rtc }
    }
}

impl WallClock for RtcClock<'_> {
    type Error = ClockError;

    fn now(&mut self) -> Result<TimeOfDay, ClockError> {
        let dt = self.rtc.now().map_err(ClockError::Rtc)?;
        TimeOfDay::new(dt.hour, dt.minute, dt.second).map_err(ClockError::Time)
    }
}

/// Read the current time of day from the shared RTC. Returns `None` if the RTC is not initialized or not running.
pub async fn read_time_of_day() -> Option<TimeOfDay> {
    let rtc_guard = RTC_MUTEX.lock().await;
    let Some(rtc) = rtc_guard.as_ref() else {
        warn!("RTC not initialized");
        return None;
    };
    match RtcClock::new(rtc).now() {
        Ok(now) => Some(now),
        Err(e) => {
            info!("RTC not running: {:?}", Debug2Format(&e));
            None
        }
    }
}
