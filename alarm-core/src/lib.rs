//! # Alarm core
//! Platform-agnostic alarm evaluation for the Pico alarm controller.
//!
//! This crate has no hardware dependencies. The sounding device is any
//! [`embedded_hal::digital::OutputPin`], the time source is anything implementing [`WallClock`].
//! The firmware wires both to the RP2040 peripherals, the tests wire them to mocks.
#![no_std]

pub mod error;
pub mod manager;
pub mod policy;
pub mod time;

pub use error::AlarmError;
pub use manager::{AlarmManager, AlarmRecord, CycleOutcome, NB_ALARMES_MAX};
pub use policy::{AlarmPolicy, OutputDrive, POLL_INTERVAL_LIMIT_MS, is_valid_poll_interval_ms};
pub use time::{Precision, TimeOfDay, WallClock};
