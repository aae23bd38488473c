//! # Pico alarm controller
//! Polls the RTC, compares the time of day against the configured alarms and drives the buzzer line.
//! Two push-buttons enable or disable the first alarm and silence a sounding alarm.

// we are in an environment with constrained resources, so we do not use the standard library and we define a different entry point.
#![no_std]
#![no_main]

use crate::event::Event;
use crate::task::buttons::{Button, button_handler};
use crate::task::resources::{
    AssignedResources, BuzzerResources, RtcResources, SilenceButtonResources, ToggleButtonResources,
};
use crate::task::{alarm_trigger, orchestrate, time_keeper};
use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use {defmt_rtt as _, panic_probe as _}; // global logger and panic handler

mod config;
mod event;
mod state;
#[macro_use]
mod task;

/// Entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Program start");

    // Initialize the peripherals for the RP2040 and split them into the task resources
    let p = embassy_rp::init(embassy_rp::config::Config::default());
    let r = split_resources!(p);

    // Real Time Clock, must be running before the alarm trigger task polls it
    info!("init rtc");
    time_keeper::init_rtc(r.rtc).await;

    // the buzzer line is released until the first alarm cycle, and owned by the alarm manager from here on
    info!("init alarm manager");
    let buzzer = Output::new(r.buzzer.output_pin, Level::Low);
    state::init_alarm_manager(buzzer).await;

    // Orchestrator, reacts to the events of the other tasks
    unwrap!(spawner.spawn(orchestrate::orchestrator()));
    unwrap!(spawner.spawn(orchestrate::alarm_expirer()));

    // Buttons
    info!("init buttons");
    let toggle_button = Input::new(r.btn_toggle.button_pin, Pull::Up);
    unwrap!(spawner.spawn(button_handler(
        toggle_button,
        Event::ToggleBtn,
        Button::Toggle
    )));
    let silence_button = Input::new(r.btn_silence.button_pin, Pull::Up);
    unwrap!(spawner.spawn(button_handler(
        silence_button,
        Event::SilenceBtn,
        Button::Silence
    )));

    // Alarm polling loop
    unwrap!(spawner.spawn(alarm_trigger::alarm_trigger_task()));
}
