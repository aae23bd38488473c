//! # Button Tasks
//! This module contains the tasks for the buttons. Each button has its own task.

use crate::event::{Event, send_event};
use defmt::{Format, info};
use embassy_rp::gpio::{Input, Level};
use embassy_time::{Duration, Timer};

/// Debounces a push-button and sends its event once per press
pub struct ButtonManager<'a> {
    /// The input pin for the button
    input: Input<'a>,
    /// The debounce duration
    debounce_duration: Duration,
    /// The event to send when the button is pressed
    event: Event,
    /// The button being managed
    button: Button,
}

/// The buttons of the system
#[derive(Debug, Format, Eq, PartialEq, Clone, Copy)]
pub enum Button {
    /// Enables or disables the first alarm
    Toggle,
    /// Silences a sounding alarm
    Silence,
}

impl<'a> ButtonManager<'a> {
    /// Create a new `ButtonManager`
    pub const fn new(input: Input<'a>, event: Event, button: Button) -> Self {
        Self {
            input,
            debounce_duration: Duration::from_millis(80), // hardcoding, all buttons have the same debounce duration
            event,
            button,
        }
    }

    /// Handle the button press event. This function is an infinite loop that waits for a debounced change of the input level.
    /// The button is normally high and goes low when pressed: the event is sent on the debounced high to low edge only,
    /// so holding the button sends nothing more until it is released and pressed again.
    pub async fn handle_button_press(&mut self) {
        loop {
            let level = self.debounce().await;
            if level == Level::Low {
                info!("{} pressed", self.button);
                send_event(self.event).await;
            }
        }
    }

    /// Debounce the button press by waiting for the button to be stable for a given duration. We determine the input level, then await any edge,
    /// then wait for the debounce duration, then check if the input level has changed. If it has, we break the loop and return the new level.
    pub async fn debounce(&mut self) -> Level {
        loop {
            let l1 = self.input.get_level();

            self.input.wait_for_any_edge().await;

            Timer::after(self.debounce_duration).await;

            let l2 = self.input.get_level();
            if l1 != l2 {
                break l2;
            }
        }
    }
}

#[embassy_executor::task(pool_size = 2)]
pub async fn button_handler(input: Input<'static>, event: Event, button: Button) {
    let mut btn = ButtonManager::new(input, event, button);
    info!("{} task started", btn.button);
    btn.handle_button_press().await;
}
