//! Events and system channel for sending and receiving events

use defmt::Format;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

/// System event channel for sending and receiving events
pub static EVENT_CHANNEL: Channel<CriticalSectionRawMutex, Event, EVENT_CHANNEL_CAPACITY> =
    Channel::new();

/// The capacity of the event channel
const EVENT_CHANNEL_CAPACITY: usize = 10;

/// Sends an event to the system channel
pub async fn send_event(event: Event) {
    EVENT_CHANNEL.sender().send(event).await;
}

/// Receives the next event from the system channel
pub async fn receive_event() -> Event {
    EVENT_CHANNEL.receiver().receive().await
}

/// The event type used in the system, representing various system events
#[derive(PartialEq, Eq, Debug, Format, Clone, Copy)]
pub enum Event {
    /// The toggle button was pressed, the first alarm must be enabled or disabled
    ToggleBtn,
    /// The silence button was pressed, a sounding alarm must be released
    SilenceBtn,
    /// The alarm output has been asserted
    Alarm,
    /// The alarm has been sounding for too long and must be released
    AlarmStop,
}
