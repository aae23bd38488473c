//! Tasks that make up the application as well as the resources they use.
pub mod alarm_trigger;
pub mod buttons;
pub mod orchestrate;
#[macro_use]
pub mod resources;
pub mod time_keeper;
