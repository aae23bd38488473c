//! # Resources
//! Peripherals grouped per task. The groups are split off the peripherals in `main.rs`.
use assign_resources::assign_resources;
use embassy_rp::{Peri, peripherals};

// group the peripherals into resources, to be used in the tasks
// the resources are assigned to the tasks in main.rs
assign_resources! {
    btn_toggle: ToggleButtonResources {
        button_pin: PIN_9,
    },
    btn_silence: SilenceButtonResources {
        button_pin: PIN_10,
    },
    buzzer: BuzzerResources {
        output_pin: PIN_11,
    },
    rtc: RtcResources {
        rtc_inst: RTC,
    },
}
