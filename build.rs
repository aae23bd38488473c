//! This build script copies the `memory.x` file from the crate root into
//! a directory where the linker can always find it at build time, and
//! turns `config/alarm_config.json` into the `alarm_config.rs` constants
//! included by `src/config.rs`.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::print_stdout)]

use alarm_core::{AlarmPolicy, POLL_INTERVAL_LIMIT_MS, is_valid_poll_interval_ms};
use serde::Deserialize;
use std::{
    env, fs,
    fs::File,
    io,
    io::Write,
    path::{Path, PathBuf},
};

/// Contents of `config/alarm_config.json`
#[derive(Deserialize)]
struct AlarmConfig {
    /// One of `multi`, `single_second`, `single_minute`
    variant: String,
    /// Polling period of the alarm trigger task, below one second
    poll_interval_ms: u64,
    /// Seconds after which a raised alarm is released automatically
    auto_silence_secs: u64,
    /// The alarms to start with
    alarms: Vec<AlarmEntry>,
    /// Date and time the RTC is started with
    initial_datetime: InitialDateTime,
}

/// One configured alarm
#[derive(Deserialize)]
struct AlarmEntry {
    /// Hour, 0-23
    hour: u8,
    /// Minute, 0-59
    minute: u8,
    /// Second, 0-59
    #[serde(default)]
    second: u8,
    /// Whether the alarm may fire
    enabled: bool,
}

/// Start date-time of the RTC
#[derive(Deserialize)]
struct InitialDateTime {
    /// Year
    year: u16,
    /// Month, 1-12
    month: u8,
    /// Day of month, 1-31
    day: u8,
    /// Day of week, 0 = Sunday
    day_of_week: u8,
    /// Hour, 0-23
    hour: u8,
    /// Minute, 0-59
    minute: u8,
    /// Second, 0-59
    second: u8,
}

fn main() {
    println!("in build.rs");
    memory_x();
    alarm_config().unwrap();
}

/// Generate `alarm_config.rs` from `alarm_config.json`
fn alarm_config() -> io::Result<()> {
    println!("in alarm_config");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR environment variable not set");
    let dest_path = Path::new(&out_dir).join("alarm_config.rs");
    let mut f = File::create(dest_path).expect("Could not create alarm_config.rs file");

    // Read the alarm_config.json file, or create it with dummy values if it doesn't exist
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR environment variable not set");
    let config_path = Path::new(&manifest_dir).join("config/alarm_config.json");
    println!("cargo:rerun-if-changed={}", config_path.display());
    let config_contents = if config_path.exists() {
        fs::read_to_string(&config_path).expect("Could not read alarm_config.json file")
    } else {
        println!("alarm_config.json not found, creating with dummy values");
        let dummy_config = r#"{"variant":"single_second","poll_interval_ms":250,"auto_silence_secs":300,"alarms":[{"hour":7,"minute":0,"second":0,"enabled":false}],"initial_datetime":{"year":2026,"month":1,"day":1,"day_of_week":4,"hour":0,"minute":0,"second":0}}"#;
        fs::create_dir_all(config_path.parent().expect("config path has a parent"))?;
        fs::write(&config_path, dummy_config).expect("Could not write dummy alarm_config.json file");
        dummy_config.to_string()
    };

    let config: AlarmConfig =
        serde_json::from_str(&config_contents).expect("Could not parse alarm_config.json file");
    let policy = AlarmPolicy::from_variant(&config.variant).unwrap_or_else(|| {
        panic!(
            "unknown variant {:?} in alarm_config.json, expected multi, single_second or single_minute",
            config.variant
        )
    });
    validate(&config, &policy);

    writeln!(
        f,
        "pub const ALARM_POLICY: AlarmPolicy = AlarmPolicy::new(Precision::{:?}, OutputDrive::{:?}, {}, {});",
        policy.precision, policy.drive, policy.honor_enabled, policy.max_alarms
    )?;
    writeln!(f, "pub const POLL_INTERVAL_MS: u64 = {};", config.poll_interval_ms)?;
    writeln!(f, "pub const AUTO_SILENCE_SECS: u64 = {};", config.auto_silence_secs)?;
    write!(
        f,
        "pub const CONFIGURED_ALARMS: [(u8, u8, u8, bool); {}] = [",
        config.alarms.len()
    )?;
    for alarm in &config.alarms {
        write!(
            f,
            "({}, {}, {}, {}),",
            alarm.hour, alarm.minute, alarm.second, alarm.enabled
        )?;
    }
    writeln!(f, "];")?;
    let dt = &config.initial_datetime;
    writeln!(
        f,
        "pub const INITIAL_DATETIME: (u16, u8, u8, u8, u8, u8, u8) = ({}, {}, {}, {}, {}, {}, {});",
        dt.year, dt.month, dt.day, dt.day_of_week, dt.hour, dt.minute, dt.second
    )?;
    Ok(())
}

/// Fail the build on values the firmware cannot use
fn validate(config: &AlarmConfig, policy: &AlarmPolicy) {
    assert!(
        is_valid_poll_interval_ms(config.poll_interval_ms),
        "poll_interval_ms must be between 1 and {}, a slower loop misses second precision alarms",
        POLL_INTERVAL_LIMIT_MS - 1
    );
    assert!(
        config.alarms.len() <= policy.max_alarms,
        "variant {} holds at most {} alarm(s), {} configured",
        config.variant,
        policy.max_alarms,
        config.alarms.len()
    );
    for alarm in &config.alarms {
        assert!(
            alarm.hour < 24 && alarm.minute < 60 && alarm.second < 60,
            "invalid alarm time {:02}:{:02}:{:02}",
            alarm.hour,
            alarm.minute,
            alarm.second
        );
    }
    let dt = &config.initial_datetime;
    assert!(
        (1..=12).contains(&dt.month)
            && (1..=31).contains(&dt.day)
            && dt.day_of_week < 7
            && dt.hour < 24
            && dt.minute < 60
            && dt.second < 60,
        "invalid initial_datetime"
    );
}

/// Handle the `memory.x` linker script
fn memory_x() {
    print!("in memory_x");
    // Put `memory.x` in our output directory and ensure it's
    // on the linker search path.
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());
    File::create(out.join("memory.x"))
        .unwrap()
        .write_all(include_bytes!("memory.x"))
        .unwrap();
    println!("cargo:rustc-link-search={}", out.display());

    // Only re-run the build script when `memory.x` or the config changes.
    println!("cargo:rerun-if-changed=memory.x");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
