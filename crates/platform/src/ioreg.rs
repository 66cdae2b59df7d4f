//! Grammar of `ioreg -rn AppleSmartBattery` output.
//!
//! The dump is a nested property tree. Top-level keys use `"Key" = value`,
//! while keys inside inline dictionaries such as `AdapterDetails` are
//! written without spaces, `"Key"=value`.

use std::time::Duration;

use once_cell::sync::Lazy;
use wattch_protocol::TelemetrySnapshot;

use crate::extract::{Field, FieldSpec, FieldTable};

pub const PROGRAM: &str = "ioreg";

pub const ARGS: [&str; 2] = ["-rn", "AppleSmartBattery"];

/// The registry itself only refreshes about every 30 seconds.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

type Spec = FieldSpec<TelemetrySnapshot>;

static FIELDS: Lazy<FieldTable<TelemetrySnapshot>> = Lazy::new(|| {
    FieldTable::new(vec![
        Spec::int(Field::ChargerWatts, r#""Watts"=(\d+)"#, 0..=500, |s, v| {
            s.charger_watts = v
        }),
        Spec::int(
            Field::ChargerVoltage,
            r#""AdapterVoltage"=(\d+)"#,
            0..=50_000,
            |s, v| s.charger_voltage_mv = v,
        ),
        Spec::int(
            Field::ChargerCurrent,
            r#""Current"=(\d+)"#,
            0..=10_000,
            |s, v| s.charger_current_ma = v,
        ),
        Spec::int(
            Field::BatteryVoltage,
            r#""AppleRawBatteryVoltage" = (\d+)"#,
            5_000..=25_000,
            |s, v| s.battery_voltage_mv = v,
        ),
        Spec::int(
            Field::BatteryAmperage,
            r#""Amperage" = (-?\d+)"#,
            -15_000..=15_000,
            |s, v| s.battery_amps_ma = v,
        ),
        Spec::int(
            Field::Temperature,
            r#""Temperature" = (\d+)"#,
            0..=10_000,
            |s, v| s.temperature_centi_c = v,
        ),
        Spec::flag(Field::IsCharging, r#""IsCharging" = (Yes|No)"#, |s, v| {
            s.is_charging = v
        }),
        Spec::flag(
            Field::ExternalConnected,
            r#""ExternalConnected" = (Yes|No)"#,
            |s, v| s.on_ac = v,
        ),
    ])
});

/// Field table for one complete registry dump.
pub fn fields() -> &'static FieldTable<TelemetrySnapshot> {
    &FIELDS
}
