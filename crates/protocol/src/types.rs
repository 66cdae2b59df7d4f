use std::fmt;

use serde::{Deserialize, Serialize};

/// Latest known value of every telemetry field, in the raw units the
/// external sources report.
///
/// Silicon power and battery percentage come from the streaming sampler,
/// everything else from the battery registry dump. A field only changes
/// when its source produces a new plausible reading, so a value can be
/// arbitrarily old.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TelemetrySnapshot {
    pub cpu_power_mw: f64,
    pub gpu_power_mw: f64,
    pub ane_power_mw: f64,
    /// Combined CPU + GPU + ANE power as reported by the sampler.
    pub package_power_mw: f64,
    pub battery_percent: i64,

    pub charger_watts: i64,
    pub charger_voltage_mv: i64,
    pub charger_current_ma: i64,
    pub battery_voltage_mv: i64,
    /// Negative while discharging.
    pub battery_amps_ma: i64,
    /// Hundredths of a degree Celsius.
    pub temperature_centi_c: i64,
    pub is_charging: bool,
    pub on_ac: bool,
}

impl TelemetrySnapshot {
    pub fn charge_state(&self) -> ChargeState {
        ChargeState::from_flags(self.is_charging, self.on_ac)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChargeState {
    Charging,
    /// On external power but not charging, e.g. full or held at a charge limit.
    Maintaining,
    #[default]
    Draining,
}

impl ChargeState {
    /// `is_charging` wins over `on_ac`; the registry can briefly report
    /// charging before the adapter flag flips.
    pub fn from_flags(is_charging: bool, on_ac: bool) -> Self {
        if is_charging {
            ChargeState::Charging
        } else if on_ac {
            ChargeState::Maintaining
        } else {
            ChargeState::Draining
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChargeState::Charging => "charging",
            ChargeState::Maintaining => "full/maintaining",
            ChargeState::Draining => "draining",
        }
    }
}

impl fmt::Display for ChargeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
