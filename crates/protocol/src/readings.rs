//! Display-ready quantities derived from a [`TelemetrySnapshot`].

use serde::{Deserialize, Serialize};

use crate::types::{ChargeState, TelemetrySnapshot};

/// Snapshot values converted to watts, volts, amps and degrees.
///
/// Battery watts follow the sign of the battery current: negative while
/// discharging, positive while charging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerReadings {
    pub cpu_watts: f64,
    pub gpu_watts: f64,
    pub ane_watts: f64,
    pub chip_watts: f64,

    pub charger_watts: i64,
    pub charger_volts: f64,
    pub charger_amps: f64,

    pub battery_percent: i64,
    pub battery_volts: f64,
    pub battery_amps: f64,
    pub battery_amps_ma: i64,
    pub battery_watts: f64,
    pub temperature_c: f64,

    pub state: ChargeState,
    pub supply: PowerSupply,
}

/// Where the machine is drawing power from right now.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum PowerSupply {
    Adapter {
        /// Charger output not going into the battery.
        system_watts: f64,
        /// `None` while the charger reports zero watts.
        split: Option<PowerSplit>,
    },
    Battery {
        drain_watts: f64,
    },
}

/// Share of charger output, in whole percent, going to the system and to
/// the battery. The two always add up to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerSplit {
    pub system_percent: i64,
    pub battery_percent: i64,
}

impl PowerSplit {
    pub fn new(battery_watts: f64, charger_watts: i64) -> Option<Self> {
        if charger_watts <= 0 {
            return None;
        }
        let fraction = (battery_watts / charger_watts as f64).clamp(0.0, 1.0);
        let battery_percent = (fraction * 100.0) as i64;
        Some(Self {
            system_percent: 100 - battery_percent,
            battery_percent,
        })
    }
}

impl From<&TelemetrySnapshot> for PowerReadings {
    fn from(s: &TelemetrySnapshot) -> Self {
        let battery_volts = s.battery_voltage_mv as f64 / 1000.0;
        let battery_amps = s.battery_amps_ma as f64 / 1000.0;
        let battery_watts = battery_volts * battery_amps;

        let supply = if s.on_ac {
            PowerSupply::Adapter {
                system_watts: s.charger_watts as f64 - battery_watts,
                split: PowerSplit::new(battery_watts, s.charger_watts),
            }
        } else {
            // Subtracting from zero keeps an idle battery at 0.0 instead of -0.0.
            PowerSupply::Battery {
                drain_watts: 0.0 - battery_watts,
            }
        };

        Self {
            cpu_watts: s.cpu_power_mw / 1000.0,
            gpu_watts: s.gpu_power_mw / 1000.0,
            ane_watts: s.ane_power_mw / 1000.0,
            chip_watts: s.package_power_mw / 1000.0,
            charger_watts: s.charger_watts,
            charger_volts: s.charger_voltage_mv as f64 / 1000.0,
            charger_amps: s.charger_current_ma as f64 / 1000.0,
            battery_percent: s.battery_percent,
            battery_volts,
            battery_amps,
            battery_amps_ma: s.battery_amps_ma,
            battery_watts,
            temperature_c: s.temperature_centi_c as f64 / 100.0,
            state: s.charge_state(),
            supply,
        }
    }
}
