use wattch_protocol::{PowerReadings, PowerSupply};

use super::utils::{color_bar, line, paint, separator, split_bar};
use super::{ADAPTER, BATTERY_SHARE, DRAIN, SILICON, SYSTEM_SHARE};

const CHANNEL_BAR_WIDTH: usize = 20;
const SPLIT_BAR_WIDTH: usize = 40;

fn channel_row(label: &str, watts: f64) -> String {
    // Full scale is 10 W.
    let pct = (watts * 10.0) as i64;
    line(&format!(
        "  {label}  {watts:5.2} W  [{}]",
        color_bar(pct, CHANNEL_BAR_WIDTH, SILICON)
    ))
}

pub fn silicon_rows(r: &PowerReadings) -> Vec<String> {
    vec![
        line(&format!("{} (live)", paint("SILICON", SILICON))),
        channel_row("CPU:", r.cpu_watts),
        channel_row("GPU:", r.gpu_watts),
        channel_row("ANE:", r.ane_watts),
        line(&format!("  Chip: {:5.2} W", r.chip_watts)),
    ]
}

pub fn supply_rows(r: &PowerReadings) -> Vec<String> {
    match r.supply {
        PowerSupply::Adapter {
            system_watts,
            split,
        } => {
            let mut rows = vec![
                line(&paint("CHARGER", ADAPTER)),
                line(&format!(
                    "  {:.1}V × {:.2}A = {}",
                    r.charger_volts,
                    r.charger_amps,
                    paint(&format!("{}W", r.charger_watts), ADAPTER)
                )),
                separator(),
                line("POWER SPLIT (~30s refresh)"),
                line(&format!(
                    "  → {}",
                    paint(&format!("System:  {system_watts:5.1} W"), SYSTEM_SHARE)
                )),
                line(&format!(
                    "  → {}",
                    paint(&format!("Battery: {:5.1} W", r.battery_watts), BATTERY_SHARE)
                )),
            ];

            if let Some(split) = split {
                rows.push(line(&format!(
                    "  [{}]",
                    split_bar(
                        split.system_percent,
                        SPLIT_BAR_WIDTH,
                        SYSTEM_SHARE,
                        BATTERY_SHARE
                    )
                )));
                rows.push(line(&format!(
                    "   {}          {}",
                    paint(&format!("system {}%", split.system_percent), SYSTEM_SHARE),
                    paint(&format!("battery {}%", split.battery_percent), BATTERY_SHARE)
                )));
            }
            rows
        }
        PowerSupply::Battery { drain_watts } => vec![
            line(&paint("ON BATTERY", DRAIN)),
            line(&format!(
                "  Drain: {}",
                paint(&format!("{drain_watts:.1} W"), DRAIN)
            )),
        ],
    }
}
