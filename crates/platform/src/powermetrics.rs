//! Grammar of the streaming `powermetrics` text output.
//!
//! Each sampling interval starts with a `*** Sampled system activity` header,
//! followed by per-sampler sections. Only a handful of lines carry values we
//! care about:
//!
//! ```text
//! CPU Power: 1523 mW
//! GPU Power: 87 mW
//! ANE Power: 0 mW
//! Combined Power (CPU + GPU + ANE): 1610 mW
//! percent_charge: 87
//! ```

use once_cell::sync::Lazy;
use wattch_protocol::TelemetrySnapshot;

use crate::extract::{Field, FieldSpec, FieldTable};

pub const PROGRAM: &str = "powermetrics";

pub const SAMPLE_INTERVAL_MS: u64 = 1000;

/// Fixed sampler arguments: CPU, GPU and battery samplers, text output.
pub const ARGS: [&str; 6] = [
    "--samplers",
    "cpu_power,gpu_power,battery",
    "-i",
    "1000",
    "-f",
    "text",
];

/// Prefix of the header line that opens every sampling interval.
///
/// The trailing space keeps section headers such as
/// `**** Processor usage ****` from counting as boundaries.
pub const SAMPLE_DELIMITER: &str = "*** ";

/// Upper bound for any single silicon power reading. Anything above is a
/// torn line, not a real measurement.
const MAX_POWER_MW: f64 = 1_000_000.0;

type Spec = FieldSpec<TelemetrySnapshot>;

static FIELDS: Lazy<FieldTable<TelemetrySnapshot>> = Lazy::new(|| {
    FieldTable::new(vec![
        Spec::float(
            Field::CpuPower,
            r"CPU Power:\s+([\d.]+)\s+mW",
            0.0..=MAX_POWER_MW,
            |s, v| s.cpu_power_mw = v,
        ),
        Spec::float(
            Field::GpuPower,
            r"GPU Power:\s+([\d.]+)\s+mW",
            0.0..=MAX_POWER_MW,
            |s, v| s.gpu_power_mw = v,
        ),
        Spec::float(
            Field::AnePower,
            r"ANE Power:\s+([\d.]+)\s+mW",
            0.0..=MAX_POWER_MW,
            |s, v| s.ane_power_mw = v,
        ),
        Spec::float(
            Field::PackagePower,
            r"Combined Power \(CPU \+ GPU \+ ANE\):\s+([\d.]+)\s+mW",
            0.0..=MAX_POWER_MW,
            |s, v| s.package_power_mw = v,
        ),
        Spec::int(
            Field::BatteryPercent,
            r"percent_charge:\s+(\d+)",
            0..=100,
            |s, v| s.battery_percent = v,
        ),
    ])
});

/// Field table for a single line of sampler output.
pub fn fields() -> &'static FieldTable<TelemetrySnapshot> {
    &FIELDS
}

/// Whether `line` marks the boundary between two sampling intervals.
pub fn is_sample_delimiter(line: &str) -> bool {
    line.starts_with(SAMPLE_DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_power_line_sets_only_cpu_power() {
        let mut snapshot = TelemetrySnapshot::default();
        assert_eq!(fields().apply("CPU Power: 1500.0 mW", &mut snapshot), 1);
        assert_eq!(snapshot.cpu_power_mw, 1500.0);
        assert_eq!(snapshot.gpu_power_mw, 0.0);
    }

    #[test]
    fn combined_power_line_does_not_touch_components() {
        let mut snapshot = TelemetrySnapshot {
            cpu_power_mw: 10.0,
            ..Default::default()
        };
        fields().apply("Combined Power (CPU + GPU + ANE): 2417 mW", &mut snapshot);
        assert_eq!(snapshot.package_power_mw, 2417.0);
        assert_eq!(snapshot.cpu_power_mw, 10.0);
    }

    #[test]
    fn percent_charge_is_bounded() {
        let mut snapshot = TelemetrySnapshot::default();
        fields().apply("percent_charge: 87", &mut snapshot);
        assert_eq!(snapshot.battery_percent, 87);

        fields().apply("percent_charge: 870", &mut snapshot);
        assert_eq!(snapshot.battery_percent, 87);
    }

    #[test]
    fn garbled_power_value_is_ignored() {
        let mut snapshot = TelemetrySnapshot {
            gpu_power_mw: 42.0,
            ..Default::default()
        };
        assert_eq!(fields().apply("GPU Power: 4.2.0 mW", &mut snapshot), 0);
        assert_eq!(fields().apply("GPU Power: 5000000 mW", &mut snapshot), 0);
        assert_eq!(snapshot.gpu_power_mw, 42.0);
    }

    #[test]
    fn sampler_interval_matches_args() {
        let pos = ARGS.iter().position(|a| *a == "-i").unwrap();
        assert_eq!(ARGS[pos + 1], SAMPLE_INTERVAL_MS.to_string());
    }

    #[test]
    fn delimiter_matches_sample_header() {
        assert!(is_sample_delimiter(
            "*** Sampled system activity (Mon Oct 19 10:00:00 2026 +0000) (1003.21ms elapsed) ***"
        ));
        assert!(!is_sample_delimiter("**** Battery and backlight usage ****"));
        assert!(!is_sample_delimiter("CPU Power: 12 mW"));
        assert!(!is_sample_delimiter(" *** indented"));
    }
}
