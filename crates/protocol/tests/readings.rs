use pretty_assertions::assert_eq;
use wattch_protocol::*;

fn sample_charging_snapshot() -> TelemetrySnapshot {
    TelemetrySnapshot {
        cpu_power_mw: 1500.0,
        gpu_power_mw: 320.0,
        ane_power_mw: 0.0,
        package_power_mw: 1820.0,
        battery_percent: 87,
        charger_watts: 65,
        charger_voltage_mv: 20_000,
        charger_current_ma: 3_250,
        battery_voltage_mv: 12_500,
        battery_amps_ma: 1_600,
        temperature_centi_c: 3_150,
        is_charging: true,
        on_ac: true,
    }
}

fn sample_draining_snapshot() -> TelemetrySnapshot {
    TelemetrySnapshot {
        cpu_power_mw: 4200.0,
        gpu_power_mw: 800.0,
        ane_power_mw: 50.0,
        package_power_mw: 5050.0,
        battery_percent: 42,
        battery_voltage_mv: 11_800,
        battery_amps_ma: -1_000,
        temperature_centi_c: 2_900,
        ..Default::default()
    }
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn silicon_power_is_scaled_to_watts() {
    let readings = PowerReadings::from(&sample_charging_snapshot());
    assert_close(readings.cpu_watts, 1.5);
    assert_close(readings.gpu_watts, 0.32);
    assert_close(readings.ane_watts, 0.0);
    assert_close(readings.chip_watts, 1.82);
}

#[test]
fn charger_and_battery_units_are_scaled() {
    let readings = PowerReadings::from(&sample_charging_snapshot());
    assert_close(readings.charger_volts, 20.0);
    assert_close(readings.charger_amps, 3.25);
    assert_close(readings.battery_volts, 12.5);
    assert_close(readings.battery_amps, 1.6);
    assert_close(readings.battery_watts, 20.0);
    assert_close(readings.temperature_c, 31.5);
    assert_eq!(readings.battery_amps_ma, 1_600);
}

#[test]
fn adapter_supply_splits_charger_output() {
    let readings = PowerReadings::from(&sample_charging_snapshot());
    assert_eq!(readings.state, ChargeState::Charging);
    assert_eq!(
        readings.supply,
        PowerSupply::Adapter {
            system_watts: 45.0,
            split: Some(PowerSplit {
                system_percent: 70,
                battery_percent: 30,
            }),
        }
    );
}

#[test]
fn adapter_supply_without_charger_watts_has_no_split() {
    let snapshot = TelemetrySnapshot {
        charger_watts: 0,
        is_charging: false,
        ..sample_charging_snapshot()
    };
    let readings = PowerReadings::from(&snapshot);
    assert_eq!(readings.state, ChargeState::Maintaining);
    match readings.supply {
        PowerSupply::Adapter { split, .. } => assert_eq!(split, None),
        other => panic!("expected adapter supply, got {other:?}"),
    }
}

#[test]
fn battery_supply_reports_positive_drain() {
    let readings = PowerReadings::from(&sample_draining_snapshot());
    assert_eq!(readings.state, ChargeState::Draining);
    match readings.supply {
        PowerSupply::Battery { drain_watts } => assert_close(drain_watts, 11.8),
        other => panic!("expected battery supply, got {other:?}"),
    }
}

#[test]
fn readings_serialize_with_tagged_supply() {
    let readings = PowerReadings::from(&sample_draining_snapshot());
    let value = serde_json::to_value(readings).unwrap();
    assert_eq!(value["supply"]["source"], "battery");
    assert_eq!(value["state"], "draining");
    assert_eq!(value["battery_percent"], 42);
}

#[test]
fn snapshot_round_trips_through_json() {
    let snapshot = sample_charging_snapshot();
    let json = serde_json::to_string(&snapshot).unwrap();
    let parsed: TelemetrySnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, snapshot);
}
