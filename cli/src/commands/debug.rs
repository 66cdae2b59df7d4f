use color_eyre::eyre::Result;
use wattch_platform::{ioreg, powermetrics};
use wattch_protocol::{PowerReadings, TelemetrySnapshot};

use crate::config::{config_path, UserConfig};
use crate::data::{slow, SourceCommand};
use crate::logging::log_dir_location;

pub fn run(config: &UserConfig) -> Result<()> {
    println!("wattch debug information");
    println!("{}", "=".repeat(60));

    let registry = SourceCommand::ioreg();
    println!("\n--- Battery Registry ---");
    println!("Command: {}", registry.display());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match runtime.block_on(slow::dump(&registry)) {
        Ok(text) => {
            let readings = ioreg::fields().scan(&text);
            let matched: Vec<_> = readings.fields().map(|f| f.label()).collect();
            let missing: Vec<_> = ioreg::fields()
                .specs()
                .iter()
                .map(|spec| spec.field())
                .filter(|field| !readings.fields().any(|f| f == *field))
                .map(|f| f.label())
                .collect();

            println!("Matched: {}", list(&matched));
            println!("Missing: {}", list(&missing));

            let mut snapshot = TelemetrySnapshot::default();
            readings.apply(&mut snapshot);
            let derived = PowerReadings::from(&snapshot);

            println!("\n--- Derived Readings ---");
            println!("Charger: {}W", derived.charger_watts);
            println!(
                "Battery: {:.2}V x {:.2}A = {:.1}W",
                derived.battery_volts, derived.battery_amps, derived.battery_watts
            );
            println!("Temperature: {:.1}°C", derived.temperature_c);
            println!("State: {}", derived.state);
            println!("{}", serde_json::to_string_pretty(&derived.supply)?);
        }
        Err(e) => println!("Unavailable: {e}"),
    }

    println!("\n--- Power Sampler ---");
    println!(
        "Command: {}",
        SourceCommand::powermetrics(config.elevate).display()
    );
    println!("Sample interval: {}ms", powermetrics::SAMPLE_INTERVAL_MS);
    println!("Registry poll interval: {}s", ioreg::POLL_INTERVAL.as_secs());

    println!("\n--- Paths ---");
    println!("Config: {}", config_path().display());
    println!("Logs: {}", log_dir_location().display());

    println!("\n--- Current Config ---");
    println!("{}", toml::to_string_pretty(config)?);

    Ok(())
}

fn list(labels: &[&str]) -> String {
    if labels.is_empty() {
        "(none)".to_string()
    } else {
        labels.join(", ")
    }
}
