use crossterm::style::Color;
use wattch_protocol::{ChargeState, PowerReadings};

use super::utils::{color_bar, line, paint};
use super::BATTERY_SHARE;

const LEVEL_BAR_WIDTH: usize = 44;

fn state_color(state: ChargeState) -> Color {
    match state {
        ChargeState::Charging => Color::Green,
        ChargeState::Maintaining => Color::Blue,
        ChargeState::Draining => Color::Red,
    }
}

pub fn rows(r: &PowerReadings) -> Vec<String> {
    vec![
        line(&paint("BATTERY", BATTERY_SHARE)),
        line(&format!(
            "  {}% │ {:.2}V │ {}mA │ {:.1}°C",
            r.battery_percent, r.battery_volts, r.battery_amps_ma, r.temperature_c
        )),
        line(&format!(
            "  {}",
            paint(r.state.label(), state_color(r.state))
        )),
        line(&format!(
            "  [{}]",
            color_bar(r.battery_percent, LEVEL_BAR_WIDTH, BATTERY_SHARE)
        )),
    ]
}
