mod readings;
mod types;

pub use readings::{PowerReadings, PowerSplit, PowerSupply};
pub use types::{ChargeState, TelemetrySnapshot};
