//! Telemetry source grammars for wattch.
//!
//! This crate knows what the two external samplers print and how to pull
//! plausible values out of it. It performs no I/O: callers run the
//! commands and feed the text in.
//!
//! - [`powermetrics`] - the streaming, once-per-second silicon power sampler
//! - [`ioreg`] - the one-shot battery and charger registry dump
//!
//! # Example
//!
//! ```
//! use wattch_platform::powermetrics;
//! use wattch_protocol::TelemetrySnapshot;
//!
//! let mut snapshot = TelemetrySnapshot::default();
//! powermetrics::fields().apply("CPU Power: 1500.0 mW", &mut snapshot);
//! assert_eq!(snapshot.cpu_power_mw, 1500.0);
//! ```

pub mod extract;
pub mod ioreg;
pub mod powermetrics;

pub use extract::{extract_bounded, extract_flag, Field, FieldSpec, FieldTable, Readings};
