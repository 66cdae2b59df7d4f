use std::io::{self, Write};
use std::ops::ControlFlow;

use color_eyre::eyre::Result;
use serde_json::json;
use tracing::debug;
use wattch_protocol::{PowerReadings, TelemetrySnapshot};

use crate::app;
use crate::config::UserConfig;
use crate::data::FrameSink;

pub fn run(config: &UserConfig, samples: u32, compact: bool) -> Result<()> {
    app::run(config, || Ok(JsonSink::new(io::stdout(), samples, compact)))
}

/// Writes one JSON document per sample.
pub struct JsonSink<W: Write> {
    out: W,
    limit: u32,
    compact: bool,
    written: u32,
}

impl<W: Write> JsonSink<W> {
    /// A `limit` of 0 never stops.
    pub fn new(out: W, limit: u32, compact: bool) -> Self {
        Self {
            out,
            limit,
            compact,
            written: 0,
        }
    }

    fn document(snapshot: &TelemetrySnapshot) -> serde_json::Value {
        json!({
            "timestamp": chrono::Local::now().to_rfc3339(),
            "snapshot": snapshot,
            "readings": PowerReadings::from(snapshot),
        })
    }

    fn write_document(&mut self, doc: &serde_json::Value) -> io::Result<()> {
        if self.compact {
            serde_json::to_writer(&mut self.out, doc)?;
        } else {
            serde_json::to_writer_pretty(&mut self.out, doc)?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write> FrameSink for JsonSink<W> {
    fn frame(&mut self, snapshot: &TelemetrySnapshot) -> io::Result<ControlFlow<()>> {
        match self.write_document(&Self::document(snapshot)) {
            Ok(()) => {}
            // The reader went away, e.g. `wattch pipe | head -1`.
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                debug!("Output closed, stopping");
                return Ok(ControlFlow::Break(()));
            }
            Err(e) => return Err(e),
        }

        self.written += 1;
        if self.limit > 0 && self.written >= self.limit {
            Ok(ControlFlow::Break(()))
        } else {
            Ok(ControlFlow::Continue(()))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;

    fn on_battery() -> TelemetrySnapshot {
        TelemetrySnapshot {
            cpu_power_mw: 2500.0,
            battery_percent: 64,
            battery_voltage_mv: 12_000,
            battery_amps_ma: -500,
            ..Default::default()
        }
    }

    #[test]
    fn compact_output_is_one_line_per_sample() {
        let mut sink = JsonSink::new(Vec::new(), 0, true);
        assert!(sink.frame(&on_battery()).unwrap().is_continue());
        assert!(sink.frame(&on_battery()).unwrap().is_continue());

        let text = String::from_utf8(sink.out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let doc: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(doc["snapshot"]["battery_percent"], 64);
        assert_eq!(doc["readings"]["cpu_watts"], 2.5);
        assert_eq!(doc["readings"]["state"], "draining");
        assert_eq!(doc["readings"]["supply"]["source"], "battery");
        assert_eq!(doc["readings"]["supply"]["drain_watts"], 6.0);
        assert!(doc["timestamp"].is_string());
    }

    #[test]
    fn pretty_output_parses_back() {
        let mut sink = JsonSink::new(Vec::new(), 0, false);
        assert!(sink.frame(&on_battery()).unwrap().is_continue());

        let doc: Value = serde_json::from_slice(&sink.out).unwrap();
        assert_eq!(doc["snapshot"]["battery_amps_ma"], -500);
    }

    #[test]
    fn stops_after_sample_limit() {
        let mut sink = JsonSink::new(Vec::new(), 2, true);
        assert!(sink.frame(&on_battery()).unwrap().is_continue());
        assert!(sink.frame(&on_battery()).unwrap().is_break());
    }

    #[test]
    fn zero_limit_never_stops() {
        let mut sink = JsonSink::new(io::sink(), 0, true);
        for _ in 0..100 {
            assert!(sink.frame(&on_battery()).unwrap().is_continue());
        }
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("no space left"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn closed_reader_ends_the_run() {
        for compact in [true, false] {
            let mut sink = JsonSink::new(ClosedPipe, 0, compact);
            assert!(sink.frame(&on_battery()).unwrap().is_break());
        }
    }

    #[test]
    fn other_write_errors_propagate() {
        let mut sink = JsonSink::new(FullDisk, 0, true);
        let err = sink.frame(&on_battery()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }
}
