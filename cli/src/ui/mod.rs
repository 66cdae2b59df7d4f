mod battery;
mod power;
pub mod utils;

use std::io::{self, Write};
use std::ops::ControlFlow;

use chrono::Local;
use crossterm::style::Color;
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, execute, queue};
use wattch_protocol::{PowerReadings, TelemetrySnapshot};

use crate::data::FrameSink;
use utils::{bottom_border, line, separator, top_border};

pub(crate) const SILICON: Color = Color::Magenta;
pub(crate) const ADAPTER: Color = Color::Green;
pub(crate) const DRAIN: Color = Color::Red;
pub(crate) const SYSTEM_SHARE: Color = Color::Cyan;
pub(crate) const BATTERY_SHARE: Color = Color::Yellow;

const TITLE: &str = "       LIVE POWER MONITOR  (Ctrl+C to stop)";

/// Every row of the dashboard, top border to bottom border.
pub fn render_rows(readings: &PowerReadings, clock: &str) -> Vec<String> {
    let mut rows = vec![top_border(), line(TITLE), separator()];
    rows.extend(power::silicon_rows(readings));
    rows.push(separator());
    rows.extend(power::supply_rows(readings));
    rows.push(separator());
    rows.extend(battery::rows(readings));
    rows.push(separator());
    rows.push(line(clock));
    rows.push(bottom_border());
    rows
}

/// Redraws the box in place on every frame.
pub struct Dashboard<W: Write> {
    term: TerminalGuard<W>,
}

impl<W: Write> Dashboard<W> {
    /// Take over `out`; the cursor comes back when the dashboard drops.
    pub fn new(out: W) -> io::Result<Self> {
        Ok(Self {
            term: TerminalGuard::enter(out)?,
        })
    }

    pub fn draw(&mut self, snapshot: &TelemetrySnapshot, clock: &str) -> io::Result<()> {
        let readings = PowerReadings::from(snapshot);
        let out = &mut self.term.out;

        queue!(out, cursor::MoveTo(0, 0))?;
        for row in render_rows(&readings, clock) {
            writeln!(out, "{row}")?;
        }
        writeln!(out)?;
        // The battery layout is shorter than the charger one; wipe what a
        // previous, taller frame left below.
        queue!(out, Clear(ClearType::FromCursorDown))?;
        out.flush()
    }
}

impl<W: Write> FrameSink for Dashboard<W> {
    fn frame(&mut self, snapshot: &TelemetrySnapshot) -> io::Result<ControlFlow<()>> {
        let clock = Local::now().format("%H:%M:%S").to_string();
        self.draw(snapshot, &clock)?;
        Ok(ControlFlow::Continue(()))
    }
}

/// Hides the cursor and clears the screen for the lifetime of the guard.
pub struct TerminalGuard<W: Write> {
    out: W,
}

impl<W: Write> TerminalGuard<W> {
    pub fn enter(mut out: W) -> io::Result<Self> {
        execute!(
            out,
            cursor::Hide,
            Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        Ok(Self { out })
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        let _ = execute!(self.out, cursor::Show);
        let _ = writeln!(self.out);
    }
}
