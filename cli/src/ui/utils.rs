use std::borrow::Cow;

use crossterm::style::{Color, Stylize};
use once_cell::sync::Lazy;
use regex::Regex;

/// Visible columns between `║ ` and ` ║`.
pub const INNER_WIDTH: usize = 52;

const RULE_WIDTH: usize = INNER_WIDTH + 2;

static SGR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("Invalid SGR pattern"));

/// Remove color and attribute escape sequences.
pub fn strip_styles(s: &str) -> Cow<'_, str> {
    SGR.replace_all(s, "")
}

/// Terminal columns `s` occupies once escape sequences are removed.
pub fn visible_len(s: &str) -> usize {
    strip_styles(s).chars().count()
}

/// Frame `content` as one boxed row, padded to [`INNER_WIDTH`].
///
/// Content wider than the box gets no padding and is not truncated, so the
/// right border shifts out of line.
pub fn line(content: &str) -> String {
    let pad = INNER_WIDTH.saturating_sub(visible_len(content));
    format!("║ {}{} ║", content, " ".repeat(pad))
}

pub fn top_border() -> String {
    format!("╔{}╗", "═".repeat(RULE_WIDTH))
}

pub fn separator() -> String {
    format!("╠{}╣", "═".repeat(RULE_WIDTH))
}

pub fn bottom_border() -> String {
    format!("╚{}╝", "═".repeat(RULE_WIDTH))
}

pub fn paint(text: &str, color: Color) -> String {
    text.with(color).to_string()
}

/// Filled and empty cell counts for a `pct` bar of `width` cells.
pub fn bar_cells(pct: i64, width: usize) -> (usize, usize) {
    let pct = pct.clamp(0, 100) as usize;
    let filled = pct * width / 100;
    (filled, width - filled)
}

/// Proportional bar: `pct` is clamped to 0..=100 and always yields exactly
/// `width` cells.
pub fn color_bar(pct: i64, width: usize, color: Color) -> String {
    let (filled, empty) = bar_cells(pct, width);
    format!(
        "{}{}",
        "█".repeat(filled).with(color),
        "░".repeat(empty).dim()
    )
}

/// System and battery cell counts for a split bar. The battery side takes
/// whatever rounding leaves over.
pub fn split_cells(system_pct: i64, width: usize) -> (usize, usize) {
    let system = system_pct.clamp(0, 100) as usize * width / 100;
    (system, width - system)
}

pub fn split_bar(system_pct: i64, width: usize, system: Color, battery: Color) -> String {
    let (system_cells, battery_cells) = split_cells(system_pct, width);
    format!(
        "{}{}",
        "█".repeat(system_cells).with(system),
        "█".repeat(battery_cells).with(battery)
    )
}
