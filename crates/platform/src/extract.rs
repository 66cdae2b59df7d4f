//! Range-checked field extraction from free-form sampler text.
//!
//! Both external sources print human-oriented text, and both occasionally
//! emit garbled or half-written values. Every numeric field therefore
//! carries a plausibility range; a match outside it is treated exactly
//! like no match at all.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use regex::Regex;

/// Extract the first capture group of `pattern` from `text`, parsed as `T`.
///
/// Returns `None` when the pattern does not match, the capture does not
/// parse, or the value falls outside `range`. Never panics.
pub fn extract_bounded<T>(text: &str, pattern: &Regex, range: &RangeInclusive<T>) -> Option<T>
where
    T: FromStr + PartialOrd,
{
    let captured = pattern.captures(text)?.get(1)?.as_str();
    let value = captured.parse::<T>().ok()?;
    range.contains(&value).then_some(value)
}

/// Extract a `Yes`/`No` flag from the first capture group of `pattern`.
pub fn extract_flag(text: &str, pattern: &Regex) -> Option<bool> {
    match pattern.captures(text)?.get(1)?.as_str() {
        "Yes" => Some(true),
        "No" => Some(false),
        _ => None,
    }
}

/// Identifies a telemetry field, for logging and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CpuPower,
    GpuPower,
    AnePower,
    PackagePower,
    BatteryPercent,
    ChargerWatts,
    ChargerVoltage,
    ChargerCurrent,
    BatteryVoltage,
    BatteryAmperage,
    Temperature,
    IsCharging,
    ExternalConnected,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::CpuPower => "cpu_power",
            Field::GpuPower => "gpu_power",
            Field::AnePower => "ane_power",
            Field::PackagePower => "package_power",
            Field::BatteryPercent => "battery_percent",
            Field::ChargerWatts => "charger_watts",
            Field::ChargerVoltage => "charger_voltage",
            Field::ChargerCurrent => "charger_current",
            Field::BatteryVoltage => "battery_voltage",
            Field::BatteryAmperage => "battery_amperage",
            Field::Temperature => "temperature",
            Field::IsCharging => "is_charging",
            Field::ExternalConnected => "external_connected",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

enum Kind<S> {
    Float {
        range: RangeInclusive<f64>,
        set: fn(&mut S, f64),
    },
    Int {
        range: RangeInclusive<i64>,
        set: fn(&mut S, i64),
    },
    Flag {
        set: fn(&mut S, bool),
    },
}

/// One row of a field table: which field, how to find it, what values are
/// plausible, and where to store it.
pub struct FieldSpec<S> {
    field: Field,
    pattern: Regex,
    kind: Kind<S>,
}

impl<S> FieldSpec<S> {
    /// Panics if `pattern` is not a valid regex; patterns are compile-time
    /// constants.
    pub fn float(
        field: Field,
        pattern: &str,
        range: RangeInclusive<f64>,
        set: fn(&mut S, f64),
    ) -> Self {
        Self {
            field,
            pattern: compile(field, pattern),
            kind: Kind::Float { range, set },
        }
    }

    pub fn int(
        field: Field,
        pattern: &str,
        range: RangeInclusive<i64>,
        set: fn(&mut S, i64),
    ) -> Self {
        Self {
            field,
            pattern: compile(field, pattern),
            kind: Kind::Int { range, set },
        }
    }

    pub fn flag(field: Field, pattern: &str, set: fn(&mut S, bool)) -> Self {
        Self {
            field,
            pattern: compile(field, pattern),
            kind: Kind::Flag { set },
        }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    fn extract(&self, text: &str) -> Option<Extracted<S>> {
        let value = match &self.kind {
            Kind::Float { range, set } => {
                Value::Float(*set, extract_bounded(text, &self.pattern, range)?)
            }
            Kind::Int { range, set } => {
                Value::Int(*set, extract_bounded(text, &self.pattern, range)?)
            }
            Kind::Flag { set } => Value::Flag(*set, extract_flag(text, &self.pattern)?),
        };
        Some(Extracted {
            field: self.field,
            value,
        })
    }
}

fn compile(field: Field, pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid pattern for {field}: {e}"))
}

enum Value<S> {
    Float(fn(&mut S, f64), f64),
    Int(fn(&mut S, i64), i64),
    Flag(fn(&mut S, bool), bool),
}

struct Extracted<S> {
    field: Field,
    value: Value<S>,
}

/// Values pulled out of one input, not yet stored anywhere.
///
/// Scanning happens outside any lock; [`Readings::apply`] is the only part
/// that needs the destination.
pub struct Readings<S> {
    items: Vec<Extracted<S>>,
}

impl<S> Readings<S> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.items.iter().map(|item| item.field)
    }

    /// Store every extracted value into `target`, returning the count.
    pub fn apply(&self, target: &mut S) -> usize {
        for item in &self.items {
            match item.value {
                Value::Float(set, v) => set(target, v),
                Value::Int(set, v) => set(target, v),
                Value::Flag(set, v) => set(target, v),
            }
        }
        self.items.len()
    }
}

/// A declarative list of fields to look for in one kind of input.
pub struct FieldTable<S> {
    specs: Vec<FieldSpec<S>>,
}

impl<S> FieldTable<S> {
    pub fn new(specs: Vec<FieldSpec<S>>) -> Self {
        Self { specs }
    }

    pub fn specs(&self) -> &[FieldSpec<S>] {
        &self.specs
    }

    /// Check every field against `text` once.
    pub fn scan(&self, text: &str) -> Readings<S> {
        Readings {
            items: self
                .specs
                .iter()
                .filter_map(|spec| spec.extract(text))
                .collect(),
        }
    }

    /// Scan `text` and store the results into `target` directly.
    pub fn apply(&self, text: &str, target: &mut S) -> usize {
        self.scan(text).apply(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Probe {
        watts: f64,
        level: i64,
        plugged: bool,
    }

    type Spec = FieldSpec<Probe>;

    fn table() -> FieldTable<Probe> {
        FieldTable::new(vec![
            Spec::float(
                Field::CpuPower,
                r"Watts: ([\d.]+)",
                0.0..=100.0,
                |p, v| p.watts = v,
            ),
            Spec::int(Field::BatteryPercent, r"Level: (-?\d+)", 0..=100, |p, v| {
                p.level = v
            }),
            Spec::flag(Field::ExternalConnected, r"Plugged: (\w+)", |p, v| {
                p.plugged = v
            }),
        ])
    }

    #[test]
    fn bounded_accepts_values_inside_range() {
        let re = Regex::new(r"v=(-?\d+)").unwrap();
        assert_eq!(extract_bounded("v=5", &re, &(0..=10)), Some(5));
        assert_eq!(extract_bounded("v=0", &re, &(0..=10)), Some(0));
        assert_eq!(extract_bounded("v=10", &re, &(0..=10)), Some(10));
    }

    #[test]
    fn bounded_rejects_values_outside_range() {
        let re = Regex::new(r"v=(-?\d+)").unwrap();
        assert_eq!(extract_bounded("v=11", &re, &(0..=10)), None);
        assert_eq!(extract_bounded("v=-1", &re, &(0..=10)), None);
    }

    #[test]
    fn bounded_rejects_missing_and_unparsable_matches() {
        let re = Regex::new(r"v=([\d.]+)").unwrap();
        assert_eq!(extract_bounded("nothing here", &re, &(0.0..=10.0)), None);
        assert_eq!(extract_bounded("v=1.2.3", &re, &(0.0..=10.0)), None);
        let re = Regex::new(r"v=(-?\d+)").unwrap();
        assert_eq!(
            extract_bounded("v=18446744073709550616", &re, &(i64::MIN..=i64::MAX)),
            None
        );
    }

    #[test]
    fn flag_only_accepts_yes_or_no() {
        let re = Regex::new(r"on=(\w+)").unwrap();
        assert_eq!(extract_flag("on=Yes", &re), Some(true));
        assert_eq!(extract_flag("on=No", &re), Some(false));
        assert_eq!(extract_flag("on=maybe", &re), None);
        assert_eq!(extract_flag("off", &re), None);
    }

    #[test]
    fn table_applies_only_matching_fields() {
        let table = table();
        let mut probe = Probe {
            watts: 1.0,
            level: 50,
            plugged: true,
        };

        assert_eq!(table.apply("Watts: 12.5", &mut probe), 1);
        assert_eq!(
            probe,
            Probe {
                watts: 12.5,
                level: 50,
                plugged: true,
            }
        );
    }

    #[test]
    fn table_keeps_previous_value_on_out_of_range_input() {
        let table = table();
        let mut probe = Probe {
            watts: 3.0,
            level: 50,
            plugged: false,
        };

        assert_eq!(table.apply("Level: 250 Watts: 900.0", &mut probe), 0);
        assert_eq!(probe.level, 50);
        assert_eq!(probe.watts, 3.0);
    }

    #[test]
    fn scan_reports_matched_fields_without_touching_target() {
        let table = table();
        let readings = table.scan("Level: 42 Plugged: Yes");
        assert_eq!(readings.len(), 2);
        assert_eq!(
            readings.fields().collect::<Vec<_>>(),
            vec![Field::BatteryPercent, Field::ExternalConnected]
        );

        let mut probe = Probe::default();
        readings.apply(&mut probe);
        assert_eq!(probe.level, 42);
        assert!(probe.plugged);
    }

    #[test]
    fn scan_of_unrelated_text_is_empty() {
        assert!(table().scan("*** Sampled system activity").is_empty());
    }
}
