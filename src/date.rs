//! Resolve a document's `date` field to a timestamp.
//!
//! The field is tried as an already-structured date, then as a Unix epoch
//! number, then against a list of explicit formats, then as generic
//! ISO-8601. When all of those fail the file's modification time is used,
//! so every indexed document ends up with a date.

use std::time::SystemTime;

use chrono::{
    DateTime,
    Datelike,
    FixedOffset,
    Local,
    NaiveDate,
    NaiveDateTime,
    Timelike,
};
use serde_yaml::Value;

/// Explicit formats, tried in order.
const OFFSET_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S"];
const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

/// Extra shapes accepted by the generic ISO-8601 fallback.
const ISO_NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A resolved date, with or without a UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedDate {
    Naive(NaiveDateTime),
    Offset(DateTime<FixedOffset>),
}

impl ResolvedDate {
    /// Local wall-clock time of the given instant.
    pub fn from_system_time(time: SystemTime) -> Self {
        Self::Naive(DateTime::<Local>::from(time).naive_local())
    }

    fn naive(&self) -> NaiveDateTime {
        match self {
            Self::Naive(dt) => *dt,
            Self::Offset(dt) => dt.naive_local(),
        }
    }

    pub fn year(&self) -> i32 {
        self.naive().year()
    }

    pub fn month(&self) -> u32 {
        self.naive().month()
    }

    pub fn day(&self) -> u32 {
        self.naive().day()
    }

    /// ISO-8601 rendering: `2024-01-31T09:30:00`, with `.ffffff` only when
    /// there are sub-second digits and `+09:00` only when an offset is known.
    pub fn to_iso(&self) -> String {
        let naive = self.naive();
        let mut out = naive.format("%Y-%m-%dT%H:%M:%S").to_string();
        let micros = naive.nanosecond() / 1_000;
        if micros > 0 {
            out.push_str(&format!(".{micros:06}"));
        }
        if let Self::Offset(dt) = self {
            out.push_str(&dt.format("%:z").to_string());
        }
        out
    }
}

/// The forms a raw `date` value can take.
#[derive(Debug, Clone, PartialEq)]
pub enum DateInput<'a> {
    Structured(ResolvedDate),
    Epoch(f64),
    Text(&'a str),
}

impl<'a> DateInput<'a> {
    pub fn from_value(value: &'a Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Self::Epoch),
            Value::String(s) => Some(Self::Text(s)),
            Value::Tagged(tagged) => Self::from_value(&tagged.value),
            _ => None,
        }
    }

    pub fn parse(&self) -> Option<ResolvedDate> {
        match self {
            Self::Structured(date) => Some(*date),
            Self::Epoch(secs) => from_epoch(*secs),
            Self::Text(text) => parse_text(text),
        }
    }
}

fn from_epoch(secs: f64) -> Option<ResolvedDate> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round() as u32;
    let utc = DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))?;
    Some(ResolvedDate::Naive(utc.with_timezone(&Local).naive_local()))
}

/// Parse a textual date: explicit formats first, then ISO-8601.
pub fn parse_text(text: &str) -> Option<ResolvedDate> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_str(text, OFFSET_FORMAT) {
        return Some(ResolvedDate::Offset(dt));
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(ResolvedDate::Naive(dt));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, DATE_ONLY_FORMAT) {
        return Some(ResolvedDate::Naive(date.and_hms_opt(0, 0, 0)?));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(ResolvedDate::Offset(dt));
    }
    ISO_NAIVE_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(text, format)
            .ok()
            .map(ResolvedDate::Naive)
    })
}

/// Resolve `value`, falling back to `mtime` when it is absent or unreadable.
pub fn resolve(value: Option<&Value>, mtime: SystemTime) -> ResolvedDate {
    value
        .and_then(DateInput::from_value)
        .and_then(|input| input.parse())
        .unwrap_or_else(|| ResolvedDate::from_system_time(mtime))
}
