//! Canonicalization of human-readable memory sizes and durations.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

static MEMORY_SIZE_REGEX: OnceLock<Regex> = OnceLock::new();
static DURATION_REGEX: OnceLock<Regex> = OnceLock::new();
static SECONDS_REGEX: OnceLock<Regex> = OnceLock::new();

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

fn memory_size_regex() -> &'static Regex {
    MEMORY_SIZE_REGEX.get_or_init(|| {
        Regex::new(r"(?i)^(\d+)\s*(bytes|byte|b|kb|k|mb|m|gb|g|tb|t|pb|p)?$").unwrap()
    })
}

fn duration_regex() -> &'static Regex {
    DURATION_REGEX
        .get_or_init(|| Regex::new(r"(?i)^(?:(\d+) days?, )?(\d{1,2}):(\d\d):(\d\d)$").unwrap())
}

fn seconds_regex() -> &'static Regex {
    SECONDS_REGEX.get_or_init(|| Regex::new(r"^\d+$").unwrap())
}

fn memory_size_multiplier(suffix: &str) -> u64 {
    match suffix.to_lowercase().as_str() {
        "kb" | "k" => 1024,
        "mb" | "m" => 1024u64.pow(2),
        "gb" | "g" => 1024u64.pow(3),
        "tb" | "t" => 1024u64.pow(4),
        "pb" | "p" => 1024u64.pow(5),
        _ => 1,
    }
}

/// Parses a memory size such as `16 GB`, `3kb` or `0` into bytes.
///
/// Units are binary (`1 kb == 1024`) and case-insensitive; a missing unit means bytes.
pub fn parse_memory_size(raw: &str) -> Option<u64> {
    let captures = memory_size_regex().captures(raw.trim())?;
    let value: u64 = captures[1].parse().ok()?;
    let multiplier = captures
        .get(2)
        .map_or(1, |suffix| memory_size_multiplier(suffix.as_str()));
    value.checked_mul(multiplier)
}

/// Parses a duration in the `D days, H:MM:SS` form (the days part being optional),
/// or a plain number of seconds, into seconds.
pub fn parse_duration(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if seconds_regex().is_match(raw) {
        return raw.parse().ok();
    }

    let captures = duration_regex().captures(raw)?;
    let days: u64 = captures.get(1).map_or(Some(0), |d| d.as_str().parse().ok())?;
    let hours: u64 = captures[2].parse().ok()?;
    let minutes: u64 = captures[3].parse().ok()?;
    let seconds: u64 = captures[4].parse().ok()?;

    days.checked_mul(SECONDS_PER_DAY)?
        .checked_add(hours * 3600 + minutes * 60 + seconds)
}

/// Maps a raw value to its canonical comparable form.
///
/// Strings that read as a memory size become a byte count, strings that read as a
/// duration become a number of seconds; anything else is returned unchanged.
pub fn normalize(value: &Value) -> Value {
    match value {
        Value::String(s) => parse_memory_size(s)
            .or_else(|| parse_duration(s))
            .map_or_else(|| value.clone(), Value::from),
        other => other.clone(),
    }
}
