// src/config/duration.rs

//! Duration strings used by `short_task_timeout` (`"250ms"`, `"30s"`,
//! `"5m"`, `"1h"`).

use std::time::Duration;

/// Parse `<digits><unit>` with unit `ms`, `s`, `m` or `h`.
///
/// Values whose length in seconds does not fit a `u64` are rejected rather
/// than wrapped.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let split = s
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| format!("'{s}' needs a unit (ms, s, m or h)"))?;
    let (digits, unit) = s.split_at(split);
    if digits.is_empty() {
        return Err(format!("'{s}' does not start with a number"));
    }

    let value: u64 = digits
        .parse()
        .map_err(|e| format!("'{digits}' is not a valid count: {e}"))?;

    let secs_per_unit = match unit.trim().to_ascii_lowercase().as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        other => return Err(format!("unknown unit '{other}'; use ms, s, m or h")),
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("'{s}' is too large"))
}
