use std::time::Instant;

const MS_PER_SECOND: f64 = 1_000.0;
const MS_PER_MINUTE: f64 = 60_000.0;
const MS_PER_HOUR: f64 = 3_600_000.0;
const MS_PER_DAY: f64 = 86_400_000.0;

/// Milliseconds between two monotonic marks, keeping sub-millisecond precision.
///
/// Saturates to zero when `finished_at` precedes `started_at`.
pub fn elapsed_ms(started_at: Instant, finished_at: Instant) -> f64 {
    let elapsed = finished_at.saturating_duration_since(started_at);
    elapsed.as_nanos() as f64 / 1e6
}

/// Renders a millisecond count the way humans read it: `"87ms"`, `"1.3s"`,
/// `"2h 5m 12s"`.
///
/// Below one second the value is rounded up to whole milliseconds. Above it,
/// zero-valued units are skipped and seconds keep a single decimal.
pub fn format_duration(ms: f64) -> String {
    let ms = if ms.is_finite() { ms.max(0.0) } else { 0.0 };

    if ms < MS_PER_SECOND {
        return format!("{}ms", ms.ceil() as u64);
    }

    let days = (ms / MS_PER_DAY).trunc() as u64;
    let hours = (ms / MS_PER_HOUR).trunc() as u64 % 24;
    let minutes = (ms / MS_PER_MINUTE).trunc() as u64 % 60;

    let mut parts = Vec::with_capacity(5);
    push_unit(&mut parts, days / 365, "y");
    push_unit(&mut parts, days % 365, "d");
    push_unit(&mut parts, hours, "h");
    push_unit(&mut parts, minutes, "m");

    // Seconds that round to zero at one decimal are left out.
    let tenths = ((ms / MS_PER_SECOND) % 60.0 * 10.0).round() as u64;
    if tenths != 0 {
        if tenths % 10 == 0 {
            parts.push(format!("{}s", tenths / 10));
        } else {
            parts.push(format!("{}.{}s", tenths / 10, tenths % 10));
        }
    }

    parts.join(" ")
}

fn push_unit(parts: &mut Vec<String>, value: u64, suffix: &str) {
    if value > 0 {
        parts.push(format!("{value}{suffix}"));
    }
}
