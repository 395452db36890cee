/// Parses an upstream numeric-like string into a non-negative integer.
///
/// Thousands separators are stripped and the leading run of decimal digits is
/// read, so `"1,234"` is 1234 and `"30-165"` is 30. Anything without a leading
/// digit (`"unknown"`, `"n/a"`, `""`, negative values) is 0, which means a
/// missing value and a real zero look the same to every consumer.
pub fn normalize(raw: &str) -> u64 {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);

    let mut value: u64 = 0;
    let mut seen_digit = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(10) else { break };
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(u64::from(d));
    }

    if seen_digit {
        value
    } else {
        0
    }
}

/// Crew plus passengers, the quantity plotted on the y axis.
pub fn people(crew_raw: &str, passengers_raw: &str) -> u64 {
    normalize(crew_raw).saturating_add(normalize(passengers_raw))
}
