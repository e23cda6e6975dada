/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use meeting_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by a relative epsilon so exact midpoints such as 1.005 are not
    // lost to their binary representation.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", rounded.fract(), prec = decimals as usize);
        // "0.50" → ".50"
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a number of hours for the `Total Time (hr)` column.
///
/// ```
/// use meeting_core::formatting::format_hours;
///
/// assert_eq!(format_hours(3.0), "3.00");
/// assert_eq!(format_hours(1234.567), "1,234.57");
/// ```
pub fn format_hours(hours: f64) -> String {
    format_number(hours, 2)
}

/// Format a meeting length in minutes as `"45m"`, `"1h"` or `"1h 30m"`.
///
/// ```
/// use meeting_core::formatting::format_minutes;
///
/// assert_eq!(format_minutes(45), "45m");
/// assert_eq!(format_minutes(60), "1h");
/// assert_eq!(format_minutes(90), "1h 30m");
/// ```
pub fn format_minutes(minutes: i64) -> String {
    if minutes < 60 {
        return format!("{}m", minutes);
    }
    let hours = minutes / 60;
    let mins = minutes % 60;
    if mins == 0 {
        format!("{}h", hours)
    } else {
        format!("{}h {}m", hours, mins)
    }
}

/// Share of `part` in `whole` as a percentage string with one decimal.
/// `"0.0%"` when `whole` is zero.
pub fn format_share(part: u32, whole: u32) -> String {
    if whole == 0 {
        return "0.0%".to_string();
    }
    let pct = f64::from(part) / f64::from(whole) * 100.0;
    format!("{}%", format_number(pct, 1))
}

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let remainder = s.len() % 3;
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i != 0 && i % 3 == remainder {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
