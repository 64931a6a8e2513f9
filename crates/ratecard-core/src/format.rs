//! Output formatting for currency, counts and percentages
//!
//! Calculations never round; these helpers are applied only when rendering.

/// Group the integer digits of `digits` with commas ("1234567" → "1,234,567")
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn format_fixed(value: f64, decimals: usize) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let raw = format!("{:.*}", decimals, value.abs());
    let (int, frac) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw.as_str(), None),
    };
    // Values that round to zero print unsigned
    let negative = value < 0.0 && raw.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(int));
    if let Some(f) = frac {
        out.push('.');
        out.push_str(f);
    }
    out
}

/// Format as USD with cents ("$1,234.50", "-$20.00")
pub fn format_currency(value: f64) -> String {
    let s = format_fixed(value, 2);
    match s.strip_prefix('-') {
        Some(rest) => format!("-${rest}"),
        None => format!("${s}"),
    }
}

/// Format as whole USD ("$7,000")
pub fn format_currency_whole(value: f64) -> String {
    let s = format_fixed(value, 0);
    match s.strip_prefix('-') {
        Some(rest) => format!("-${rest}"),
        None => format!("${s}"),
    }
}

/// Format a per-unit rate with enough precision for fractional cents ("$0.0083")
pub fn format_rate(value: f64) -> String {
    let s = format!("{value:.5}");
    let trimmed = s.trim_end_matches('0');
    let trimmed = match trimmed.split_once('.') {
        Some((_, frac)) if frac.len() < 2 => format!("{trimmed}{}", "0".repeat(2 - frac.len())),
        _ => trimmed.to_string(),
    };
    format!("${trimmed}")
}

/// Format a count rounded to a whole number with grouping ("12,500")
pub fn format_number(value: f64) -> String {
    format_fixed(value.round(), 0)
}

/// Format a percentage value (already ×100) with one decimal ("35.2%")
pub fn format_percent(value: f64) -> String {
    format!("{}%", format_fixed(value, 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(11.3), "$11.30");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(-20.0), "-$20.00");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn test_format_currency_whole() {
        assert_eq!(format_currency_whole(7000.0), "$7,000");
        assert_eq!(format_currency_whole(999.6), "$1,000");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(0.0083), "$0.0083");
        assert_eq!(format_rate(0.01165), "$0.01165");
        assert_eq!(format_rate(97.0), "$97.00");
        assert_eq!(format_rate(2.5), "$2.50");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(12_500.4), "12,500");
        assert_eq!(format_number(1_000_000.0), "1,000,000");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(87.9), "87.9%");
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(-12.34), "-12.3%");
    }
}
