//! en-US number formatting for slot text.

/// `$1,234` style, no decimals; non-finite amounts render as `$0`
pub fn format_currency(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let rounded = amount.round();
    let digits = group_thousands(rounded.abs() as u64);
    if rounded < 0.0 {
        format!("-${digits}")
    } else {
        format!("${digits}")
    }
}

/// `1,234` style
pub fn format_number(value: u64) -> String {
    group_thousands(value)
}

/// One decimal place followed by `%`
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

fn group_thousands(value: u64) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(1234567.5), "$1,234,568");
        assert_eq!(format_currency(-2500.0), "-$2,500");
        assert_eq!(format_currency(f64::NAN), "$0");
    }

    #[test]
    fn test_number_and_percent() {
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(12), "12");
        assert_eq!(format_percent(12.345), "12.3%");
        assert_eq!(format_percent(-35.0), "-35.0%");
    }
}
