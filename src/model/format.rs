//! Number formatting for display

/// Format a count with thousands separators, e.g. `12,345`
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Gender balance with two decimals, `N/A` when unknown
pub fn format_balance(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "N/A".to_string(),
    }
}

/// Percentage with one decimal
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Year span such as `1880–2023`
pub fn format_years(start: i32, end: i32) -> String {
    if start == 0 && end == 0 {
        return "—".to_string();
    }
    format!("{}–{}", start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_format_balance() {
        assert_eq!(format_balance(Some(72.181)), "72.18");
        assert_eq!(format_balance(None), "N/A");
    }

    #[test]
    fn test_format_percent_and_years() {
        assert_eq!(format_percent(11.93), "11.9%");
        assert_eq!(format_years(1880, 2023), "1880–2023");
        assert_eq!(format_years(0, 0), "—");
    }
}
