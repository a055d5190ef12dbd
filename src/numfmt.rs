//! Number formatting shared by the console report and chart labels.

pub const CURRENCY: &str = "R$";

/// Format with a comma thousands separator, e.g. `1234567.891, 2` →
/// `1,234,567.89`.
pub fn thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

pub fn currency(value: f64, decimals: usize) -> String {
    format!("{CURRENCY} {}", thousands(value, decimals))
}

/// `Some(v)` formatted with `decimals`, `-` otherwise.
pub fn optional(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| thousands(v, decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0.0, 2), "0.00");
        assert_eq!(thousands(999.0, 0), "999");
        assert_eq!(thousands(1000.0, 0), "1,000");
        assert_eq!(thousands(1_234_567.891, 2), "1,234,567.89");
        assert_eq!(thousands(-45_000.5, 1), "-45,000.5");
        assert_eq!(thousands(-0.001, 2), "0.00");
    }

    #[test]
    fn test_currency_and_optional() {
        assert_eq!(currency(150_000.5, 2), "R$ 150,000.50");
        assert_eq!(optional(None, 2), "-");
        assert_eq!(optional(Some(3.14159), 3), "3.142");
    }
}
