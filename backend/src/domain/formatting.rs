//! tr-TR number formatting and rounding helpers.
//!
//! Turkish notation groups thousands with dots and separates decimals with a
//! comma: `3500000.0` is shown as `3.500.000,00`.

/// Round half away from zero to `decimals` places
pub fn round_dp(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Format a number in tr-TR notation with a fixed number of decimals
pub fn format_tr_number(value: f64, decimals: u32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.*}", decimals as usize, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    // -0,00 is shown as 0,00
    let negative = value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0');

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push(',');
        out.push_str(frac);
    }
    out
}

/// Format a TRY amount the way the calculator displays it, e.g. `₺1.234,56`
pub fn format_try(value: f64) -> String {
    let number = format_tr_number(value, 2);
    match number.strip_prefix('-') {
        Some(abs) => format!("-₺{}", abs),
        None => format!("₺{}", number),
    }
}

/// Format a percentage with the sign in front, e.g. `%0,99`
pub fn format_percent(value: f64) -> String {
    format!("%{}", format_tr_number(value, 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_dp() {
        assert_eq!(round_dp(43.49184, 4), 43.4918);
        assert_eq!(round_dp(2.5, 0), 3.0);
        assert_eq!(round_dp(3517500.004, 2), 3517500.0);
        assert!(round_dp(f64::NAN, 2).is_nan());
    }

    #[test]
    fn test_format_tr_number_groups_thousands() {
        assert_eq!(format_tr_number(3_500_000.0, 2), "3.500.000,00");
        assert_eq!(format_tr_number(1234.5, 2), "1.234,50");
        assert_eq!(format_tr_number(999.999, 2), "1.000,00");
        assert_eq!(format_tr_number(12.0, 0), "12");
        assert_eq!(format_tr_number(0.5, 4), "0,5000");
    }

    #[test]
    fn test_format_tr_number_negative_values() {
        assert_eq!(format_tr_number(-1234567.891, 2), "-1.234.567,89");
        assert_eq!(format_tr_number(-0.001, 2), "0,00");
    }

    #[test]
    fn test_format_try_and_percent() {
        assert_eq!(format_try(2636.14), "₺2.636,14");
        assert_eq!(format_try(-5.0), "-₺5,00");
        assert_eq!(format_percent(0.99), "%0,99");
        assert_eq!(format_percent(9.99), "%9,99");
    }
}
