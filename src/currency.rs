//! Currency formatting for amounts shown to users.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

/// Format `number` as dollars with two decimal places, e.g. "$12.30" or "-$42.50".
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .expect("\"$\" is a valid currency prefix")
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .expect("\"-$\" is a valid currency prefix")
            .precision(Precision::Decimals(2))
    });

    // numfmt truncates extra decimals, so round to the nearest cent first.
    let rounded = (number * 100.0).round() / 100.0;

    if rounded == 0.0 {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        return "$0.00".to_owned();
    }

    if !rounded.is_finite() {
        return positive_fmt.fmt_string(rounded);
    }

    if rounded.abs() >= SCIENTIFIC_CUTOFF {
        let sign = if rounded < 0.0 { "-" } else { "" };
        return format!("{sign}${}", group_thousands(&format!("{:.2}", rounded.abs())));
    }

    let formatted_string = if rounded < 0.0 {
        negative_fmt.fmt_string(rounded.abs())
    } else {
        positive_fmt.fmt_string(rounded)
    };

    pad_cents(formatted_string)
}

// numfmt switches to scientific notation at and above this magnitude.
const SCIENTIFIC_CUTOFF: f64 = 1e12;

// Insert commas into the whole part of a plain decimal string, e.g. "1234.50" -> "1,234.50".
fn group_thousands(plain: &str) -> String {
    let (whole, fraction) = plain.split_once('.').unwrap_or((plain, "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3 + fraction.len() + 1);

    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{grouped}.{fraction}")
}

// numfmt drops trailing zeros, e.g. "12.30" is rendered as "12.3".
fn pad_cents(formatted_string: String) -> String {
    match formatted_string.rfind('.') {
        None => format!("{formatted_string}.00"),
        Some(dot) if formatted_string.len() - dot == 2 => format!("{formatted_string}0"),
        Some(_) => formatted_string,
    }
}

#[cfg(test)]
mod tests {
    use super::{format_currency, group_thousands, pad_cents};

    #[test]
    fn formats_zero() {
        assert_eq!(format_currency(0.0), "$0.00");
    }

    #[test]
    fn formats_positive_with_two_decimals() {
        assert_eq!(format_currency(12.3), "$12.30");
    }

    #[test]
    fn formats_negative_with_sign_before_dollar() {
        assert_eq!(format_currency(-42.5), "-$42.50");
    }

    #[test]
    fn rounds_to_nearest_cent() {
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(-12.345_1), "-$12.35");
        assert_eq!(format_currency(0.29), "$0.29");
    }

    #[test]
    fn formats_fractions_of_a_cent_as_zero() {
        assert_eq!(format_currency(0.004), "$0.00");
        assert_eq!(format_currency(-0.004), "$0.00");
    }

    #[test]
    fn formats_small_amounts_without_exponent() {
        assert_eq!(format_currency(0.01), "$0.01");
        assert_eq!(format_currency(0.005), "$0.01");
    }

    #[test]
    fn formats_large_amounts_without_exponent() {
        assert_eq!(format_currency(1e13), "$10,000,000,000,000.00");
        assert_eq!(format_currency(-1_234_567_890_123.4), "-$1,234,567,890,123.40");
        assert_eq!(format_currency(999_999_999_999.0), "$999,999,999,999.00");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands("100.00"), "100.00");
        assert_eq!(group_thousands("1000.00"), "1,000.00");
        assert_eq!(group_thousands("1234567.89"), "1,234,567.89");
    }

    #[test]
    fn pads_missing_cents() {
        assert_eq!(pad_cents("$100".to_owned()), "$100.00");
        assert_eq!(pad_cents("$1,234.5".to_owned()), "$1,234.50");
        assert_eq!(pad_cents("$9.99".to_owned()), "$9.99");
    }
}
