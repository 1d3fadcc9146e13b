//! Canonical double formatting.
//!
//! See `spec.md` §4.6 "Expansion direction" and the "Double formatting" rule: a fixed
//! sixteen-significant-digit mantissa and a two-digit signed exponent, independent of
//! Rust's or the platform's default float-to-string rendering.

/// Formats `n` as `d.ddddddddddddddd e±dd` (fifteen fractional digits, sixteen
/// significant digits total, two-digit signed exponent).
pub(crate) fn format_canonical(n: f64) -> String {
    let formatted = format!("{:.15e}", n);
    let (mantissa, exp) = formatted
        .split_once('e')
        .expect("Rust's scientific notation always contains `e`");
    let exp_value: i32 = exp.parse().expect("exponent is always a valid integer");
    format!(
        "{}e{}{:02}",
        mantissa,
        if exp_value < 0 { "-" } else { "+" },
        exp_value.abs()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_one_point_five() {
        assert_eq!(format_canonical(1.5), "1.500000000000000e+00");
    }

    #[test]
    fn pads_single_digit_exponents() {
        assert_eq!(format_canonical(0.0015), "1.500000000000000e-03");
    }

    #[test]
    fn handles_negative_numbers() {
        assert_eq!(format_canonical(-1.5), "-1.500000000000000e+00");
    }

    #[test]
    fn handles_large_exponents() {
        assert_eq!(format_canonical(123456789.012345), "1.234567890123450e+08");
    }
}
