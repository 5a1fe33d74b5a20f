//! Lenient number parsing for query-string filters.
//!
//! Filter values arrive as free-form strings from listing pages. Only the
//! leading numeric prefix is significant, so `"3+"` means 3 bedrooms and
//! `"1500000 AED"` means a price of 1 500 000. A value without any numeric
//! prefix yields `None`.

/// Parse the leading integer prefix of `input`.
///
/// Leading whitespace and a single sign are accepted. Any fractional part
/// or trailing text is ignored. Returns `None` if no digit follows the
/// optional sign, or if the prefix does not fit in an `i64`.
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let bytes = trimmed.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }

    trimmed[..end].parse().ok()
}

/// Parse the leading decimal prefix of `input`.
///
/// Accepts an optional sign, digits with at most one decimal point, and an
/// optional exponent (`e`/`E`, optional sign, at least one digit). The
/// mantissa must contain at least one digit. Trailing text is ignored.
pub fn parse_leading_float(input: &str) -> Option<f64> {
    let trimmed = input.trim_start();
    let bytes = trimmed.as_bytes();

    let mut end = 0;
    let mut negative = false;
    if let Some(sign @ (b'+' | b'-')) = bytes.first() {
        negative = *sign == b'-';
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let int_digits = &trimmed[int_start..end];

    let mut frac_digits = "";
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        frac_digits = &trimmed[frac_start..frac_end];
        end = frac_end;
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mut exponent = "";
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            exponent = &trimmed[end..exp_end];
        }
    }

    let normalized = format!(
        "{}{}.{}{}",
        if negative { "-" } else { "" },
        if int_digits.is_empty() { "0" } else { int_digits },
        if frac_digits.is_empty() { "0" } else { frac_digits },
        exponent,
    );

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}
