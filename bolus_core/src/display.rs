//! Dose formatting for display.
//!
//! Doses are rounded half away from zero on the exact binary value, so a
//! stored 0.25 shows as 0.3 while 0.35 (stored just below) shows as 0.3.

/// Fractional digits needed to print any f64 exactly
const EXACT_DIGITS: usize = 1100;

/// Format a value with a fixed number of decimals, breaking exact ties
/// away from zero.
pub fn to_fixed(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let exact = format!("{:.*}", EXACT_DIGITS, value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(decimals))
        .map(|b| b - b'0')
        .collect();
    let mut int_len = int_part.len();

    let round_up = frac_part
        .as_bytes()
        .get(decimals)
        .is_some_and(|&b| b >= b'5');

    if round_up {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, 1);
            int_len += 1;
        }
    }

    let mut out = String::with_capacity(digits.len() + 2);
    if value < 0.0 {
        out.push('-');
    }
    for (i, digit) in digits.iter().enumerate() {
        if i == int_len {
            out.push('.');
        }
        out.push(char::from(b'0' + digit));
    }
    out
}

/// A dose as shown to the user, e.g. `8.0 units`
pub fn format_units(value: f64, decimals: usize) -> String {
    format!("{} units", to_fixed(value, decimals))
}
