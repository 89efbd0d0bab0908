//! Amount and address formatting
//!
//! Conversions between human decimal strings and fixed-point integer amounts.
//! Every function here degrades to a zero value on malformed input instead of
//! failing, so partially typed values never abort a caller.

use num_bigint::BigUint;
use num_traits::{Num, Zero};

/// Convert a decimal string (`"1.23"`) into smallest units at `decimals` precision.
///
/// The fraction is padded or truncated to exactly `decimals` digits.
/// Returns zero for anything that is not an unsigned decimal number.
pub fn to_smallest_unit(amount: &str, decimals: u32) -> BigUint {
    let amount = amount.trim();
    let (integer, fraction) = match amount.split_once('.') {
        Some((i, f)) => (i, f),
        None => (amount, ""),
    };

    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(integer) || !is_digits(fraction) {
        return BigUint::zero();
    }

    let decimals = decimals as usize;
    let mut digits = String::with_capacity(integer.len() + decimals);
    digits.push_str(integer);
    if fraction.len() >= decimals {
        digits.push_str(&fraction[..decimals]);
    } else {
        digits.push_str(fraction);
        digits.extend(std::iter::repeat('0').take(decimals - fraction.len()));
    }

    if digits.is_empty() {
        return BigUint::zero();
    }

    BigUint::from_str_radix(&digits, 10).unwrap_or_default()
}

/// Render a smallest-unit integer as a trimmed decimal string.
///
/// `1_230_000` at 6 decimals becomes `"1.23"`; whole values drop the point.
pub fn from_smallest_unit(amount: &BigUint, decimals: u32) -> String {
    let decimals = decimals as usize;
    let raw = amount.to_str_radix(10);
    if decimals == 0 {
        return raw;
    }

    let padded = if raw.len() < decimals + 1 {
        format!("{}{}", "0".repeat(decimals + 1 - raw.len()), raw)
    } else {
        raw
    };

    let (integer, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{}.{}", integer, fraction)
    }
}

/// Same as [`from_smallest_unit`] for a decimal string input; malformed input yields `"0"`.
pub fn from_smallest_unit_str(amount: &str, decimals: u32) -> String {
    match BigUint::from_str_radix(amount.trim(), 10) {
        Ok(value) => from_smallest_unit(&value, decimals),
        Err(_) => "0".to_string(),
    }
}

/// Shorten an address for display: first 4 + "..." + last 4 characters
pub fn format_address(address: &str) -> String {
    if address.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = address.chars().collect();
    let head: String = chars.iter().take(4).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Format a numeric string with 4 fractional digits; non-numeric input yields `"0"`
pub fn format_balance(value: &str) -> String {
    match value.trim().parse::<f64>() {
        Ok(num) if num.is_finite() => format!("{:.4}", num),
        _ => "0".to_string(),
    }
}
