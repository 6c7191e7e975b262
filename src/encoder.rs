//! Fixed-point encoding of decimal price strings
//!
//! Converts a decimal display string plus a signed exponent into an exact
//! scaled integer: `display × 10^|exponent|`. The value represents on-chain
//! price state, so scaling is pure string/digit manipulation over an
//! arbitrary-precision integer. Floats lose precision above 2^53 and are
//! never used here.

use num_bigint::BigInt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Scale a decimal display string by `10^|exponent|` into an exact integer.
///
/// Grammar: optional `+`/`-` sign, digits, optional single `.`, digits, with
/// at least one digit overall (`.5` and `5.` are both accepted). Fails with
/// [`ValidationError::PrecisionExceeded`] when the fractional part carries
/// more digits than `|exponent|`, and [`ValidationError::BadFormat`] for
/// anything outside the grammar.
///
/// Deterministic and side-effect free.
pub fn scale_decimal(display: &str, exponent: i32) -> Result<BigInt, ValidationError> {
    let bad_format = || ValidationError::BadFormat(display.to_string());

    let input = display.trim();
    if input.is_empty() {
        return Err(bad_format());
    }

    let (sign, body) = match input.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", input.strip_prefix('+').unwrap_or(input)),
    };

    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (body, ""),
    };

    // A second '.' or any non-digit character lands here
    if !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(bad_format());
    }
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(bad_format());
    }

    let scale = exponent.unsigned_abs() as usize;
    if frac_part.len() > scale {
        return Err(ValidationError::PrecisionExceeded {
            digits: frac_part.len(),
            scale,
        });
    }

    // Right-pad the fraction to the full scale, then read the concatenation
    // as one integer: "123.45" at scale 8 becomes "12345000000".
    let mut raw = String::with_capacity(sign.len() + int_part.len() + scale);
    raw.push_str(sign);
    raw.push_str(int_part);
    raw.push_str(frac_part);
    raw.extend(std::iter::repeat('0').take(scale - frac_part.len()));

    BigInt::from_str(&raw).map_err(|_| bad_format())
}
