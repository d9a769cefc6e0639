//! Query normalization.
//!
//! The API rejects numbers written in scientific notation, which is what
//! floating point formatting produces for large amounts. Such values are
//! expanded to plain decimals before a request is sent.

use crate::ApiError;
use serde::Serialize;
use serde_json::Value;

/// Largest exponent magnitude accepted for expansion.
const MAX_EXPONENT: i64 = 512;

/// Split `s` into an optional sign, the integer digits, the fraction digits
/// and the exponent, if `s` has the form `[+-]?d+(.d+)?[eE][+-]?d+`.
fn split_scientific(s: &str) -> Option<(bool, &str, &str, &str)> {
    let (negative, unsigned) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    let (mantissa, exponent) = unsigned.split_once(['e', 'E'])?;
    let (int, frac) = match mantissa.split_once('.') {
        Some((int, frac)) if !frac.is_empty() => (int, frac),
        Some(_) => return None,
        None => (mantissa, ""),
    };
    let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);

    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    (all_digits(int) && (frac.is_empty() || all_digits(frac)) && all_digits(digits))
        .then_some((negative, int, frac, exponent))
}

/// True if `s` is a number in scientific notation, e.g. `1e+18` or `-3.5E10`.
pub fn is_scientific_notation(s: &str) -> bool {
    split_scientific(s).is_some()
}

/// Expand a number in scientific notation to an exact decimal string.
///
/// The result has no exponent, no leading zeros in the integer part and no
/// trailing zeros in the fraction: `2.3e-4` becomes `0.00023` and `1e+18`
/// becomes `1000000000000000000`.
pub fn expand_scientific_notation(s: &str) -> Result<String, ApiError> {
    let invalid = || ApiError::invalid("amount", format!("`{s}` is not in scientific notation"));
    let (negative, int, frac, exponent) = split_scientific(s).ok_or_else(invalid)?;
    let exponent: i64 = exponent.parse().map_err(|_| invalid())?;
    if exponent.abs() > MAX_EXPONENT {
        return Err(ApiError::invalid("amount", format!("exponent of `{s}` is out of range")));
    }

    let digits = format!("{int}{frac}");
    // Position of the decimal point within `digits` after shifting.
    let point = i64::try_from(int.len()).map_err(|_| invalid())? + exponent;
    let len = i64::try_from(digits.len()).map_err(|_| invalid())?;

    let (int_part, frac_part) = if point <= 0 {
        let zeros = usize::try_from(-point).map_err(|_| invalid())?;
        (String::from("0"), format!("{}{digits}", "0".repeat(zeros)))
    } else if point >= len {
        let zeros = usize::try_from(point - len).map_err(|_| invalid())?;
        (format!("{digits}{}", "0".repeat(zeros)), String::new())
    } else {
        let (i, f) = digits.split_at(point as usize);
        (i.to_owned(), f.to_owned())
    };

    let int_part = int_part.trim_start_matches('0');
    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(int_part.len() + frac_part.len() + 2);
    if negative && (int_part != "0" || !frac_part.is_empty()) {
        out.push('-');
    }
    out.push_str(int_part);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    Ok(out)
}

fn normalize_value(s: String) -> Result<String, ApiError> {
    if is_scientific_notation(&s) {
        expand_scientific_notation(&s)
    } else {
        Ok(s)
    }
}

/// Flatten a parameter struct into query pairs.
///
/// `null` fields are dropped, arrays are joined with commas, and numbers
/// in scientific notation are expanded.
pub fn query_pairs<T: Serialize>(params: &T) -> Result<Vec<(String, String)>, ApiError> {
    let Value::Object(map) = serde_json::to_value(params)? else {
        return Err(ApiError::invalid("query", "parameters must serialize to an object"));
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        let rendered = match value {
            Value::Null => continue,
            Value::Array(items) => items
                .into_iter()
                .map(scalar)
                .collect::<Result<Vec<_>, _>>()?
                .join(","),
            other => scalar(other)?,
        };
        pairs.push((key, rendered));
    }
    Ok(pairs)
}

fn scalar(value: Value) -> Result<String, ApiError> {
    match value {
        Value::String(s) => normalize_value(s),
        Value::Number(n) => normalize_value(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(ApiError::invalid("query", "nested values cannot be sent as a query")),
    }
}
