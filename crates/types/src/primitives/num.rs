use crate::PrimitiveError;
use alloy::primitives::{
    ruint::{BaseConvertError, ParseError},
    U256,
};

/// Parse a U256 from a decimal string or a `0x`-prefixed hex string.
///
/// Values above `2^256 - 1` fail with [`PrimitiveError::Overflow`] rather
/// than wrapping or truncating.
pub fn parse_u256(s: &str) -> Result<U256, PrimitiveError> {
    let trimmed = s.trim();
    let (digits, radix) = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (trimmed, 10),
    };
    // ruint skips `_` separators and reads an empty string as zero
    if digits.is_empty() || digits.contains('_') {
        return Err(PrimitiveError::InvalidNumber(s.to_owned()));
    }

    U256::from_str_radix(digits, radix).map_err(|e| match e {
        ParseError::BaseConvertError(BaseConvertError::Overflow) => {
            PrimitiveError::Overflow(s.to_owned())
        }
        _ => PrimitiveError::InvalidNumber(s.to_owned()),
    })
}

/// Render a U256 as 64 lowercase hex characters, without prefix.
pub fn u256_to_padded_hex(value: U256) -> String {
    hex::encode(value.to_be_bytes::<32>())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_POW_256: &str =
        "115792089237316195423570985008687907853269984665640564039457584007913129639936";

    #[test]
    fn parses_decimal_and_hex() {
        assert_eq!(parse_u256("1000000").unwrap(), U256::from(1_000_000u64));
        assert_eq!(parse_u256("0x6594cdd3").unwrap(), U256::from(1704250835u64));
        assert_eq!(parse_u256("0X0f").unwrap(), U256::from(15u64));
        assert_eq!(parse_u256(" 42 ").unwrap(), U256::from(42u64));
    }

    #[test]
    fn max_value_fits() {
        let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        assert_eq!(parse_u256(max).unwrap(), U256::MAX);
        assert_eq!(parse_u256(&format!("0x{}", "f".repeat(64))).unwrap(), U256::MAX);
    }

    #[test]
    fn overflow_detected() {
        let err = parse_u256(TWO_POW_256).unwrap_err();
        assert_eq!(err, PrimitiveError::Overflow(TWO_POW_256.to_owned()));
        assert_eq!(err.code(), "overflow");
        assert!(matches!(
            parse_u256(&format!("0x1{}", "0".repeat(64))),
            Err(PrimitiveError::Overflow(_))
        ));
    }

    #[test]
    fn rejects_garbage() {
        for input in ["", "0x", "-1", "1.5", "1e18", "0xzz", "1_000"] {
            assert!(
                matches!(parse_u256(input), Err(PrimitiveError::InvalidNumber(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn padded_hex() {
        assert_eq!(u256_to_padded_hex(U256::from(0x1bu8)), format!("{}1b", "0".repeat(62)));
        assert_eq!(u256_to_padded_hex(U256::MAX), "f".repeat(64));
    }
}
