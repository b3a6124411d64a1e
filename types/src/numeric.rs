//! Lenient decoding of ledger integers.
//!
//! Contract clients hand back 256-bit integers in several shapes: plain JSON
//! numbers, decimal strings, `0x` hex strings, or big-number objects such as
//! `{"type":"BigNumber","hex":"0x64"}`. Everything here narrows them to `u64`.

use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInteger {
    Number(u64),
    Text(String),
    BigNumber { hex: String },
}

/// Parse a decimal or `0x`-prefixed hex string into a `u64`.
pub fn parse_u64(raw: &str) -> Result<u64, String> {
    let trimmed = raw.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse::<u64>(),
    };
    parsed.map_err(|e| format!("invalid integer {raw:?}: {e}"))
}

/// `deserialize_with` target for any ledger integer field.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match RawInteger::deserialize(deserializer)? {
        RawInteger::Number(n) => Ok(n),
        RawInteger::Text(s) | RawInteger::BigNumber { hex: s } => {
            parse_u64(&s).map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_and_hex() {
        assert_eq!(parse_u64("42"), Ok(42));
        assert_eq!(parse_u64(" 0x2a "), Ok(42));
        assert_eq!(parse_u64("0X2A"), Ok(42));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_u64("").is_err());
        assert!(parse_u64("0xZZ").is_err());
        assert!(parse_u64("-1").is_err());
    }
}
