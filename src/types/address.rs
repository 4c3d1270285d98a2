//! 32-byte account and object addresses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::bcs::{BcsDecode, BcsEncode, BcsReader, BcsWriter};
use crate::error::{EncodingError, WasmSuiError};

pub const ADDRESS_LENGTH: usize = 32;

/// An account or object address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SuiAddress([u8; ADDRESS_LENGTH]);

/// Objects share the address space with accounts.
pub type ObjectId = SuiAddress;

impl SuiAddress {
    pub const ZERO: SuiAddress = SuiAddress([0u8; ADDRESS_LENGTH]);

    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        SuiAddress(bytes)
    }

    /// Address whose last byte is `value` (`0x1`, `0x2`, `0x6`, ...).
    pub const fn from_short(value: u8) -> Self {
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes[ADDRESS_LENGTH - 1] = value;
        SuiAddress(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WasmSuiError> {
        let array: [u8; ADDRESS_LENGTH] = bytes.try_into().map_err(|_| {
            WasmSuiError::invalid_input(format!(
                "address must be {} bytes, got {}",
                ADDRESS_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(SuiAddress(array))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

/// Normalize `0x`-prefixed (or bare) hex into a full 64-character address.
pub fn normalize_sui_address(text: &str) -> Result<String, WasmSuiError> {
    Ok(SuiAddress::from_str(text)?.to_string())
}

impl FromStr for SuiAddress {
    type Err = WasmSuiError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);
        if digits.is_empty() || digits.len() > ADDRESS_LENGTH * 2 {
            return Err(WasmSuiError::invalid_input(format!(
                "invalid address: {}",
                text
            )));
        }
        let padded = format!("{:0>64}", digits);
        let bytes = hex::decode(&padded)
            .map_err(|e| WasmSuiError::invalid_input(format!("invalid address {}: {}", text, e)))?;
        SuiAddress::from_bytes(&bytes)
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SuiAddress({})", self)
    }
}

impl Serialize for SuiAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SuiAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        SuiAddress::from_str(&text).map_err(serde::de::Error::custom)
    }
}

impl BcsEncode for SuiAddress {
    fn encode(&self, w: &mut BcsWriter) -> Result<(), EncodingError> {
        w.write_fixed(&self.0);
        Ok(())
    }
}

impl BcsDecode for SuiAddress {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, EncodingError> {
        Ok(SuiAddress(r.read_array()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0x2", "0x0000000000000000000000000000000000000000000000000000000000000002")]
    #[case("2", "0x0000000000000000000000000000000000000000000000000000000000000002")]
    #[case(
        "0xABCDEF0000000000000000000000000000000000000000000000000000000001",
        "0xabcdef0000000000000000000000000000000000000000000000000000000001"
    )]
    fn test_normalize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_sui_address(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("0x")]
    #[case("0xzz")]
    #[case("0x00000000000000000000000000000000000000000000000000000000000000001")]
    fn test_invalid(#[case] input: &str) {
        assert!(SuiAddress::from_str(input).is_err());
    }

    #[test]
    fn test_from_short() {
        assert_eq!(SuiAddress::from_short(2), "0x2".parse().unwrap());
    }

    #[test]
    fn test_serde_string() {
        let address: SuiAddress = serde_json::from_str("\"0x6\"").unwrap();
        assert_eq!(address, SuiAddress::from_short(6));
        assert_eq!(
            serde_json::to_string(&address).unwrap(),
            format!("\"{}\"", address)
        );
    }
}
