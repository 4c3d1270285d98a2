//! Base58 32-byte digests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::bcs::{BcsDecode, BcsEncode, BcsReader, BcsWriter};
use crate::error::{EncodingError, WasmSuiError};

pub const DIGEST_LENGTH: usize = 32;

fn parse_base58(text: &str) -> Result<[u8; DIGEST_LENGTH], WasmSuiError> {
    let bytes = bs58::decode(text)
        .into_vec()
        .map_err(|e| WasmSuiError::invalid_input(format!("invalid digest {}: {}", text, e)))?;
    bytes.as_slice().try_into().map_err(|_| {
        WasmSuiError::invalid_input(format!(
            "digest must be {} bytes, got {}",
            DIGEST_LENGTH,
            bytes.len()
        ))
    })
}

macro_rules! digest_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name([u8; DIGEST_LENGTH]);

        impl $name {
            pub const fn new(bytes: [u8; DIGEST_LENGTH]) -> Self {
                $name(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; DIGEST_LENGTH] {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = WasmSuiError;

            fn from_str(text: &str) -> Result<Self, Self::Err> {
                parse_base58(text).map($name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", bs58::encode(self.0).into_string())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                $name::from_str(&text).map_err(serde::de::Error::custom)
            }
        }

        // Length-prefixed on the wire even though the length is fixed
        impl BcsEncode for $name {
            fn encode(&self, w: &mut BcsWriter) -> Result<(), EncodingError> {
                w.write_bytes(&self.0);
                Ok(())
            }
        }

        impl BcsDecode for $name {
            fn decode(r: &mut BcsReader<'_>) -> Result<Self, EncodingError> {
                let len = r.read_len()?;
                if len != DIGEST_LENGTH {
                    return Err(EncodingError::Unserializable(format!(
                        "{} of length {}",
                        stringify!($name),
                        len
                    )));
                }
                Ok($name(r.read_array()?))
            }
        }
    };
}

digest_type!(
    /// Version digest of an object.
    ObjectDigest
);

digest_type!(
    /// Digest identifying a transaction.
    TransactionDigest
);
