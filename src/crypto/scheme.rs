//! Signature scheme flags.

use std::fmt;
use std::str::FromStr;

use crate::error::WasmSuiError;

pub const ED25519_PUBLIC_KEY_SIZE: usize = 32;
pub const SECP256_PUBLIC_KEY_SIZE: usize = 33;
pub const SIGNATURE_SIZE: usize = 64;

/// Scheme selected by the leading flag byte of a serialized signature,
/// public key or address preimage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureScheme {
    Ed25519,
    Secp256k1,
    Secp256r1,
    MultiSig,
    ZkLogin,
}

impl SignatureScheme {
    pub fn flag(self) -> u8 {
        match self {
            SignatureScheme::Ed25519 => 0x00,
            SignatureScheme::Secp256k1 => 0x01,
            SignatureScheme::Secp256r1 => 0x02,
            SignatureScheme::MultiSig => 0x03,
            SignatureScheme::ZkLogin => 0x05,
        }
    }

    pub fn from_flag(flag: u8) -> Result<Self, WasmSuiError> {
        match flag {
            0x00 => Ok(SignatureScheme::Ed25519),
            0x01 => Ok(SignatureScheme::Secp256k1),
            0x02 => Ok(SignatureScheme::Secp256r1),
            0x03 => Ok(SignatureScheme::MultiSig),
            0x05 => Ok(SignatureScheme::ZkLogin),
            other => Err(WasmSuiError::signature(format!(
                "unknown signature scheme flag 0x{:02x}",
                other
            ))),
        }
    }

    /// Raw public key length for fixed-size schemes.
    pub fn public_key_size(self) -> Option<usize> {
        match self {
            SignatureScheme::Ed25519 => Some(ED25519_PUBLIC_KEY_SIZE),
            SignatureScheme::Secp256k1 | SignatureScheme::Secp256r1 => {
                Some(SECP256_PUBLIC_KEY_SIZE)
            }
            SignatureScheme::MultiSig | SignatureScheme::ZkLogin => None,
        }
    }

    /// Raw signature length for fixed-size schemes.
    pub fn signature_size(self) -> Option<usize> {
        match self {
            SignatureScheme::Ed25519 | SignatureScheme::Secp256k1 | SignatureScheme::Secp256r1 => {
                Some(SIGNATURE_SIZE)
            }
            SignatureScheme::MultiSig | SignatureScheme::ZkLogin => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SignatureScheme::Ed25519 => "ED25519",
            SignatureScheme::Secp256k1 => "Secp256k1",
            SignatureScheme::Secp256r1 => "Secp256r1",
            SignatureScheme::MultiSig => "MultiSig",
            SignatureScheme::ZkLogin => "ZkLogin",
        }
    }
}

impl fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SignatureScheme {
    type Err = WasmSuiError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "ED25519" | "Ed25519" => Ok(SignatureScheme::Ed25519),
            "Secp256k1" => Ok(SignatureScheme::Secp256k1),
            "Secp256r1" => Ok(SignatureScheme::Secp256r1),
            "MultiSig" => Ok(SignatureScheme::MultiSig),
            "ZkLogin" => Ok(SignatureScheme::ZkLogin),
            other => Err(WasmSuiError::signature(format!(
                "unknown signature scheme {}",
                other
            ))),
        }
    }
}
