//! Serialized signatures and flag-dispatched public keys.
//!
//! A simple serialized signature is `flag ‖ signature ‖ public key`; a
//! multisig one is `0x03 ‖ BCS(MultiSig)`. Both travel as base64.

use base64::{engine::general_purpose::STANDARD, Engine};

use super::ed25519::Ed25519PublicKey;
use super::intent::{signing_digest, IntentScope};
use super::scheme::SignatureScheme;
use super::secp256k1::Secp256k1PublicKey;
use super::secp256r1::Secp256r1PublicKey;
use super::traits::PublicKey;
use crate::error::WasmSuiError;
use crate::multisig::MultiSig;
use crate::types::SuiAddress;

/// A public key of any single-signer scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SuiPublicKey {
    Ed25519(Ed25519PublicKey),
    Secp256k1(Secp256k1PublicKey),
    Secp256r1(Secp256r1PublicKey),
    /// zkLogin public identifier; verification needs the external prover
    ZkLogin(Vec<u8>),
}

impl SuiPublicKey {
    pub fn from_raw_bytes(scheme: SignatureScheme, bytes: &[u8]) -> Result<Self, WasmSuiError> {
        match scheme {
            SignatureScheme::Ed25519 => Ed25519PublicKey::from_bytes(bytes).map(Self::Ed25519),
            SignatureScheme::Secp256k1 => {
                Secp256k1PublicKey::from_bytes(bytes).map(Self::Secp256k1)
            }
            SignatureScheme::Secp256r1 => {
                Secp256r1PublicKey::from_bytes(bytes).map(Self::Secp256r1)
            }
            SignatureScheme::ZkLogin => Ok(Self::ZkLogin(bytes.to_vec())),
            SignatureScheme::MultiSig => Err(WasmSuiError::signature(
                "a multisig public key is not a single-signer key",
            )),
        }
    }

    /// Parse `flag ‖ raw key`.
    pub fn from_sui_bytes(bytes: &[u8]) -> Result<Self, WasmSuiError> {
        let (flag, raw) = bytes
            .split_first()
            .ok_or_else(|| WasmSuiError::signature("empty public key"))?;
        SuiPublicKey::from_raw_bytes(SignatureScheme::from_flag(*flag)?, raw)
    }

    /// Parse base64 `flag ‖ raw key`.
    pub fn from_sui_base64(text: &str) -> Result<Self, WasmSuiError> {
        let bytes = STANDARD
            .decode(text)
            .map_err(|e| WasmSuiError::signature(format!("invalid base64 public key: {}", e)))?;
        SuiPublicKey::from_sui_bytes(&bytes)
    }

    pub fn to_sui_base64(&self) -> String {
        STANDARD.encode(self.to_sui_bytes())
    }
}

impl PublicKey for SuiPublicKey {
    fn scheme(&self) -> SignatureScheme {
        match self {
            SuiPublicKey::Ed25519(_) => SignatureScheme::Ed25519,
            SuiPublicKey::Secp256k1(_) => SignatureScheme::Secp256k1,
            SuiPublicKey::Secp256r1(_) => SignatureScheme::Secp256r1,
            SuiPublicKey::ZkLogin(_) => SignatureScheme::ZkLogin,
        }
    }

    fn to_raw_bytes(&self) -> Vec<u8> {
        match self {
            SuiPublicKey::Ed25519(key) => key.to_raw_bytes(),
            SuiPublicKey::Secp256k1(key) => key.to_raw_bytes(),
            SuiPublicKey::Secp256r1(key) => key.to_raw_bytes(),
            SuiPublicKey::ZkLogin(identifier) => identifier.clone(),
        }
    }

    fn verify_raw(&self, message: &[u8], signature: &[u8]) -> bool {
        match self {
            SuiPublicKey::Ed25519(key) => key.verify_raw(message, signature),
            SuiPublicKey::Secp256k1(key) => key.verify_raw(message, signature),
            SuiPublicKey::Secp256r1(key) => key.verify_raw(message, signature),
            SuiPublicKey::ZkLogin(_) => false,
        }
    }
}

/// A decoded serialized signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedSignature {
    Simple {
        scheme: SignatureScheme,
        signature: Vec<u8>,
        public_key: SuiPublicKey,
    },
    MultiSig(MultiSig),
    /// Opaque zkLogin payload (everything after the flag)
    ZkLogin { bytes: Vec<u8> },
}

impl ParsedSignature {
    pub fn scheme(&self) -> SignatureScheme {
        match self {
            ParsedSignature::Simple { scheme, .. } => *scheme,
            ParsedSignature::MultiSig(_) => SignatureScheme::MultiSig,
            ParsedSignature::ZkLogin { .. } => SignatureScheme::ZkLogin,
        }
    }
}

/// `base64(flag ‖ signature ‖ public key)`
pub fn to_serialized_signature(
    signature: &[u8],
    public_key: &SuiPublicKey,
) -> Result<String, WasmSuiError> {
    let scheme = public_key.scheme();
    let expected = scheme.signature_size().ok_or_else(|| {
        WasmSuiError::signature(format!("cannot serialize a {} signature", scheme))
    })?;
    if signature.len() != expected {
        return Err(WasmSuiError::signature(format!(
            "{} signature must be {} bytes, got {}",
            scheme,
            expected,
            signature.len()
        )));
    }
    let key = public_key.to_raw_bytes();
    let mut bytes = Vec::with_capacity(1 + signature.len() + key.len());
    bytes.push(scheme.flag());
    bytes.extend_from_slice(signature);
    bytes.extend_from_slice(&key);
    Ok(STANDARD.encode(bytes))
}

pub fn parse_serialized_signature(serialized: &str) -> Result<ParsedSignature, WasmSuiError> {
    let bytes = STANDARD
        .decode(serialized)
        .map_err(|e| WasmSuiError::signature(format!("invalid base64 signature: {}", e)))?;
    parse_signature_bytes(&bytes)
}

pub fn parse_signature_bytes(bytes: &[u8]) -> Result<ParsedSignature, WasmSuiError> {
    let (flag, rest) = bytes
        .split_first()
        .ok_or_else(|| WasmSuiError::signature("empty serialized signature"))?;
    let scheme = SignatureScheme::from_flag(*flag)?;

    match scheme {
        SignatureScheme::MultiSig => Ok(ParsedSignature::MultiSig(MultiSig::from_bcs_bytes(rest)?)),
        SignatureScheme::ZkLogin => Ok(ParsedSignature::ZkLogin {
            bytes: rest.to_vec(),
        }),
        _ => {
            // fixed sizes are defined for every simple scheme
            let signature_size = scheme.signature_size().unwrap_or_default();
            let key_size = scheme.public_key_size().unwrap_or_default();
            if rest.len() != signature_size + key_size {
                return Err(WasmSuiError::signature(format!(
                    "{} serialized signature must be {} bytes, got {}",
                    scheme,
                    1 + signature_size + key_size,
                    bytes.len()
                )));
            }
            let (signature, key) = rest.split_at(signature_size);
            Ok(ParsedSignature::Simple {
                scheme,
                signature: signature.to_vec(),
                public_key: SuiPublicKey::from_raw_bytes(scheme, key)?,
            })
        }
    }
}

/// Verify a serialized (simple or multisig) signature over intent-wrapped
/// `bytes` and return the signing address.
pub fn verify_serialized_signature(
    bytes: &[u8],
    serialized: &str,
    scope: IntentScope,
) -> Result<SuiAddress, WasmSuiError> {
    let digest = signing_digest(scope, bytes);
    match parse_serialized_signature(serialized)? {
        ParsedSignature::Simple {
            signature,
            public_key,
            ..
        } => {
            if !public_key.verify_raw(&digest, &signature) {
                return Err(WasmSuiError::signature("signature does not verify"));
            }
            Ok(public_key.to_sui_address())
        }
        ParsedSignature::MultiSig(multisig) => {
            let public_key = multisig.multisig_pk.clone();
            if !public_key.verify_parsed(&digest, &multisig)? {
                return Err(WasmSuiError::signature("multisig does not verify"));
            }
            Ok(public_key.to_sui_address())
        }
        ParsedSignature::ZkLogin { .. } => Err(WasmSuiError::signature(
            "zkLogin verification requires the external proof verifier",
        )),
    }
}
