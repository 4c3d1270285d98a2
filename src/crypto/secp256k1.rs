//! Secp256k1 ECDSA keys: SHA-256 prehash, compressed keys, low-S signatures.

use k256::ecdsa::signature::{Signer as _, Verifier as _};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;

use super::scheme::{SignatureScheme, SECP256_PUBLIC_KEY_SIZE};
use super::traits::{PublicKey, Signer};
use super::SuiPublicKey;
use crate::error::WasmSuiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Secp256k1PublicKey([u8; SECP256_PUBLIC_KEY_SIZE]);

impl Secp256k1PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WasmSuiError> {
        let array: [u8; SECP256_PUBLIC_KEY_SIZE] = bytes.try_into().map_err(|_| {
            WasmSuiError::signature(format!(
                "Secp256k1 public key must be {} bytes, got {}",
                SECP256_PUBLIC_KEY_SIZE,
                bytes.len()
            ))
        })?;
        VerifyingKey::from_sec1_bytes(&array)
            .map_err(|e| WasmSuiError::signature(format!("invalid Secp256k1 public key: {}", e)))?;
        Ok(Secp256k1PublicKey(array))
    }

    pub fn as_bytes(&self) -> &[u8; SECP256_PUBLIC_KEY_SIZE] {
        &self.0
    }

    fn from_verifying_key(key: &VerifyingKey) -> Self {
        let mut bytes = [0u8; SECP256_PUBLIC_KEY_SIZE];
        bytes.copy_from_slice(key.to_encoded_point(true).as_bytes());
        Secp256k1PublicKey(bytes)
    }
}

impl PublicKey for Secp256k1PublicKey {
    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::Secp256k1
    }

    fn to_raw_bytes(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    fn verify_raw(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(key) = VerifyingKey::from_sec1_bytes(&self.0) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };
        // high-S signatures are malleable copies
        if signature.normalize_s().is_some() {
            return false;
        }
        key.verify(message, &signature).is_ok()
    }
}

/// Secp256k1 signing key.
#[derive(Debug, Clone)]
pub struct Secp256k1Keypair {
    signing_key: SigningKey,
}

impl Secp256k1Keypair {
    pub fn generate() -> Self {
        Secp256k1Keypair {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    pub fn from_secret_key(secret_key: &[u8]) -> Result<Self, WasmSuiError> {
        if secret_key.len() != 32 {
            return Err(WasmSuiError::invalid_input(format!(
                "secret key must be 32 bytes, got {}",
                secret_key.len()
            )));
        }
        let signing_key = SigningKey::from_slice(secret_key)
            .map_err(|e| WasmSuiError::invalid_input(format!("invalid secret key: {}", e)))?;
        Ok(Secp256k1Keypair { signing_key })
    }

    pub fn secret_key_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.signing_key.to_bytes());
        out
    }

    pub fn secp256k1_public_key(&self) -> Secp256k1PublicKey {
        Secp256k1PublicKey::from_verifying_key(self.signing_key.verifying_key())
    }
}

impl Signer for Secp256k1Keypair {
    fn key_scheme(&self) -> SignatureScheme {
        SignatureScheme::Secp256k1
    }

    fn public_key(&self) -> SuiPublicKey {
        SuiPublicKey::Secp256k1(self.secp256k1_public_key())
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, WasmSuiError> {
        let signature: Signature = self
            .signing_key
            .try_sign(message)
            .map_err(|e| WasmSuiError::signature(format!("signing failed: {}", e)))?;
        let signature = signature.normalize_s().unwrap_or(signature);
        Ok(signature.to_bytes().to_vec())
    }
}
