//! Ed25519 keys.

use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier as _, VerifyingKey};
use rand::rngs::OsRng;

use super::scheme::{SignatureScheme, ED25519_PUBLIC_KEY_SIZE};
use super::traits::{PublicKey, Signer};
use super::SuiPublicKey;
use crate::error::WasmSuiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey([u8; ED25519_PUBLIC_KEY_SIZE]);

impl Ed25519PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WasmSuiError> {
        let array: [u8; ED25519_PUBLIC_KEY_SIZE] = bytes.try_into().map_err(|_| {
            WasmSuiError::signature(format!(
                "Ed25519 public key must be {} bytes, got {}",
                ED25519_PUBLIC_KEY_SIZE,
                bytes.len()
            ))
        })?;
        VerifyingKey::from_bytes(&array)
            .map_err(|e| WasmSuiError::signature(format!("invalid Ed25519 public key: {}", e)))?;
        Ok(Ed25519PublicKey(array))
    }

    pub fn as_bytes(&self) -> &[u8; ED25519_PUBLIC_KEY_SIZE] {
        &self.0
    }
}

impl PublicKey for Ed25519PublicKey {
    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::Ed25519
    }

    fn to_raw_bytes(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    fn verify_raw(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(key) = VerifyingKey::from_bytes(&self.0) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };
        key.verify(message, &signature).is_ok()
    }
}

/// Ed25519 signing key.
#[derive(Debug, Clone)]
pub struct Ed25519Keypair {
    signing_key: SigningKey,
}

impl Ed25519Keypair {
    pub fn generate() -> Self {
        Ed25519Keypair {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Create a keypair from a 32-byte seed.
    pub fn from_secret_key(secret_key: &[u8]) -> Result<Self, WasmSuiError> {
        let seed: [u8; 32] = secret_key.try_into().map_err(|_| {
            WasmSuiError::invalid_input(format!(
                "secret key must be 32 bytes, got {}",
                secret_key.len()
            ))
        })?;
        Ok(Ed25519Keypair {
            signing_key: SigningKey::from_bytes(&seed),
        })
    }

    pub fn secret_key_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    pub fn ed25519_public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }
}

impl Signer for Ed25519Keypair {
    fn key_scheme(&self) -> SignatureScheme {
        SignatureScheme::Ed25519
    }

    fn public_key(&self) -> SuiPublicKey {
        SuiPublicKey::Ed25519(self.ed25519_public_key())
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, WasmSuiError> {
        Ok(self.signing_key.sign(message).to_bytes().to_vec())
    }
}
