//! Secp256r1 (NIST P-256) ECDSA keys: SHA-256 prehash, compressed keys, low-S
//! signatures. P-256 signers do not normalize S themselves.

use p256::ecdsa::signature::{Signer as _, Verifier as _};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;

use super::scheme::{SignatureScheme, SECP256_PUBLIC_KEY_SIZE};
use super::traits::{PublicKey, Signer};
use super::SuiPublicKey;
use crate::error::WasmSuiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Secp256r1PublicKey([u8; SECP256_PUBLIC_KEY_SIZE]);

impl Secp256r1PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WasmSuiError> {
        let array: [u8; SECP256_PUBLIC_KEY_SIZE] = bytes.try_into().map_err(|_| {
            WasmSuiError::signature(format!(
                "Secp256r1 public key must be {} bytes, got {}",
                SECP256_PUBLIC_KEY_SIZE,
                bytes.len()
            ))
        })?;
        VerifyingKey::from_sec1_bytes(&array)
            .map_err(|e| WasmSuiError::signature(format!("invalid Secp256r1 public key: {}", e)))?;
        Ok(Secp256r1PublicKey(array))
    }

    pub fn as_bytes(&self) -> &[u8; SECP256_PUBLIC_KEY_SIZE] {
        &self.0
    }

    fn from_verifying_key(key: &VerifyingKey) -> Self {
        let mut bytes = [0u8; SECP256_PUBLIC_KEY_SIZE];
        bytes.copy_from_slice(key.to_encoded_point(true).as_bytes());
        Secp256r1PublicKey(bytes)
    }
}

impl PublicKey for Secp256r1PublicKey {
    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::Secp256r1
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
        // only the low-S form is accepted
        if signature.normalize_s().is_some() {
            return false;
        }
        key.verify(message, &signature).is_ok()
    }
}

/// Secp256r1 signing key.
#[derive(Debug, Clone)]
pub struct Secp256r1Keypair {
    signing_key: SigningKey,
}

impl Secp256r1Keypair {
    pub fn generate() -> Self {
        Secp256r1Keypair {
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
        Ok(Secp256r1Keypair { signing_key })
    }

    pub fn secret_key_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.signing_key.to_bytes());
        out
    }

    pub fn secp256r1_public_key(&self) -> Secp256r1PublicKey {
        Secp256r1PublicKey::from_verifying_key(self.signing_key.verifying_key())
    }
}

impl Signer for Secp256r1Keypair {
    fn key_scheme(&self) -> SignatureScheme {
        SignatureScheme::Secp256r1
    }

    fn public_key(&self) -> SuiPublicKey {
        SuiPublicKey::Secp256r1(self.secp256r1_public_key())
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_vector() {
        let keypair = Secp256r1Keypair::from_secret_key(&[1u8; 32]).unwrap();
        assert_eq!(
            hex::encode(keypair.secp256r1_public_key().as_bytes()),
            "026ff03b949241ce1dadd43519e6960e0a85b41a69a05c328103aa2bce1594ca16"
        );
        assert_eq!(
            keypair.to_sui_address().to_string(),
            "0x575dc0072a3309367790cb4415ddc87df5ffa4360ccd2c29f7ec0515026cc0e1"
        );
    }

    #[test]
    fn test_signatures_are_normalized_and_verify() {
        let keypair = Secp256r1Keypair::generate();
        let public_key = keypair.secp256r1_public_key();
        for i in 0..8u8 {
            let message = [i; 40];
            let raw = keypair.sign(&message).unwrap();
            assert_eq!(raw.len(), 64);
            let signature = Signature::from_slice(&raw).unwrap();
            assert!(signature.normalize_s().is_none());
            assert!(public_key.verify_raw(&message, &raw));
        }
    }

    #[test]
    fn test_transaction_roundtrip() {
        let keypair = Secp256r1Keypair::from_secret_key(&[7u8; 32]).unwrap();
        let signed = keypair.sign_transaction(b"tx-bytes").unwrap();
        assert!(keypair
            .secp256r1_public_key()
            .verify_transaction(b"tx-bytes", &signed.signature)
            .unwrap());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(Secp256r1Keypair::from_secret_key(&[0u8; 32]).is_err());
        assert!(Secp256r1PublicKey::from_bytes(&[2u8; 32]).is_err());
    }

    #[test]
    fn test_high_s_rejected() {
        let keypair = Secp256r1Keypair::from_secret_key(&[3u8; 32]).unwrap();
        let message = b"malleable";
        let raw = keypair.sign(message).unwrap();
        let low = Signature::from_slice(&raw).unwrap();
        let (r, s) = low.split_scalars();
        let high = Signature::from_scalars(r, -s).unwrap();
        assert!(!keypair
            .secp256r1_public_key()
            .verify_raw(message, &high.to_bytes()));
    }
}
