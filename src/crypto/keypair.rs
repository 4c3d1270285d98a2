//! Scheme-erased keypair.

use super::ed25519::Ed25519Keypair;
use super::scheme::SignatureScheme;
use super::secp256k1::Secp256k1Keypair;
use super::secp256r1::Secp256r1Keypair;
use super::traits::Signer;
use super::SuiPublicKey;
use crate::error::WasmSuiError;

#[derive(Debug, Clone)]
pub enum SuiKeypair {
    Ed25519(Ed25519Keypair),
    Secp256k1(Secp256k1Keypair),
    Secp256r1(Secp256r1Keypair),
}

impl SuiKeypair {
    pub fn generate(scheme: SignatureScheme) -> Result<Self, WasmSuiError> {
        match scheme {
            SignatureScheme::Ed25519 => Ok(SuiKeypair::Ed25519(Ed25519Keypair::generate())),
            SignatureScheme::Secp256k1 => Ok(SuiKeypair::Secp256k1(Secp256k1Keypair::generate())),
            SignatureScheme::Secp256r1 => Ok(SuiKeypair::Secp256r1(Secp256r1Keypair::generate())),
            other => Err(WasmSuiError::signature(format!(
                "cannot generate a {} keypair",
                other
            ))),
        }
    }

    pub fn from_secret_key(
        scheme: SignatureScheme,
        secret_key: &[u8],
    ) -> Result<Self, WasmSuiError> {
        match scheme {
            SignatureScheme::Ed25519 => {
                Ed25519Keypair::from_secret_key(secret_key).map(SuiKeypair::Ed25519)
            }
            SignatureScheme::Secp256k1 => {
                Secp256k1Keypair::from_secret_key(secret_key).map(SuiKeypair::Secp256k1)
            }
            SignatureScheme::Secp256r1 => {
                Secp256r1Keypair::from_secret_key(secret_key).map(SuiKeypair::Secp256r1)
            }
            other => Err(WasmSuiError::signature(format!(
                "no secret key format for {}",
                other
            ))),
        }
    }

    pub fn secret_key_bytes(&self) -> [u8; 32] {
        match self {
            SuiKeypair::Ed25519(k) => k.secret_key_bytes(),
            SuiKeypair::Secp256k1(k) => k.secret_key_bytes(),
            SuiKeypair::Secp256r1(k) => k.secret_key_bytes(),
        }
    }

    fn inner(&self) -> &dyn Signer {
        match self {
            SuiKeypair::Ed25519(k) => k,
            SuiKeypair::Secp256k1(k) => k,
            SuiKeypair::Secp256r1(k) => k,
        }
    }
}

impl Signer for SuiKeypair {
    fn key_scheme(&self) -> SignatureScheme {
        self.inner().key_scheme()
    }

    fn public_key(&self) -> SuiPublicKey {
        self.inner().public_key()
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, WasmSuiError> {
        self.inner().sign(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PublicKey;

    #[test]
    fn test_every_scheme_signs_and_verifies() {
        for scheme in [
            SignatureScheme::Ed25519,
            SignatureScheme::Secp256k1,
            SignatureScheme::Secp256r1,
        ] {
            let keypair = SuiKeypair::generate(scheme).unwrap();
            assert_eq!(keypair.key_scheme(), scheme);
            let signed = keypair.sign_transaction(b"payload").unwrap();
            assert!(keypair
                .public_key()
                .verify_transaction(b"payload", &signed.signature)
                .unwrap());

            let restored =
                SuiKeypair::from_secret_key(scheme, &keypair.secret_key_bytes()).unwrap();
            assert_eq!(restored.public_key(), keypair.public_key());
        }
    }

    #[test]
    fn test_multisig_is_not_a_keypair() {
        assert!(SuiKeypair::generate(SignatureScheme::MultiSig).is_err());
    }
}
