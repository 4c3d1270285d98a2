//! WASM bindings for Sui keypairs.

use wasm_bindgen::prelude::*;

use super::to_js;
use crate::crypto::{IntentScope, PublicKey, SignatureScheme, Signer, SuiKeypair};
use crate::error::WasmSuiError;

/// Keypair of any single-key scheme.
#[wasm_bindgen]
#[derive(Debug)]
pub struct WasmKeypair {
    inner: SuiKeypair,
}

#[wasm_bindgen]
impl WasmKeypair {
    /// Generate a random keypair.
    ///
    /// @param scheme - "ED25519", "Secp256k1" or "Secp256r1"
    #[wasm_bindgen]
    pub fn generate(scheme: &str) -> Result<WasmKeypair, WasmSuiError> {
        let scheme: SignatureScheme = scheme.parse()?;
        SuiKeypair::generate(scheme).map(|inner| WasmKeypair { inner })
    }

    /// Create a keypair from a 32-byte secret key.
    #[wasm_bindgen]
    pub fn from_secret_key(scheme: &str, secret_key: &[u8]) -> Result<WasmKeypair, WasmSuiError> {
        let scheme: SignatureScheme = scheme.parse()?;
        SuiKeypair::from_secret_key(scheme, secret_key).map(|inner| WasmKeypair { inner })
    }

    #[wasm_bindgen(getter)]
    pub fn scheme(&self) -> String {
        self.inner.key_scheme().to_string()
    }

    /// Raw public key, without the scheme flag.
    #[wasm_bindgen(getter)]
    pub fn public_key(&self) -> Vec<u8> {
        self.inner.public_key().to_raw_bytes()
    }

    /// Base64 of `flag ‖ public key`.
    #[wasm_bindgen]
    pub fn public_key_base64(&self) -> String {
        self.inner.public_key().to_sui_base64()
    }

    #[wasm_bindgen(getter)]
    pub fn secret_key(&self) -> Vec<u8> {
        self.inner.secret_key_bytes().to_vec()
    }

    /// The 0x-prefixed Sui address.
    #[wasm_bindgen]
    pub fn address(&self) -> String {
        self.inner.to_sui_address().to_string()
    }

    /// Raw signature over exactly `message`.
    #[wasm_bindgen]
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, WasmSuiError> {
        self.inner.sign(message)
    }

    /// Sign transaction bytes.
    ///
    /// @returns `{ signature, bytes }`, both base64
    #[wasm_bindgen]
    pub fn sign_transaction(&self, bytes: &[u8]) -> Result<JsValue, WasmSuiError> {
        to_js(&self.inner.sign_transaction(bytes)?)
    }

    /// Sign a personal message.
    ///
    /// @returns `{ signature, bytes }`, both base64
    #[wasm_bindgen]
    pub fn sign_personal_message(&self, message: &[u8]) -> Result<JsValue, WasmSuiError> {
        to_js(&self.inner.sign_personal_message(message)?)
    }

    /// Serialized signature under an explicit intent scope.
    #[wasm_bindgen]
    pub fn sign_with_intent(&self, bytes: &[u8], scope: u8) -> Result<String, WasmSuiError> {
        let scope = IntentScope::from_u8(scope)?;
        Ok(self.inner.sign_with_intent(bytes, scope)?.signature)
    }
}

impl WasmKeypair {
    pub fn inner(&self) -> &SuiKeypair {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::verify_serialized_signature;

    #[test]
    fn test_from_secret_key_matches_core() {
        let secret = [7u8; 32];
        let keypair = WasmKeypair::from_secret_key("ED25519", &secret).unwrap();
        let core = SuiKeypair::from_secret_key(SignatureScheme::Ed25519, &secret).unwrap();
        assert_eq!(keypair.address(), core.to_sui_address().to_string());
        assert_eq!(keypair.secret_key(), secret.to_vec());
        assert_eq!(keypair.scheme(), "ED25519");
    }

    #[test]
    fn test_sign_with_intent_verifies() {
        let keypair = WasmKeypair::generate("Secp256r1").unwrap();
        let signature = keypair.sign_with_intent(b"payload", 3).unwrap();
        let signer =
            verify_serialized_signature(b"payload", &signature, IntentScope::PersonalMessage)
                .unwrap();
        assert_eq!(signer.to_string(), keypair.address());
    }

    #[test]
    fn test_unknown_scheme() {
        assert!(WasmKeypair::generate("Schnorr").is_err());
        assert!(WasmKeypair::generate("MultiSig").is_err());
    }
}
