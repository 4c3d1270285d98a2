//! WASM bindings for multisig committees.

use wasm_bindgen::prelude::*;

use crate::crypto::{verify_serialized_signature, IntentScope, PublicKey, SuiPublicKey};
use crate::error::WasmSuiError;
use crate::multisig::MultiSigPublicKey;

fn committee(
    public_keys: &[String],
    weights: &[u8],
    threshold: u16,
) -> Result<MultiSigPublicKey, WasmSuiError> {
    if public_keys.len() != weights.len() {
        return Err(WasmSuiError::MultiSigConfig(format!(
            "{} public keys but {} weights",
            public_keys.len(),
            weights.len()
        )));
    }
    let members = public_keys
        .iter()
        .zip(weights)
        .map(|(key, weight)| SuiPublicKey::from_sui_base64(key).map(|key| (key, *weight)))
        .collect::<Result<Vec<_>, _>>()?;
    MultiSigPublicKey::from_members(threshold, members)
}

/// Namespace for multisig operations.
///
/// Members are given as parallel arrays of base64 `flag ‖ public key`
/// strings and weights.
#[wasm_bindgen]
pub struct MultiSigNamespace;

#[wasm_bindgen]
impl MultiSigNamespace {
    /// Address of the committee.
    #[wasm_bindgen]
    pub fn address(
        public_keys: Vec<String>,
        weights: Vec<u8>,
        threshold: u16,
    ) -> Result<String, WasmSuiError> {
        Ok(committee(&public_keys, &weights, threshold)?
            .to_sui_address()
            .to_string())
    }

    /// Combine member signatures into one serialized multisig signature.
    #[wasm_bindgen]
    pub fn combine(
        public_keys: Vec<String>,
        weights: Vec<u8>,
        threshold: u16,
        signatures: Vec<String>,
    ) -> Result<String, WasmSuiError> {
        committee(&public_keys, &weights, threshold)?.combine_partial_signatures(&signatures)
    }

    /// Verify a serialized signature over transaction bytes and return the
    /// signer's address.
    #[wasm_bindgen]
    pub fn verify_transaction(bytes: &[u8], signature: &str) -> Result<String, WasmSuiError> {
        verify_serialized_signature(bytes, signature, IntentScope::TransactionData)
            .map(|address| address.to_string())
    }

    /// Verify a serialized signature over a personal message and return the
    /// signer's address.
    #[wasm_bindgen]
    pub fn verify_personal_message(
        message: &[u8],
        signature: &str,
    ) -> Result<String, WasmSuiError> {
        verify_serialized_signature(message, signature, IntentScope::PersonalMessage)
            .map(|address| address.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Ed25519Keypair, Signer};

    #[test]
    fn test_combine_and_verify() {
        let a = Ed25519Keypair::from_secret_key(&[1; 32]).unwrap();
        let b = Ed25519Keypair::from_secret_key(&[2; 32]).unwrap();
        let keys = vec![a.public_key().to_sui_base64(), b.public_key().to_sui_base64()];
        let weights = vec![1, 1];

        let address = MultiSigNamespace::address(keys.clone(), weights.clone(), 2).unwrap();
        let signatures = vec![
            b.sign_transaction(b"tx").unwrap().signature,
            a.sign_transaction(b"tx").unwrap().signature,
        ];
        let combined = MultiSigNamespace::combine(keys, weights, 2, signatures).unwrap();
        assert_eq!(
            MultiSigNamespace::verify_transaction(b"tx", &combined).unwrap(),
            address
        );
        assert!(MultiSigNamespace::verify_personal_message(b"tx", &combined).is_err());
    }

    #[test]
    fn test_mismatched_weights() {
        let key = Ed25519Keypair::from_secret_key(&[1; 32]).unwrap();
        let err = MultiSigNamespace::address(vec![key.public_key().to_sui_base64()], vec![], 1)
            .unwrap_err();
        assert!(matches!(err, WasmSuiError::MultiSigConfig(_)));
    }
}
