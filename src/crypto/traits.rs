//! The `Signer` and `PublicKey` capabilities every scheme implements.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;

use super::hash::blake2b256;
use super::intent::{signing_digest, IntentScope};
use super::scheme::SignatureScheme;
use super::signature::{parse_serialized_signature, to_serialized_signature, ParsedSignature};
use super::SuiPublicKey;
use crate::error::WasmSuiError;
use crate::types::SuiAddress;

/// A serialized signature together with the signed bytes, both base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureWithBytes {
    pub signature: String,
    pub bytes: String,
}

pub trait PublicKey {
    fn scheme(&self) -> SignatureScheme;

    /// Key bytes without the scheme flag.
    fn to_raw_bytes(&self) -> Vec<u8>;

    /// Verify a raw signature over exactly `message`.
    fn verify_raw(&self, message: &[u8], signature: &[u8]) -> bool;

    fn flag(&self) -> u8 {
        self.scheme().flag()
    }

    /// `flag ‖ raw key`
    fn to_sui_bytes(&self) -> Vec<u8> {
        let raw = self.to_raw_bytes();
        let mut bytes = Vec::with_capacity(1 + raw.len());
        bytes.push(self.flag());
        bytes.extend_from_slice(&raw);
        bytes
    }

    fn to_sui_address(&self) -> SuiAddress {
        SuiAddress::new(blake2b256(&self.to_sui_bytes()))
    }

    /// Verify a serialized signature over `message`.
    ///
    /// A signature made by a different key or scheme is `Ok(false)`;
    /// malformed input is an error.
    fn verify(&self, message: &[u8], serialized_signature: &str) -> Result<bool, WasmSuiError> {
        match parse_serialized_signature(serialized_signature)? {
            ParsedSignature::Simple {
                scheme,
                signature,
                public_key,
            } => {
                if scheme != self.scheme() || public_key.to_raw_bytes() != self.to_raw_bytes() {
                    return Ok(false);
                }
                Ok(self.verify_raw(message, &signature))
            }
            ParsedSignature::MultiSig(_) | ParsedSignature::ZkLogin { .. } => Err(
                WasmSuiError::signature("expected a single-key serialized signature"),
            ),
        }
    }

    fn verify_with_intent(
        &self,
        bytes: &[u8],
        serialized_signature: &str,
        scope: IntentScope,
    ) -> Result<bool, WasmSuiError> {
        self.verify(&signing_digest(scope, bytes), serialized_signature)
    }

    fn verify_transaction(
        &self,
        transaction: &[u8],
        serialized_signature: &str,
    ) -> Result<bool, WasmSuiError> {
        self.verify_with_intent(transaction, serialized_signature, IntentScope::TransactionData)
    }

    fn verify_personal_message(
        &self,
        message: &[u8],
        serialized_signature: &str,
    ) -> Result<bool, WasmSuiError> {
        self.verify_with_intent(message, serialized_signature, IntentScope::PersonalMessage)
    }
}

pub trait Signer {
    fn key_scheme(&self) -> SignatureScheme;

    fn public_key(&self) -> SuiPublicKey;

    /// Raw signature over exactly `message`.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, WasmSuiError>;

    fn to_sui_address(&self) -> SuiAddress {
        self.public_key().to_sui_address()
    }

    fn sign_with_intent(
        &self,
        bytes: &[u8],
        scope: IntentScope,
    ) -> Result<SignatureWithBytes, WasmSuiError> {
        let signature = self.sign(&signing_digest(scope, bytes))?;
        Ok(SignatureWithBytes {
            signature: to_serialized_signature(&signature, &self.public_key())?,
            bytes: STANDARD.encode(bytes),
        })
    }

    fn sign_transaction(&self, transaction: &[u8]) -> Result<SignatureWithBytes, WasmSuiError> {
        self.sign_with_intent(transaction, IntentScope::TransactionData)
    }

    fn sign_personal_message(&self, message: &[u8]) -> Result<SignatureWithBytes, WasmSuiError> {
        self.sign_with_intent(message, IntentScope::PersonalMessage)
    }
}
