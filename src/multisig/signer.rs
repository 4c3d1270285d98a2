//! Signing on behalf of a multisig with locally held member keys.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};

use super::public_key::MultiSigPublicKey;
use crate::crypto::{IntentScope, PublicKey, SignatureWithBytes, Signer};
use crate::error::WasmSuiError;
use crate::types::SuiAddress;

pub struct MultiSigSigner {
    public_key: MultiSigPublicKey,
    signers: Vec<Box<dyn Signer>>,
}

impl fmt::Debug for MultiSigSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiSigSigner")
            .field("address", &self.public_key.to_sui_address())
            .field("signers", &self.signers.len())
            .finish()
    }
}

impl MultiSigSigner {
    /// Every signer must be a distinct member and together they must reach
    /// the threshold.
    pub fn new(
        public_key: MultiSigPublicKey,
        signers: Vec<Box<dyn Signer>>,
    ) -> Result<Self, WasmSuiError> {
        let mut bitmap: u16 = 0;
        for signer in &signers {
            let index = public_key.member_index(&signer.public_key()).ok_or_else(|| {
                WasmSuiError::MultiSigConfig(format!(
                    "signer {} is not a member",
                    signer.to_sui_address()
                ))
            })?;
            if bitmap & (1 << index) != 0 {
                return Err(WasmSuiError::MultiSigConfig(format!(
                    "member {} supplied twice",
                    index
                )));
            }
            bitmap |= 1 << index;
        }

        let weight = public_key.signature_weight(bitmap);
        if weight < public_key.threshold() as u32 {
            return Err(WasmSuiError::MultiSigConfig(format!(
                "combined signer weight {} is below threshold {}",
                weight,
                public_key.threshold()
            )));
        }

        Ok(MultiSigSigner {
            public_key,
            signers,
        })
    }

    pub fn public_key(&self) -> &MultiSigPublicKey {
        &self.public_key
    }

    pub fn to_sui_address(&self) -> SuiAddress {
        self.public_key.to_sui_address()
    }

    pub fn sign_with_intent(
        &self,
        bytes: &[u8],
        scope: IntentScope,
    ) -> Result<SignatureWithBytes, WasmSuiError> {
        let partials = self
            .signers
            .iter()
            .map(|signer| signer.sign_with_intent(bytes, scope).map(|s| s.signature))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SignatureWithBytes {
            signature: self.public_key.combine_partial_signatures(&partials)?,
            bytes: STANDARD.encode(bytes),
        })
    }

    pub fn sign_transaction(&self, transaction: &[u8]) -> Result<SignatureWithBytes, WasmSuiError> {
        self.sign_with_intent(transaction, IntentScope::TransactionData)
    }

    pub fn sign_personal_message(
        &self,
        message: &[u8],
    ) -> Result<SignatureWithBytes, WasmSuiError> {
        self.sign_with_intent(message, IntentScope::PersonalMessage)
    }
}
