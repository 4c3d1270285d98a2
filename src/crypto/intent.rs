//! Intent-wrapped signing messages.
//!
//! Every signature covers `blake2b256([scope, version, app_id] ‖ payload)`,
//! binding the bytes to what they are meant to be.

use std::borrow::Cow;

use serde::Deserialize;

use super::hash::blake2b256_parts;
use crate::bcs::BcsWriter;
use crate::error::WasmSuiError;

const INTENT_VERSION_V0: u8 = 0;
const APP_ID_SUI: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
#[repr(u8)]
pub enum IntentScope {
    TransactionData = 0,
    TransactionEffects = 1,
    CheckpointSummary = 2,
    PersonalMessage = 3,
}

impl IntentScope {
    pub fn from_u8(value: u8) -> Result<Self, WasmSuiError> {
        match value {
            0 => Ok(IntentScope::TransactionData),
            1 => Ok(IntentScope::TransactionEffects),
            2 => Ok(IntentScope::CheckpointSummary),
            3 => Ok(IntentScope::PersonalMessage),
            other => Err(WasmSuiError::invalid_input(format!(
                "unknown intent scope {}",
                other
            ))),
        }
    }

    pub fn header(self) -> [u8; 3] {
        [self as u8, INTENT_VERSION_V0, APP_ID_SUI]
    }
}

/// Payload as it appears after the header: personal messages are
/// BCS `vector<u8>`, everything else is taken verbatim.
fn scoped_payload(scope: IntentScope, payload: &[u8]) -> Cow<'_, [u8]> {
    match scope {
        IntentScope::PersonalMessage => {
            let mut w = BcsWriter::new();
            w.write_bytes(payload);
            Cow::Owned(w.into_bytes())
        }
        _ => Cow::Borrowed(payload),
    }
}

/// `header ‖ payload`, the bytes whose digest gets signed.
pub fn message_with_intent(scope: IntentScope, payload: &[u8]) -> Vec<u8> {
    let body = scoped_payload(scope, payload);
    let mut message = Vec::with_capacity(3 + body.len());
    message.extend_from_slice(&scope.header());
    message.extend_from_slice(&body);
    message
}

/// Digest handed to the signature scheme.
pub fn signing_digest(scope: IntentScope, payload: &[u8]) -> [u8; 32] {
    let body = scoped_payload(scope, payload);
    blake2b256_parts(&[&scope.header(), &body])
}
