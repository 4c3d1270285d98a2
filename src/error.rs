//! Error types for wasm-sui

use wasm_bindgen::prelude::*;

/// Failures while reading or writing BCS bytes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    /// Input ended before the value was complete
    #[error("buffer underflow: needed {needed} bytes at offset {offset}, {remaining} remaining")]
    BufferUnderflow {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    /// Bytes left over after a top-level decode
    #[error("{0} trailing bytes after decoding")]
    TrailingBytes(usize),
    /// Enum tag outside the declared variant range
    #[error("invalid enum variant {index} for {name} ({count} variants)")]
    InvalidEnumVariant {
        name: String,
        index: u32,
        count: usize,
    },
    /// ULEB128 magnitude wider than the declared integer width
    #[error("ULEB128 value exceeds {bits}-bit width")]
    UlebOverflow { bits: u32 },
    /// ULEB128 stream ended on a continuation byte
    #[error("unterminated ULEB128 value")]
    UnterminatedUleb,
    /// ULEB128 encoding with redundant trailing zero groups
    #[error("non-canonical ULEB128 encoding")]
    NonCanonicalUleb,
    /// A bool byte other than 0 or 1
    #[error("invalid bool byte 0x{0:02x}")]
    InvalidBool(u8),
    /// String payload is not UTF-8
    #[error("invalid utf-8 string")]
    InvalidUtf8,
    /// Nesting deeper than the decoder allows
    #[error("nesting depth limit {0} exceeded")]
    DepthLimitExceeded(usize),
    /// Value has no wire representation (unresolved input, intent command, ...)
    #[error("cannot serialize {0}")]
    Unserializable(String),
}

/// Cause of a failed multisig combination.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MultiSigCombineError {
    /// A partial signature was itself a multisig
    #[error("nested multisig signature at position {0}")]
    Nested(usize),
    /// A partial signature's key is not a member
    #[error("unknown public key {public_key} at position {position}")]
    UnknownPublicKey { position: usize, public_key: String },
    /// Two partial signatures from the same member
    #[error("duplicate signer at member index {0}")]
    DuplicateSigner(usize),
}

/// Main error type for wasm-sui operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WasmSuiError {
    /// Malformed, overlong or truncated BCS
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),
    /// Unregistered type or value/schema shape mismatch
    #[error("schema error: {0}")]
    Schema(String),
    /// Object missing, ambiguous argument type, arity mismatch, unresolved input
    #[error("resolution error: {0}")]
    Resolution(String),
    /// Not enough coins of a type for the requested balance
    #[error("insufficient funds: not enough coins of type {coin_type} owned by {owner} to satisfy requested balance")]
    InsufficientFunds { coin_type: String, owner: String },
    /// Dry run did not succeed
    #[error("gas estimation failed: {0}")]
    GasEstimation(String),
    /// Bad flag, bad length or failed verification
    #[error("signature error: {0}")]
    Signature(String),
    /// Invalid multisig committee
    #[error("multisig config error: {0}")]
    MultiSigConfig(String),
    /// Invalid set of partial signatures
    #[error("multisig combine error: {0}")]
    MultiSigCombine(#[from] MultiSigCombineError),
    /// Failure reported by the network collaborator
    #[error("network error: {0}")]
    Network(String),
    /// Malformed user input (addresses, digests, type tags)
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl WasmSuiError {
    pub fn resolution(message: impl Into<String>) -> Self {
        WasmSuiError::Resolution(message.into())
    }

    pub fn signature(message: impl Into<String>) -> Self {
        WasmSuiError::Signature(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        WasmSuiError::InvalidInput(message.into())
    }
}

// REQUIRED: Converts to JS Error with stack trace
impl From<WasmSuiError> for JsValue {
    fn from(err: WasmSuiError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WasmSuiError::InsufficientFunds {
            coin_type: "0x2::sui::SUI".to_string(),
            owner: "0x1".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("0x2::sui::SUI"));
        assert!(text.contains("0x1"));
    }

    #[test]
    fn test_encoding_error_converts() {
        let err: WasmSuiError = EncodingError::TrailingBytes(3).into();
        assert_eq!(err, WasmSuiError::Encoding(EncodingError::TrailingBytes(3)));
        assert_eq!(err.to_string(), "encoding error: 3 trailing bytes after decoding");
    }

    #[test]
    fn test_combine_error_is_matchable() {
        let err: WasmSuiError = MultiSigCombineError::DuplicateSigner(2).into();
        assert!(matches!(
            err,
            WasmSuiError::MultiSigCombine(MultiSigCombineError::DuplicateSigner(2))
        ));
    }
}
