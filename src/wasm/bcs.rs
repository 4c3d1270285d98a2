//! WASM bindings for BCS decoding and digests.

use wasm_bindgen::prelude::*;

use super::to_js;
use crate::bcs::sui_registry;
use crate::error::WasmSuiError;
use crate::transaction::transaction_digest;

/// Namespace for BCS operations over the built-in type registry.
#[wasm_bindgen]
pub struct BcsNamespace;

#[wasm_bindgen]
impl BcsNamespace {
    /// Decode `bytes` as the registered type `type_name`.
    ///
    /// 64-bit and wider integers are returned as decimal strings.
    ///
    /// @param type_name - e.g. "TransactionData", "MultiSig", "ObjectArg"
    #[wasm_bindgen]
    pub fn decode(type_name: &str, bytes: &[u8]) -> Result<JsValue, WasmSuiError> {
        to_js(&Self::decode_json(type_name, bytes)?)
    }

    /// Names of all registered types.
    #[wasm_bindgen]
    pub fn type_names() -> Result<Vec<String>, WasmSuiError> {
        Ok(sui_registry()?.names().map(str::to_string).collect())
    }

    /// Base58 digest of BCS `TransactionData` bytes.
    #[wasm_bindgen]
    pub fn transaction_digest(bytes: &[u8]) -> String {
        transaction_digest(bytes).to_string()
    }
}

impl BcsNamespace {
    pub fn decode_json(type_name: &str, bytes: &[u8]) -> Result<serde_json::Value, WasmSuiError> {
        Ok(sui_registry()?.decode_named(type_name, bytes)?.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_json() {
        // GasCoin, Input(2), NestedResult(1, 0)
        assert_eq!(BcsNamespace::decode_json("Argument", &[0]).unwrap(), json!({ "GasCoin": true }));
        assert_eq!(
            BcsNamespace::decode_json("Argument", &[1, 2, 0]).unwrap(),
            json!({ "Input": 2 })
        );
        assert_eq!(
            BcsNamespace::decode_json("Argument", &[3, 1, 0, 0, 0]).unwrap(),
            json!({ "NestedResult": [1, 0] })
        );
    }

    #[test]
    fn test_unknown_type() {
        assert!(matches!(
            BcsNamespace::decode_json("Nope", &[]),
            Err(WasmSuiError::Schema(_))
        ));
    }

    #[test]
    fn test_type_names() {
        let names = BcsNamespace::type_names().unwrap();
        assert!(names.iter().any(|n| n == "TransactionData"));
    }
}
