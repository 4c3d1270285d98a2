//! JavaScript bindings.
//!
//! Thin `#[wasm_bindgen]` wrappers over the core layer; errors surface as
//! JS `Error`s through `From<WasmSuiError> for JsValue`.

mod bcs;
mod keypair;
mod multisig;

use serde::Serialize;
use wasm_bindgen::JsValue;

use crate::error::WasmSuiError;

pub use bcs::BcsNamespace;
pub use keypair::WasmKeypair;
pub use multisig::MultiSigNamespace;

/// Plain JS objects rather than `Map`s, so results read like JSON.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, WasmSuiError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| WasmSuiError::invalid_input(format!("cannot convert to JS value: {}", e)))
}
