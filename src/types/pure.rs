//! Encoding raw JSON values as pure BCS arguments.

use serde_json::Value as Json;

use super::address::SuiAddress;
use crate::bcs::{sui_registry, Schema, Value, U256};
use crate::error::WasmSuiError;

fn mismatch(schema: &Schema, json: &Json) -> WasmSuiError {
    WasmSuiError::Schema(format!("cannot encode {} as {:?}", json, schema))
}

fn as_u128(schema: &Schema, json: &Json) -> Result<u128, WasmSuiError> {
    let parsed = match json {
        Json::Number(n) => n.as_u64().map(u128::from),
        Json::String(s) => s.parse::<u128>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| mismatch(schema, json))
}

fn narrow<T: TryFrom<u128>>(schema: &Schema, json: &Json) -> Result<T, WasmSuiError> {
    T::try_from(as_u128(schema, json)?).map_err(|_| mismatch(schema, json))
}

/// Convert a JSON value into a BCS [`Value`] shaped by `schema`.
///
/// Integers accept numbers or decimal strings, addresses accept hex,
/// `null` is `None`.
pub fn value_from_json(schema: &Schema, json: &Json) -> Result<Value, WasmSuiError> {
    let value = match schema {
        Schema::Bool => Value::Bool(json.as_bool().ok_or_else(|| mismatch(schema, json))?),
        Schema::U8 => Value::U8(narrow(schema, json)?),
        Schema::U16 => Value::U16(narrow(schema, json)?),
        Schema::U32 | Schema::Uleb128 => Value::U32(narrow(schema, json)?),
        Schema::U64 => Value::U64(narrow(schema, json)?),
        Schema::U128 => Value::U128(as_u128(schema, json)?),
        Schema::U256 => match json {
            Json::Number(n) => Value::U256(U256::from(
                n.as_u64().ok_or_else(|| mismatch(schema, json))? as u128,
            )),
            Json::String(s) => Value::U256(U256::from_dec_str(s)?),
            _ => return Err(mismatch(schema, json)),
        },
        Schema::Address => {
            let text = json.as_str().ok_or_else(|| mismatch(schema, json))?;
            Value::Address(text.parse::<SuiAddress>()?)
        }
        Schema::String => Value::String(
            json.as_str()
                .ok_or_else(|| mismatch(schema, json))?
                .to_string(),
        ),
        Schema::Bytes => {
            let items = json.as_array().ok_or_else(|| mismatch(schema, json))?;
            Value::Bytes(
                items
                    .iter()
                    .map(|item| narrow::<u8>(&Schema::U8, item))
                    .collect::<Result<_, _>>()?,
            )
        }
        Schema::Vector(inner) => {
            let items = json.as_array().ok_or_else(|| mismatch(schema, json))?;
            Value::Vector(
                items
                    .iter()
                    .map(|item| value_from_json(inner, item))
                    .collect::<Result<_, _>>()?,
            )
        }
        Schema::Option(inner) => match json {
            Json::Null => Value::Option(None),
            other => Value::Option(Some(Box::new(value_from_json(inner, other)?))),
        },
        _ => return Err(mismatch(schema, json)),
    };
    Ok(value)
}

/// BCS bytes of a raw JSON value laid out by `schema`.
pub fn encode_pure_json(schema: &Schema, json: &Json) -> Result<Vec<u8>, WasmSuiError> {
    let value = value_from_json(schema, json)?;
    sui_registry()?.encode(schema, &value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integers() {
        assert_eq!(encode_pure_json(&Schema::U8, &json!(255)).unwrap(), vec![255]);
        assert!(encode_pure_json(&Schema::U8, &json!(256)).is_err());
        assert_eq!(
            encode_pure_json(&Schema::U64, &json!("12345")).unwrap(),
            12345u64.to_le_bytes().to_vec()
        );
        assert!(encode_pure_json(&Schema::U64, &json!(-1)).is_err());
        assert_eq!(
            encode_pure_json(&Schema::U256, &json!("1")).unwrap()[..2],
            [1, 0]
        );
    }

    #[test]
    fn test_address_and_string() {
        let bytes = encode_pure_json(&Schema::Address, &json!("0x2")).unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(bytes[31], 2);
        assert_eq!(
            encode_pure_json(&Schema::String, &json!("hi")).unwrap(),
            vec![2, b'h', b'i']
        );
    }

    #[test]
    fn test_vector_and_option() {
        let schema = Schema::vector(Schema::option(Schema::U8));
        assert_eq!(
            encode_pure_json(&schema, &json!([null, 7])).unwrap(),
            vec![2, 0, 1, 7]
        );
        assert!(encode_pure_json(&schema, &json!("nope")).is_err());
    }
}
