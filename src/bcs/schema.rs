//! Schema-driven BCS: composable schemas, a dynamic `Value` model and the
//! immutable `Registry` that resolves named (possibly recursive) schemas.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::codec::{BcsReader, BcsWriter};
use crate::error::{EncodingError, WasmSuiError};
use crate::types::SuiAddress;

/// Layout of a BCS value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    /// Variable-length `u32`
    Uleb128,
    /// 32-byte account address
    Address,
    /// Fixed-size byte array, no length prefix
    FixedBytes(usize),
    /// `vector<u8>`
    Bytes,
    /// UTF-8 `vector<u8>`
    String,
    Vector(Box<Schema>),
    Option(Box<Schema>),
    Tuple(Vec<Schema>),
    Struct {
        name: String,
        fields: Vec<(String, Schema)>,
    },
    Enum {
        name: String,
        variants: Vec<(String, Option<Schema>)>,
    },
    /// Reference to a registered schema
    Named(String),
}

impl Schema {
    pub fn vector(inner: Schema) -> Schema {
        Schema::Vector(Box::new(inner))
    }

    pub fn option(inner: Schema) -> Schema {
        Schema::Option(Box::new(inner))
    }

    pub fn named(name: &str) -> Schema {
        Schema::Named(name.to_string())
    }

    pub fn structure(name: &str, fields: Vec<(&str, Schema)>) -> Schema {
        Schema::Struct {
            name: name.to_string(),
            fields: fields
                .into_iter()
                .map(|(field, schema)| (field.to_string(), schema))
                .collect(),
        }
    }

    pub fn enumeration(name: &str, variants: Vec<(&str, Option<Schema>)>) -> Schema {
        Schema::Enum {
            name: name.to_string(),
            variants: variants
                .into_iter()
                .map(|(variant, schema)| (variant.to_string(), schema))
                .collect(),
        }
    }

    fn visit_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Schema::Named(name) => out.push(name),
            Schema::Vector(inner) | Schema::Option(inner) => inner.visit_names(out),
            Schema::Tuple(items) => items.iter().for_each(|s| s.visit_names(out)),
            Schema::Struct { fields, .. } => fields.iter().for_each(|(_, s)| s.visit_names(out)),
            Schema::Enum { variants, .. } => variants
                .iter()
                .filter_map(|(_, s)| s.as_ref())
                .for_each(|s| s.visit_names(out)),
            _ => {}
        }
    }
}

/// 256-bit unsigned integer stored as little-endian bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct U256(pub [u8; 32]);

impl U256 {
    fn limbs(&self) -> [u64; 4] {
        let mut limbs = [0u64; 4];
        for (i, limb) in limbs.iter_mut().enumerate() {
            let mut chunk = [0u8; 8];
            chunk.copy_from_slice(&self.0[i * 8..i * 8 + 8]);
            *limb = u64::from_le_bytes(chunk);
        }
        limbs
    }

    fn from_limbs(limbs: [u64; 4]) -> U256 {
        let mut bytes = [0u8; 32];
        for (i, limb) in limbs.iter().enumerate() {
            bytes[i * 8..i * 8 + 8].copy_from_slice(&limb.to_le_bytes());
        }
        U256(bytes)
    }

    /// Parse a decimal string.
    pub fn from_dec_str(text: &str) -> Result<U256, WasmSuiError> {
        if text.is_empty() {
            return Err(WasmSuiError::invalid_input("empty u256 string"));
        }
        let mut limbs = [0u64; 4];
        for c in text.chars() {
            let digit = c
                .to_digit(10)
                .ok_or_else(|| WasmSuiError::invalid_input(format!("invalid u256: {}", text)))?;
            let mut carry = digit as u128;
            for limb in limbs.iter_mut() {
                let product = (*limb as u128) * 10 + carry;
                *limb = product as u64;
                carry = product >> 64;
            }
            if carry != 0 {
                return Err(WasmSuiError::invalid_input(format!(
                    "u256 overflow: {}",
                    text
                )));
            }
        }
        Ok(U256::from_limbs(limbs))
    }
}

impl From<u128> for U256 {
    fn from(value: u128) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(&value.to_le_bytes());
        U256(bytes)
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut limbs = self.limbs();
        if limbs.iter().all(|l| *l == 0) {
            return write!(f, "0");
        }
        let mut digits = Vec::new();
        while limbs.iter().any(|l| *l != 0) {
            let mut rem: u128 = 0;
            for limb in limbs.iter_mut().rev() {
                let cur = (rem << 64) | *limb as u128;
                *limb = (cur / 10) as u64;
                rem = cur % 10;
            }
            digits.push(b'0' + rem as u8);
        }
        digits.reverse();
        // digits are ASCII
        write!(f, "{}", String::from_utf8_lossy(&digits))
    }
}

/// A decoded (or to-be-encoded) BCS value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    U256(U256),
    Address(SuiAddress),
    Bytes(Vec<u8>),
    String(String),
    Vector(Vec<Value>),
    Option(Option<Box<Value>>),
    Tuple(Vec<Value>),
    Struct(Vec<(String, Value)>),
    Enum {
        variant: String,
        value: Option<Box<Value>>,
    },
}

impl Value {
    pub fn structure(fields: Vec<(&str, Value)>) -> Value {
        Value::Struct(
            fields
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        )
    }

    pub fn variant(name: &str, value: Option<Value>) -> Value {
        Value::Enum {
            variant: name.to_string(),
            value: value.map(Box::new),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::U128(_) => "u128",
            Value::U256(_) => "u256",
            Value::Address(_) => "address",
            Value::Bytes(_) => "bytes",
            Value::String(_) => "string",
            Value::Vector(_) => "vector",
            Value::Option(_) => "option",
            Value::Tuple(_) => "tuple",
            Value::Struct(_) => "struct",
            Value::Enum { .. } => "enum",
        }
    }

    /// JSON view: integers wider than 32 bits become decimal strings,
    /// addresses become `0x` hex, enums become `{ "Variant": payload }`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::{json, Map, Value as Json};
        match self {
            Value::Bool(b) => json!(b),
            Value::U8(n) => json!(n),
            Value::U16(n) => json!(n),
            Value::U32(n) => json!(n),
            Value::U64(n) => json!(n.to_string()),
            Value::U128(n) => json!(n.to_string()),
            Value::U256(n) => json!(n.to_string()),
            Value::Address(a) => json!(a.to_string()),
            Value::Bytes(b) => json!(b),
            Value::String(s) => json!(s),
            Value::Vector(items) | Value::Tuple(items) => {
                Json::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Option(None) => Json::Null,
            Value::Option(Some(inner)) => inner.to_json(),
            Value::Struct(fields) => {
                let mut map = Map::new();
                for (name, value) in fields {
                    map.insert(name.clone(), value.to_json());
                }
                Json::Object(map)
            }
            Value::Enum { variant, value } => {
                let mut map = Map::new();
                map.insert(
                    variant.clone(),
                    value.as_ref().map(|v| v.to_json()).unwrap_or(Json::Bool(true)),
                );
                Json::Object(map)
            }
        }
    }
}

fn mismatch(schema: &Schema, value: &Value) -> WasmSuiError {
    WasmSuiError::Schema(format!(
        "value of kind {} does not match schema {:?}",
        value.kind(),
        schema
    ))
}

/// Collects named schemas before freezing them into a [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    types: BTreeMap<String, Schema>,
    duplicates: Vec<String>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, name: &str, schema: Schema) -> Self {
        if self.types.insert(name.to_string(), schema).is_some() {
            self.duplicates.push(name.to_string());
        }
        self
    }

    /// Check every reference resolves and no name is an alias cycle.
    pub fn build(self) -> Result<Registry, WasmSuiError> {
        if let Some(name) = self.duplicates.first() {
            return Err(WasmSuiError::Schema(format!(
                "type {} registered twice",
                name
            )));
        }

        for (name, schema) in &self.types {
            let mut refs = Vec::new();
            schema.visit_names(&mut refs);
            if let Some(missing) = refs.iter().find(|r| !self.types.contains_key(**r)) {
                return Err(WasmSuiError::Schema(format!(
                    "type {} references unregistered type {}",
                    name, missing
                )));
            }

            // Named -> Named chains must terminate in a concrete layout
            let mut seen = BTreeSet::new();
            let mut current = schema;
            while let Schema::Named(next) = current {
                if !seen.insert(next.as_str()) {
                    return Err(WasmSuiError::Schema(format!(
                        "type {} is an alias cycle",
                        name
                    )));
                }
                match self.types.get(next) {
                    Some(target) => current = target,
                    None => break,
                }
            }
        }

        Ok(Registry { types: self.types })
    }
}

/// Immutable table of named schemas.
#[derive(Debug, Clone)]
pub struct Registry {
    types: BTreeMap<String, Schema>,
}

impl Registry {
    pub fn get(&self, name: &str) -> Result<&Schema, WasmSuiError> {
        self.types
            .get(name)
            .ok_or_else(|| WasmSuiError::Schema(format!("unregistered type {}", name)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn encode(&self, schema: &Schema, value: &Value) -> Result<Vec<u8>, WasmSuiError> {
        let mut w = BcsWriter::new();
        self.write_value(&mut w, schema, value)?;
        Ok(w.into_bytes())
    }

    pub fn encode_named(&self, name: &str, value: &Value) -> Result<Vec<u8>, WasmSuiError> {
        self.encode(self.get(name)?, value)
    }

    /// Strict decode: trailing bytes fail.
    pub fn decode(&self, schema: &Schema, bytes: &[u8]) -> Result<Value, WasmSuiError> {
        let mut r = BcsReader::new(bytes);
        let value = self.read_value(&mut r, schema)?;
        r.finish()?;
        Ok(value)
    }

    pub fn decode_named(&self, name: &str, bytes: &[u8]) -> Result<Value, WasmSuiError> {
        self.decode(self.get(name)?, bytes)
    }

    pub fn write_value(
        &self,
        w: &mut BcsWriter,
        schema: &Schema,
        value: &Value,
    ) -> Result<(), WasmSuiError> {
        match (schema, value) {
            (Schema::Named(name), _) => return self.write_value(w, self.get(name)?, value),
            (Schema::Bool, Value::Bool(b)) => w.write_bool(*b),
            (Schema::U8, Value::U8(n)) => w.write_u8(*n),
            (Schema::U16, Value::U16(n)) => w.write_u16(*n),
            (Schema::U32, Value::U32(n)) => w.write_u32(*n),
            (Schema::U64, Value::U64(n)) => w.write_u64(*n),
            (Schema::U128, Value::U128(n)) => w.write_u128(*n),
            (Schema::U256, Value::U256(n)) => w.write_fixed(&n.0),
            (Schema::Uleb128, Value::U32(n)) => w.write_uleb128(*n as u64),
            (Schema::Address, Value::Address(a)) => w.write_fixed(a.as_bytes()),
            (Schema::FixedBytes(len), Value::Bytes(bytes)) => {
                if bytes.len() != *len {
                    return Err(WasmSuiError::Schema(format!(
                        "expected {} fixed bytes, got {}",
                        len,
                        bytes.len()
                    )));
                }
                w.write_fixed(bytes);
            }
            (Schema::Bytes, Value::Bytes(bytes)) => w.write_bytes(bytes),
            (Schema::String, Value::String(s)) => w.write_str(s),
            (Schema::Vector(inner), Value::Vector(items)) => {
                w.write_uleb128(items.len() as u64);
                for item in items {
                    self.write_value(w, inner, item)?;
                }
            }
            (Schema::Option(_), Value::Option(None)) => w.write_uleb128(0),
            (Schema::Option(inner), Value::Option(Some(item))) => {
                w.write_uleb128(1);
                self.write_value(w, inner, item)?;
            }
            (Schema::Tuple(schemas), Value::Tuple(items)) => {
                if schemas.len() != items.len() {
                    return Err(WasmSuiError::Schema(format!(
                        "tuple expects {} elements, got {}",
                        schemas.len(),
                        items.len()
                    )));
                }
                for (s, item) in schemas.iter().zip(items) {
                    self.write_value(w, s, item)?;
                }
            }
            (Schema::Struct { name, fields }, Value::Struct(values)) => {
                if fields.len() != values.len() {
                    return Err(WasmSuiError::Schema(format!(
                        "struct {} expects {} fields, got {}",
                        name,
                        fields.len(),
                        values.len()
                    )));
                }
                for ((field, s), (given, item)) in fields.iter().zip(values) {
                    if field != given {
                        return Err(WasmSuiError::Schema(format!(
                            "struct {} expects field {}, got {}",
                            name, field, given
                        )));
                    }
                    self.write_value(w, s, item)?;
                }
            }
            (Schema::Enum { name, variants }, Value::Enum { variant, value }) => {
                let index = variants
                    .iter()
                    .position(|(v, _)| v == variant)
                    .ok_or_else(|| {
                        WasmSuiError::Schema(format!("enum {} has no variant {}", name, variant))
                    })?;
                w.write_uleb128(index as u64);
                match (&variants[index].1, value) {
                    (None, None) => {}
                    (Some(s), Some(item)) => self.write_value(w, s, item)?,
                    _ => {
                        return Err(WasmSuiError::Schema(format!(
                            "payload mismatch for {}::{}",
                            name, variant
                        )))
                    }
                }
            }
            _ => return Err(mismatch(schema, value)),
        }
        Ok(())
    }

    pub fn read_value(
        &self,
        r: &mut BcsReader<'_>,
        schema: &Schema,
    ) -> Result<Value, WasmSuiError> {
        let value = match schema {
            Schema::Named(name) => {
                let resolved = self.get(name)?;
                return r
                    .nested(|r| Ok(self.read_value(r, resolved)))
                    .map_err(WasmSuiError::from)?;
            }
            Schema::Bool => Value::Bool(r.read_bool()?),
            Schema::U8 => Value::U8(r.read_u8()?),
            Schema::U16 => Value::U16(r.read_u16()?),
            Schema::U32 => Value::U32(r.read_u32()?),
            Schema::U64 => Value::U64(r.read_u64()?),
            Schema::U128 => Value::U128(r.read_u128()?),
            Schema::U256 => Value::U256(U256(r.read_array()?)),
            Schema::Uleb128 => Value::U32(r.read_uleb128(32)? as u32),
            Schema::Address => Value::Address(SuiAddress::new(r.read_array()?)),
            Schema::FixedBytes(len) => Value::Bytes(r.read_slice(*len)?.to_vec()),
            Schema::Bytes => Value::Bytes(r.read_bytes()?),
            Schema::String => Value::String(r.read_string()?),
            Schema::Vector(inner) => {
                let len = r.read_len()?;
                let mut items = Vec::with_capacity(len.min(r.remaining()));
                for _ in 0..len {
                    items.push(self.read_value(r, inner)?);
                }
                Value::Vector(items)
            }
            Schema::Option(inner) => match r.read_variant("Option", 2)? {
                0 => Value::Option(None),
                _ => Value::Option(Some(Box::new(self.read_value(r, inner)?))),
            },
            Schema::Tuple(schemas) => Value::Tuple(
                schemas
                    .iter()
                    .map(|s| self.read_value(r, s))
                    .collect::<Result<_, _>>()?,
            ),
            Schema::Struct { fields, .. } => Value::Struct(
                fields
                    .iter()
                    .map(|(name, s)| Ok((name.clone(), self.read_value(r, s)?)))
                    .collect::<Result<_, WasmSuiError>>()?,
            ),
            Schema::Enum { name, variants } => {
                let index = r.read_variant(name, variants.len())? as usize;
                let (variant, payload) = &variants[index];
                let value = match payload {
                    Some(s) => Some(Box::new(self.read_value(r, s)?)),
                    None => None,
                };
                Value::Enum {
                    variant: variant.clone(),
                    value,
                }
            }
        };
        Ok(value)
    }
}
