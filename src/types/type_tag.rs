//! Move type tags: parsing, normalized display and BCS.

use std::fmt;
use std::str::FromStr;

use super::address::SuiAddress;
use crate::bcs::{BcsDecode, BcsEncode, BcsReader, BcsWriter, MAX_DEPTH};
use crate::error::{EncodingError, WasmSuiError};

pub const SUI_FRAMEWORK_ADDRESS: SuiAddress = SuiAddress::from_short(2);
pub const MOVE_STDLIB_ADDRESS: SuiAddress = SuiAddress::from_short(1);

/// A fully instantiated Move type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    Bool,
    U8,
    U64,
    U128,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
    U16,
    U32,
    U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructTag {
    pub address: SuiAddress,
    pub module: String,
    pub name: String,
    pub type_params: Vec<TypeTag>,
}

impl StructTag {
    pub fn new(address: SuiAddress, module: &str, name: &str, type_params: Vec<TypeTag>) -> Self {
        StructTag {
            address,
            module: module.to_string(),
            name: name.to_string(),
            type_params,
        }
    }

    /// `0x2::sui::SUI`
    pub fn sui() -> Self {
        StructTag::new(SUI_FRAMEWORK_ADDRESS, "sui", "SUI", vec![])
    }

    /// `0x2::coin::Coin<T>`
    pub fn coin(coin_type: TypeTag) -> Self {
        StructTag::new(SUI_FRAMEWORK_ADDRESS, "coin", "Coin", vec![coin_type])
    }

    pub fn is_sui(&self) -> bool {
        *self == StructTag::sui()
    }

    /// Address, module and name match, ignoring type parameters.
    pub fn is(&self, address: &SuiAddress, module: &str, name: &str) -> bool {
        self.address == *address && self.module == module && self.name == name
    }
}

/// Normalize any accepted spelling into the canonical type string.
pub fn normalize_type(text: &str) -> Result<String, WasmSuiError> {
    Ok(TypeTag::from_str(text)?.to_string())
}

fn invalid(text: &str) -> WasmSuiError {
    WasmSuiError::invalid_input(format!("invalid type tag: {}", text))
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split on commas outside angle brackets.
fn split_top_level(text: &str) -> Result<Vec<&str>, WasmSuiError> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.checked_sub(1).ok_or_else(|| invalid(text))?,
            ',' if depth == 0 => {
                parts.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(invalid(text));
    }
    parts.push(text[start..].trim());
    Ok(parts)
}

fn parse_type(text: &str, depth: usize) -> Result<TypeTag, WasmSuiError> {
    if depth > MAX_DEPTH {
        return Err(invalid(text));
    }
    let text = text.trim();
    let tag = match text {
        "bool" => TypeTag::Bool,
        "u8" => TypeTag::U8,
        "u16" => TypeTag::U16,
        "u32" => TypeTag::U32,
        "u64" => TypeTag::U64,
        "u128" => TypeTag::U128,
        "u256" => TypeTag::U256,
        "address" => TypeTag::Address,
        "signer" => TypeTag::Signer,
        _ => {
            if let Some(inner) = text
                .strip_prefix("vector<")
                .and_then(|rest| rest.strip_suffix('>'))
            {
                TypeTag::Vector(Box::new(parse_type(inner, depth + 1)?))
            } else {
                TypeTag::Struct(Box::new(parse_struct(text, depth + 1)?))
            }
        }
    };
    Ok(tag)
}

fn parse_struct(text: &str, depth: usize) -> Result<StructTag, WasmSuiError> {
    let (head, params) = match text.find('<') {
        Some(open) => {
            let inner = text[open + 1..]
                .strip_suffix('>')
                .ok_or_else(|| invalid(text))?;
            let params = split_top_level(inner)?
                .into_iter()
                .map(|part| parse_type(part, depth + 1))
                .collect::<Result<Vec<_>, _>>()?;
            (&text[..open], params)
        }
        None => (text, vec![]),
    };

    let mut segments = head.split("::");
    let (Some(address), Some(module), Some(name), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(invalid(text));
    };
    if !is_identifier(module) || !is_identifier(name) {
        return Err(invalid(text));
    }

    Ok(StructTag {
        address: address.trim().parse()?,
        module: module.to_string(),
        name: name.to_string(),
        type_params: params,
    })
}

impl FromStr for TypeTag {
    type Err = WasmSuiError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_type(text, 0)
    }
}

impl FromStr for StructTag {
    type Err = WasmSuiError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_struct(text.trim(), 0)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Bool => write!(f, "bool"),
            TypeTag::U8 => write!(f, "u8"),
            TypeTag::U16 => write!(f, "u16"),
            TypeTag::U32 => write!(f, "u32"),
            TypeTag::U64 => write!(f, "u64"),
            TypeTag::U128 => write!(f, "u128"),
            TypeTag::U256 => write!(f, "u256"),
            TypeTag::Address => write!(f, "address"),
            TypeTag::Signer => write!(f, "signer"),
            TypeTag::Vector(inner) => write!(f, "vector<{}>", inner),
            TypeTag::Struct(tag) => write!(f, "{}", tag),
        }
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.address, self.module, self.name)?;
        if !self.type_params.is_empty() {
            let params: Vec<String> = self.type_params.iter().map(ToString::to_string).collect();
            write!(f, "<{}>", params.join(", "))?;
        }
        Ok(())
    }
}

impl BcsEncode for TypeTag {
    fn encode(&self, w: &mut BcsWriter) -> Result<(), EncodingError> {
        let index = match self {
            TypeTag::Bool => 0,
            TypeTag::U8 => 1,
            TypeTag::U64 => 2,
            TypeTag::U128 => 3,
            TypeTag::Address => 4,
            TypeTag::Signer => 5,
            TypeTag::Vector(_) => 6,
            TypeTag::Struct(_) => 7,
            TypeTag::U16 => 8,
            TypeTag::U32 => 9,
            TypeTag::U256 => 10,
        };
        w.write_uleb128(index);
        match self {
            TypeTag::Vector(inner) => inner.encode(w),
            TypeTag::Struct(tag) => tag.encode(w),
            _ => Ok(()),
        }
    }
}

impl BcsDecode for TypeTag {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, EncodingError> {
        let tag = match r.read_variant("TypeTag", 11)? {
            0 => TypeTag::Bool,
            1 => TypeTag::U8,
            2 => TypeTag::U64,
            3 => TypeTag::U128,
            4 => TypeTag::Address,
            5 => TypeTag::Signer,
            6 => TypeTag::Vector(Box::new(r.nested(TypeTag::decode)?)),
            7 => TypeTag::Struct(Box::new(r.nested(StructTag::decode)?)),
            8 => TypeTag::U16,
            9 => TypeTag::U32,
            _ => TypeTag::U256,
        };
        Ok(tag)
    }
}

impl BcsEncode for StructTag {
    fn encode(&self, w: &mut BcsWriter) -> Result<(), EncodingError> {
        self.address.encode(w)?;
        w.write_str(&self.module);
        w.write_str(&self.name);
        self.type_params.encode(w)
    }
}

impl BcsDecode for StructTag {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, EncodingError> {
        Ok(StructTag {
            address: SuiAddress::decode(r)?,
            module: r.read_string()?,
            name: r.read_string()?,
            type_params: Vec::decode(r)?,
        })
    }
}
