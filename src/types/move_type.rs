//! Move function signatures as returned by `getNormalizedMoveFunction`.
//!
//! Signatures are stored in a [`TypeArena`]; each parameter is an
//! [`OpenSignature`] pointing at its body node. The arena answers the
//! questions the builder asks: is this parameter pure (and with which BCS
//! layout), a `Receiving<T>`, or the implicit `TxContext`.

use serde::Deserialize;
use serde_json::Value as Json;

use super::address::SuiAddress;
use super::type_tag::{TypeTag, MOVE_STDLIB_ADDRESS, SUI_FRAMEWORK_ADDRESS};
use crate::bcs::{Schema, MAX_DEPTH};
use crate::error::WasmSuiError;

/// Index of a node in a [`TypeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNode {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Signer,
    Vector(TypeId),
    /// A struct or enum, instantiated when `type_args` is non-empty
    Datatype {
        address: SuiAddress,
        module: String,
        name: String,
        type_args: Vec<TypeId>,
    },
    TypeParameter(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Immutable,
    Mutable,
}

/// A parameter type with its outer reference stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenSignature {
    pub reference: Option<Reference>,
    pub body: TypeId,
}

#[derive(Debug, Default, Clone)]
pub struct TypeArena {
    nodes: Vec<TypeNode>,
}

/// Raw `SuiMoveNormalizedFunction` JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMoveFunction {
    #[serde(default)]
    pub is_entry: bool,
    pub parameters: Vec<Json>,
    #[serde(default, rename = "return")]
    pub returns: Vec<Json>,
}

/// A parsed function signature.
#[derive(Debug, Clone)]
pub struct FunctionSignature {
    pub arena: TypeArena,
    pub parameters: Vec<OpenSignature>,
}

impl FunctionSignature {
    pub fn parse(function: &NormalizedMoveFunction) -> Result<Self, WasmSuiError> {
        let mut arena = TypeArena::default();
        let parameters = function
            .parameters
            .iter()
            .map(|p| arena.parse_signature(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FunctionSignature { arena, parameters })
    }

    /// Parameters the caller supplies: a trailing `TxContext` is implicit.
    pub fn user_parameters(&self) -> &[OpenSignature] {
        match self.parameters.split_last() {
            Some((last, rest)) if self.arena.is_tx_context(last) => rest,
            _ => &self.parameters,
        }
    }
}

fn bad_type(json: &Json) -> WasmSuiError {
    WasmSuiError::resolution(format!("unsupported normalized type: {}", json))
}

impl TypeArena {
    pub fn push(&mut self, node: TypeNode) -> TypeId {
        self.nodes.push(node);
        TypeId((self.nodes.len() - 1) as u32)
    }

    pub fn get(&self, id: TypeId) -> &TypeNode {
        &self.nodes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parse_signature(&mut self, json: &Json) -> Result<OpenSignature, WasmSuiError> {
        if let Some(inner) = json.get("Reference") {
            return Ok(OpenSignature {
                reference: Some(Reference::Immutable),
                body: self.parse_body(inner, 0)?,
            });
        }
        if let Some(inner) = json.get("MutableReference") {
            return Ok(OpenSignature {
                reference: Some(Reference::Mutable),
                body: self.parse_body(inner, 0)?,
            });
        }
        Ok(OpenSignature {
            reference: None,
            body: self.parse_body(json, 0)?,
        })
    }

    fn parse_body(&mut self, json: &Json, depth: usize) -> Result<TypeId, WasmSuiError> {
        if depth > MAX_DEPTH {
            return Err(bad_type(json));
        }
        let node = match json {
            Json::String(name) => match name.as_str() {
                "Bool" => TypeNode::Bool,
                "U8" => TypeNode::U8,
                "U16" => TypeNode::U16,
                "U32" => TypeNode::U32,
                "U64" => TypeNode::U64,
                "U128" => TypeNode::U128,
                "U256" => TypeNode::U256,
                "Address" => TypeNode::Address,
                "Signer" => TypeNode::Signer,
                _ => return Err(bad_type(json)),
            },
            Json::Object(map) => {
                if let Some(inner) = map.get("Vector") {
                    TypeNode::Vector(self.parse_body(inner, depth + 1)?)
                } else if let Some(index) = map.get("TypeParameter") {
                    let index = index
                        .as_u64()
                        .and_then(|i| u16::try_from(i).ok())
                        .ok_or_else(|| bad_type(json))?;
                    TypeNode::TypeParameter(index)
                } else if let Some(tag) = map.get("Struct") {
                    let field = |key: &str| {
                        tag.get(key)
                            .and_then(Json::as_str)
                            .ok_or_else(|| bad_type(json))
                    };
                    let address: SuiAddress = field("address")?.parse()?;
                    let module = field("module")?.to_string();
                    let name = field("name")?.to_string();
                    let type_args = match tag.get("typeArguments").and_then(Json::as_array) {
                        Some(args) => args
                            .iter()
                            .map(|arg| self.parse_body(arg, depth + 1))
                            .collect::<Result<Vec<_>, _>>()?,
                        None => vec![],
                    };
                    TypeNode::Datatype {
                        address,
                        module,
                        name,
                        type_args,
                    }
                } else {
                    return Err(bad_type(json));
                }
            }
            _ => return Err(bad_type(json)),
        };
        Ok(self.push(node))
    }

    fn is_datatype(&self, id: TypeId, address: &SuiAddress, module: &str, name: &str) -> bool {
        matches!(
            self.get(id),
            TypeNode::Datatype { address: a, module: m, name: n, .. }
                if a == address && m == module && n == name
        )
    }

    pub fn is_tx_context(&self, signature: &OpenSignature) -> bool {
        self.is_datatype(signature.body, &SUI_FRAMEWORK_ADDRESS, "tx_context", "TxContext")
    }

    pub fn is_receiving(&self, signature: &OpenSignature) -> bool {
        self.is_datatype(signature.body, &SUI_FRAMEWORK_ADDRESS, "transfer", "Receiving")
    }

    /// BCS layout for a pure parameter, or `None` if the type is not pure.
    ///
    /// Type parameters are substituted from the call's type arguments.
    pub fn pure_schema(&self, id: TypeId, type_args: &[TypeTag]) -> Option<Schema> {
        let schema = match self.get(id) {
            TypeNode::Bool => Schema::Bool,
            TypeNode::U8 => Schema::U8,
            TypeNode::U16 => Schema::U16,
            TypeNode::U32 => Schema::U32,
            TypeNode::U64 => Schema::U64,
            TypeNode::U128 => Schema::U128,
            TypeNode::U256 => Schema::U256,
            TypeNode::Address => Schema::Address,
            TypeNode::Signer => return None,
            TypeNode::Vector(inner) => Schema::vector(self.pure_schema(*inner, type_args)?),
            TypeNode::TypeParameter(index) => {
                return type_args.get(*index as usize).and_then(pure_schema_for_tag)
            }
            TypeNode::Datatype {
                address,
                module,
                name,
                type_args: args,
            } => {
                let inner = args
                    .first()
                    .and_then(|arg| self.pure_schema(*arg, type_args));
                return pure_datatype_schema(address, module, name, args.len(), inner);
            }
        };
        Some(schema)
    }
}

fn pure_datatype_schema(
    address: &SuiAddress,
    module: &str,
    name: &str,
    arity: usize,
    first_arg: Option<Schema>,
) -> Option<Schema> {
    match (module, name) {
        ("string", "String") | ("ascii", "String")
            if *address == MOVE_STDLIB_ADDRESS && arity == 0 =>
        {
            Some(Schema::String)
        }
        ("option", "Option") if *address == MOVE_STDLIB_ADDRESS && arity == 1 => {
            first_arg.map(Schema::option)
        }
        ("object", "ID") if *address == SUI_FRAMEWORK_ADDRESS && arity == 0 => {
            Some(Schema::Address)
        }
        _ => None,
    }
}

/// BCS layout for a pure value of a concrete type.
pub fn pure_schema_for_tag(tag: &TypeTag) -> Option<Schema> {
    let schema = match tag {
        TypeTag::Bool => Schema::Bool,
        TypeTag::U8 => Schema::U8,
        TypeTag::U16 => Schema::U16,
        TypeTag::U32 => Schema::U32,
        TypeTag::U64 => Schema::U64,
        TypeTag::U128 => Schema::U128,
        TypeTag::U256 => Schema::U256,
        TypeTag::Address => Schema::Address,
        TypeTag::Signer => return None,
        TypeTag::Vector(inner) => Schema::vector(pure_schema_for_tag(inner)?),
        TypeTag::Struct(tag) => {
            let first = tag.type_params.first().and_then(pure_schema_for_tag);
            return pure_datatype_schema(
                &tag.address,
                &tag.module,
                &tag.name,
                tag.type_params.len(),
                first,
            );
        }
    };
    Some(schema)
}
