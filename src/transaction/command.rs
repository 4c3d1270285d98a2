use std::collections::BTreeMap;

use super::argument::Argument;
use crate::bcs::{BcsDecode, BcsEncode, BcsReader, BcsWriter};
use crate::error::EncodingError;
use crate::types::{ObjectId, TypeTag};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgrammableMoveCall {
    pub package: ObjectId,
    pub module: String,
    pub function: String,
    pub type_arguments: Vec<TypeTag>,
    pub arguments: Vec<Argument>,
}

/// A deferred command, replaced during build by whatever its named
/// resolver produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionIntent {
    pub name: String,
    pub inputs: BTreeMap<String, Vec<Argument>>,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveCall(Box<ProgrammableMoveCall>),
    TransferObjects {
        objects: Vec<Argument>,
        address: Argument,
    },
    SplitCoins {
        coin: Argument,
        amounts: Vec<Argument>,
    },
    MergeCoins {
        destination: Argument,
        sources: Vec<Argument>,
    },
    Publish {
        modules: Vec<Vec<u8>>,
        dependencies: Vec<ObjectId>,
    },
    MakeMoveVec {
        type_tag: Option<TypeTag>,
        elements: Vec<Argument>,
    },
    Upgrade {
        modules: Vec<Vec<u8>>,
        dependencies: Vec<ObjectId>,
        package: ObjectId,
        ticket: Argument,
    },
    Intent(TransactionIntent),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::MoveCall(_) => "MoveCall",
            Command::TransferObjects { .. } => "TransferObjects",
            Command::SplitCoins { .. } => "SplitCoins",
            Command::MergeCoins { .. } => "MergeCoins",
            Command::Publish { .. } => "Publish",
            Command::MakeMoveVec { .. } => "MakeMoveVec",
            Command::Upgrade { .. } => "Upgrade",
            Command::Intent(_) => "Intent",
        }
    }

    /// Every argument slot, in encoding order.
    pub fn arguments(&self) -> Vec<&Argument> {
        match self {
            Command::MoveCall(call) => call.arguments.iter().collect(),
            Command::TransferObjects { objects, address } => {
                objects.iter().chain(std::iter::once(address)).collect()
            }
            Command::SplitCoins { coin, amounts } => {
                std::iter::once(coin).chain(amounts.iter()).collect()
            }
            Command::MergeCoins {
                destination,
                sources,
            } => std::iter::once(destination).chain(sources.iter()).collect(),
            Command::Publish { .. } => vec![],
            Command::MakeMoveVec { elements, .. } => elements.iter().collect(),
            Command::Upgrade { ticket, .. } => vec![ticket],
            Command::Intent(intent) => intent.inputs.values().flatten().collect(),
        }
    }

    pub fn arguments_mut(&mut self) -> Vec<&mut Argument> {
        match self {
            Command::MoveCall(call) => call.arguments.iter_mut().collect(),
            Command::TransferObjects { objects, address } => {
                objects.iter_mut().chain(std::iter::once(address)).collect()
            }
            Command::SplitCoins { coin, amounts } => {
                std::iter::once(coin).chain(amounts.iter_mut()).collect()
            }
            Command::MergeCoins {
                destination,
                sources,
            } => std::iter::once(destination)
                .chain(sources.iter_mut())
                .collect(),
            Command::Publish { .. } => vec![],
            Command::MakeMoveVec { elements, .. } => elements.iter_mut().collect(),
            Command::Upgrade { ticket, .. } => vec![ticket],
            Command::Intent(intent) => intent.inputs.values_mut().flatten().collect(),
        }
    }
}

fn write_args(w: &mut BcsWriter, args: &[Argument]) -> Result<(), EncodingError> {
    w.write_seq(args, |w, arg| arg.encode(w))
}

impl BcsEncode for ProgrammableMoveCall {
    fn encode(&self, w: &mut BcsWriter) -> Result<(), EncodingError> {
        self.package.encode(w)?;
        w.write_str(&self.module);
        w.write_str(&self.function);
        self.type_arguments.encode(w)?;
        write_args(w, &self.arguments)
    }
}

impl BcsDecode for ProgrammableMoveCall {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, EncodingError> {
        Ok(ProgrammableMoveCall {
            package: ObjectId::decode(r)?,
            module: r.read_string()?,
            function: r.read_string()?,
            type_arguments: Vec::decode(r)?,
            arguments: Vec::decode(r)?,
        })
    }
}

impl BcsEncode for Command {
    fn encode(&self, w: &mut BcsWriter) -> Result<(), EncodingError> {
        match self {
            Command::MoveCall(call) => {
                w.write_uleb128(0);
                call.encode(w)
            }
            Command::TransferObjects { objects, address } => {
                w.write_uleb128(1);
                write_args(w, objects)?;
                address.encode(w)
            }
            Command::SplitCoins { coin, amounts } => {
                w.write_uleb128(2);
                coin.encode(w)?;
                write_args(w, amounts)
            }
            Command::MergeCoins {
                destination,
                sources,
            } => {
                w.write_uleb128(3);
                destination.encode(w)?;
                write_args(w, sources)
            }
            Command::Publish {
                modules,
                dependencies,
            } => {
                w.write_uleb128(4);
                w.write_seq(modules, |w, m| {
                    w.write_bytes(m);
                    Ok(())
                })?;
                dependencies.encode(w)
            }
            Command::MakeMoveVec { type_tag, elements } => {
                w.write_uleb128(5);
                type_tag.encode(w)?;
                write_args(w, elements)
            }
            Command::Upgrade {
                modules,
                dependencies,
                package,
                ticket,
            } => {
                w.write_uleb128(6);
                w.write_seq(modules, |w, m| {
                    w.write_bytes(m);
                    Ok(())
                })?;
                dependencies.encode(w)?;
                package.encode(w)?;
                ticket.encode(w)
            }
            Command::Intent(intent) => Err(EncodingError::Unserializable(format!(
                "unresolved intent {}",
                intent.name
            ))),
        }
    }
}

impl BcsDecode for Command {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, EncodingError> {
        let command = match r.read_variant("Command", 7)? {
            0 => Command::MoveCall(Box::new(ProgrammableMoveCall::decode(r)?)),
            1 => Command::TransferObjects {
                objects: Vec::decode(r)?,
                address: Argument::decode(r)?,
            },
            2 => Command::SplitCoins {
                coin: Argument::decode(r)?,
                amounts: Vec::decode(r)?,
            },
            3 => Command::MergeCoins {
                destination: Argument::decode(r)?,
                sources: Vec::decode(r)?,
            },
            4 => Command::Publish {
                modules: Vec::decode(r)?,
                dependencies: Vec::decode(r)?,
            },
            5 => Command::MakeMoveVec {
                type_tag: Option::decode(r)?,
                elements: Vec::decode(r)?,
            },
            _ => Command::Upgrade {
                modules: Vec::decode(r)?,
                dependencies: Vec::decode(r)?,
                package: ObjectId::decode(r)?,
                ticket: Argument::decode(r)?,
            },
        };
        Ok(command)
    }
}
