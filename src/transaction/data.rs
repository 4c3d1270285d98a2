//! Transaction data: the builder's state and its wire form.

use super::call_arg::CallArg;
use super::command::Command;
use crate::bcs::{BcsDecode, BcsEncode, BcsReader, BcsWriter};
use crate::crypto::hash::blake2b256_parts;
use crate::error::{EncodingError, WasmSuiError};
use crate::types::{ObjectRef, SuiAddress, TransactionDigest};

const TRANSACTION_DATA_DOMAIN: &[u8] = b"TransactionData::";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionExpiration {
    #[default]
    None,
    Epoch(u64),
}

/// Gas configuration; unset fields are filled in by the build pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GasData {
    pub budget: Option<u64>,
    pub price: Option<u64>,
    /// Defaults to the sender
    pub owner: Option<SuiAddress>,
    pub payment: Option<Vec<ObjectRef>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransactionData {
    pub sender: Option<SuiAddress>,
    pub expiration: TransactionExpiration,
    pub gas_data: GasData,
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
}

fn missing(field: &str) -> EncodingError {
    EncodingError::Unserializable(format!("transaction without {}", field))
}

impl TransactionData {
    /// Gas owner, or the sender when none is set.
    pub fn gas_owner(&self) -> Option<SuiAddress> {
        self.gas_data.owner.or(self.sender)
    }

    fn write_kind(&self, w: &mut BcsWriter) -> Result<(), EncodingError> {
        // TransactionKind::ProgrammableTransaction
        w.write_uleb128(0);
        self.inputs.encode(w)?;
        self.commands.encode(w)
    }

    /// BCS `TransactionKind`, which needs no sender or gas.
    pub fn to_kind_bytes(&self) -> Result<Vec<u8>, WasmSuiError> {
        let mut w = BcsWriter::new();
        self.write_kind(&mut w)?;
        Ok(w.into_bytes())
    }

    /// BCS `TransactionData::V1`.
    pub fn to_bcs_bytes(&self) -> Result<Vec<u8>, WasmSuiError> {
        let sender = self.sender.ok_or_else(|| missing("sender"))?;
        let owner = self.gas_owner().ok_or_else(|| missing("gas owner"))?;
        let payment = self
            .gas_data
            .payment
            .as_ref()
            .ok_or_else(|| missing("gas payment"))?;
        let price = self.gas_data.price.ok_or_else(|| missing("gas price"))?;
        let budget = self.gas_data.budget.ok_or_else(|| missing("gas budget"))?;

        let mut w = BcsWriter::new();
        // TransactionData::V1
        w.write_uleb128(0);
        self.write_kind(&mut w)?;
        sender.encode(&mut w)?;
        payment.encode(&mut w)?;
        owner.encode(&mut w)?;
        w.write_u64(price);
        w.write_u64(budget);
        match self.expiration {
            TransactionExpiration::None => w.write_uleb128(0),
            TransactionExpiration::Epoch(epoch) => {
                w.write_uleb128(1);
                w.write_u64(epoch);
            }
        }
        Ok(w.into_bytes())
    }

    fn read_kind(r: &mut BcsReader<'_>) -> Result<(Vec<CallArg>, Vec<Command>), EncodingError> {
        r.read_variant("TransactionKind", 1)?;
        Ok((Vec::decode(r)?, Vec::decode(r)?))
    }

    pub fn from_kind_bytes(bytes: &[u8]) -> Result<Self, WasmSuiError> {
        let mut r = BcsReader::new(bytes);
        let (inputs, commands) = Self::read_kind(&mut r)?;
        r.finish()?;
        Ok(TransactionData {
            inputs,
            commands,
            ..Default::default()
        })
    }

    pub fn from_bcs_bytes(bytes: &[u8]) -> Result<Self, WasmSuiError> {
        let mut r = BcsReader::new(bytes);
        r.read_variant("TransactionData", 1)?;
        let (inputs, commands) = Self::read_kind(&mut r)?;
        let sender = SuiAddress::decode(&mut r)?;
        let payment = Vec::<ObjectRef>::decode(&mut r)?;
        let owner = SuiAddress::decode(&mut r)?;
        let price = r.read_u64()?;
        let budget = r.read_u64()?;
        let expiration = match r.read_variant("TransactionExpiration", 2)? {
            0 => TransactionExpiration::None,
            _ => TransactionExpiration::Epoch(r.read_u64()?),
        };
        r.finish()?;

        Ok(TransactionData {
            sender: Some(sender),
            expiration,
            gas_data: GasData {
                budget: Some(budget),
                price: Some(price),
                owner: Some(owner),
                payment: Some(payment),
            },
            inputs,
            commands,
        })
    }

    /// `base58(blake2b256("TransactionData::" ‖ bytes))`
    pub fn digest(&self) -> Result<TransactionDigest, WasmSuiError> {
        Ok(transaction_digest(&self.to_bcs_bytes()?))
    }
}

/// Digest of already-serialized transaction bytes.
pub fn transaction_digest(bytes: &[u8]) -> TransactionDigest {
    TransactionDigest::new(blake2b256_parts(&[TRANSACTION_DATA_DOMAIN, bytes]))
}
