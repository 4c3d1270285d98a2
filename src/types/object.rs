//! Object references and ownership.

use serde::{Deserialize, Serialize};

use super::address::{ObjectId, SuiAddress};
use super::digest::ObjectDigest;
use crate::bcs::{BcsDecode, BcsEncode, BcsReader, BcsWriter};
use crate::error::EncodingError;

/// Reference to a specific version of an owned or immutable object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    pub object_id: ObjectId,
    #[serde(with = "u64_string")]
    pub version: u64,
    pub digest: ObjectDigest,
}

impl BcsEncode for ObjectRef {
    fn encode(&self, w: &mut BcsWriter) -> Result<(), EncodingError> {
        self.object_id.encode(w)?;
        w.write_u64(self.version);
        self.digest.encode(w)
    }
}

impl BcsDecode for ObjectRef {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, EncodingError> {
        Ok(ObjectRef {
            object_id: ObjectId::decode(r)?,
            version: r.read_u64()?,
            digest: ObjectDigest::decode(r)?,
        })
    }
}

/// Reference to a shared object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedObjectRef {
    pub object_id: ObjectId,
    #[serde(with = "u64_string")]
    pub initial_shared_version: u64,
    pub mutable: bool,
}

impl BcsEncode for SharedObjectRef {
    fn encode(&self, w: &mut BcsWriter) -> Result<(), EncodingError> {
        self.object_id.encode(w)?;
        w.write_u64(self.initial_shared_version);
        w.write_bool(self.mutable);
        Ok(())
    }
}

impl BcsDecode for SharedObjectRef {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, EncodingError> {
        Ok(SharedObjectRef {
            object_id: ObjectId::decode(r)?,
            initial_shared_version: r.read_u64()?,
            mutable: r.read_bool()?,
        })
    }
}

/// Object ownership as reported by the RPC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    AddressOwner(SuiAddress),
    ObjectOwner(SuiAddress),
    Shared {
        #[serde(with = "u64_string")]
        initial_shared_version: u64,
    },
    Immutable,
}

impl Owner {
    pub fn initial_shared_version(&self) -> Option<u64> {
        match self {
            Owner::Shared {
                initial_shared_version,
            } => Some(*initial_shared_version),
            _ => None,
        }
    }
}

/// JSON-RPC returns u64 as either a number or a decimal string.
pub(crate) mod u64_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum NumberOrString {
            Number(u64),
            String(String),
        }

        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::String(s) => s.parse().map_err(de::Error::custom),
        }
    }
}
