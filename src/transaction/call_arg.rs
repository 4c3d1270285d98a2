use crate::bcs::{BcsDecode, BcsEncode, BcsReader, BcsWriter};
use crate::error::EncodingError;
use crate::types::{ObjectDigest, ObjectId, ObjectRef, SharedObjectRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectArg {
    ImmOrOwnedObject(ObjectRef),
    SharedObject(SharedObjectRef),
    Receiving(ObjectRef),
}

impl ObjectArg {
    pub fn object_id(&self) -> ObjectId {
        match self {
            ObjectArg::ImmOrOwnedObject(r) | ObjectArg::Receiving(r) => r.object_id,
            ObjectArg::SharedObject(r) => r.object_id,
        }
    }
}

/// An object input whose reference the pipeline still has to look up.
///
/// Whatever is already known is kept; a version and digest together skip
/// the network fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnresolvedObject {
    pub object_id: ObjectId,
    pub version: Option<u64>,
    pub digest: Option<ObjectDigest>,
    pub initial_shared_version: Option<u64>,
    pub mutable: Option<bool>,
}

impl UnresolvedObject {
    pub fn new(object_id: ObjectId) -> Self {
        UnresolvedObject {
            object_id,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    Pure(Vec<u8>),
    Object(ObjectArg),
    /// Raw value awaiting a type from the call site
    UnresolvedPure(serde_json::Value),
    UnresolvedObject(UnresolvedObject),
}

impl CallArg {
    pub fn is_resolved(&self) -> bool {
        matches!(self, CallArg::Pure(_) | CallArg::Object(_))
    }

    pub fn object_id(&self) -> Option<ObjectId> {
        match self {
            CallArg::Object(arg) => Some(arg.object_id()),
            CallArg::UnresolvedObject(obj) => Some(obj.object_id),
            _ => None,
        }
    }
}

impl BcsEncode for ObjectArg {
    fn encode(&self, w: &mut BcsWriter) -> Result<(), EncodingError> {
        match self {
            ObjectArg::ImmOrOwnedObject(r) => {
                w.write_uleb128(0);
                r.encode(w)
            }
            ObjectArg::SharedObject(r) => {
                w.write_uleb128(1);
                r.encode(w)
            }
            ObjectArg::Receiving(r) => {
                w.write_uleb128(2);
                r.encode(w)
            }
        }
    }
}

impl BcsDecode for ObjectArg {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, EncodingError> {
        let arg = match r.read_variant("ObjectArg", 3)? {
            0 => ObjectArg::ImmOrOwnedObject(ObjectRef::decode(r)?),
            1 => ObjectArg::SharedObject(SharedObjectRef::decode(r)?),
            _ => ObjectArg::Receiving(ObjectRef::decode(r)?),
        };
        Ok(arg)
    }
}

impl BcsEncode for CallArg {
    fn encode(&self, w: &mut BcsWriter) -> Result<(), EncodingError> {
        match self {
            CallArg::Pure(bytes) => {
                w.write_uleb128(0);
                w.write_bytes(bytes);
                Ok(())
            }
            CallArg::Object(arg) => {
                w.write_uleb128(1);
                arg.encode(w)
            }
            CallArg::UnresolvedPure(value) => Err(EncodingError::Unserializable(format!(
                "unresolved pure input {}",
                value
            ))),
            CallArg::UnresolvedObject(obj) => Err(EncodingError::Unserializable(format!(
                "unresolved object input {}",
                obj.object_id
            ))),
        }
    }
}

impl BcsDecode for CallArg {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, EncodingError> {
        let arg = match r.read_variant("CallArg", 2)? {
            0 => CallArg::Pure(r.read_bytes()?),
            _ => CallArg::Object(ObjectArg::decode(r)?),
        };
        Ok(arg)
    }
}
