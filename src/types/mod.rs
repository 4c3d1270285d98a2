//! Chain primitives shared by the transaction and signing layers.

mod address;
mod digest;
pub mod move_type;
mod object;
pub mod pure;
mod type_tag;

pub use address::{normalize_sui_address, ObjectId, SuiAddress, ADDRESS_LENGTH};
pub use digest::{ObjectDigest, TransactionDigest, DIGEST_LENGTH};
pub(crate) use object::u64_string;
pub use object::{ObjectRef, Owner, SharedObjectRef};
pub use type_tag::{
    normalize_type, StructTag, TypeTag, MOVE_STDLIB_ADDRESS, SUI_FRAMEWORK_ADDRESS,
};
