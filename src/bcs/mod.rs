//! Binary Canonical Serialization.
//!
//! Two ways in: typed values implement [`BcsEncode`]/[`BcsDecode`] directly,
//! and the dynamic [`Schema`]/[`Value`] model encodes anything a [`Registry`]
//! describes. Both produce identical bytes for the same layout.

mod codec;
pub mod registry;
mod schema;
pub mod uleb;

pub use codec::{from_bytes, to_bytes, BcsDecode, BcsEncode, BcsReader, BcsWriter, MAX_DEPTH};
pub use registry::sui_registry;
pub use schema::{Registry, RegistryBuilder, Schema, Value, U256};
