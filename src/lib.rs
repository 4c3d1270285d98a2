//! wasm-sui: Sui transaction building, BCS and signing for WASM.
//!
//! # Architecture
//!
//! The crate follows the same two-layer split as its sibling packages:
//!
//! 1. **Core layer** - pure Rust, usable without a JS host:
//!    - [`bcs`]: the BCS codec and the registry of Sui wire types
//!    - [`types`]: addresses, digests, object references, type tags
//!    - [`crypto`]: Ed25519, Secp256k1 and Secp256r1 keys and signatures
//!    - [`multisig`]: weighted-threshold multisig keys and signatures
//!    - [`transaction`]: programmable transaction data and its wire form
//!    - [`builder`]: the transaction builder and its resolution pipeline
//!    - [`intent`]: deferred commands such as `CoinWithBalance`
//!    - [`client`]: the network reads the builder depends on
//! 2. **WASM bindings** ([`wasm`]) - thin wrappers exposing the core to
//!    JavaScript
//!
//! # Usage from Rust
//!
//! ```rust,no_run
//! use wasm_sui::builder::{BuildOptions, TransactionDataBuilder};
//! use wasm_sui::client::SuiClient;
//! use wasm_sui::{SuiAddress, WasmSuiError};
//!
//! async fn pay(client: &dyn SuiClient, from: SuiAddress, to: SuiAddress) -> Result<Vec<u8>, WasmSuiError> {
//!     let mut builder = TransactionDataBuilder::new();
//!     builder.set_sender(from);
//!     let recipient = builder.pure_address(to)?;
//!     let coin = builder.coin_with_balance("0x2::sui::SUI", 1_000_000, true)?;
//!     builder.transfer_objects(vec![coin], recipient)?;
//!     builder.build(client, &BuildOptions::new()).await
//! }
//! ```

pub mod bcs;
pub mod builder;
pub mod client;
pub mod crypto;
mod error;
pub mod intent;
pub mod multisig;
pub mod transaction;
pub mod types;
pub mod wasm;

// Re-export core types at crate root
pub use builder::{BuildOptions, TransactionDataBuilder};
pub use crypto::{PublicKey, SignatureScheme, Signer, SuiKeypair, SuiPublicKey};
pub use error::{EncodingError, MultiSigCombineError, WasmSuiError};
pub use multisig::{MultiSig, MultiSigPublicKey};
pub use transaction::{Argument, CallArg, Command, TransactionData};
pub use types::{ObjectDigest, ObjectId, ObjectRef, SuiAddress, TransactionDigest, TypeTag};

// Re-export WASM types
pub use wasm::{BcsNamespace, MultiSigNamespace, WasmKeypair};
