//! Signature schemes.
//!
//! Each scheme fixes a flag byte and key/signature sizes; [`Signer`] and
//! [`PublicKey`] are the seams the builder and multisig layers sign and
//! verify through.

mod ed25519;
pub mod hash;
mod intent;
mod keypair;
mod scheme;
mod secp256k1;
mod secp256r1;
mod signature;
mod traits;

pub use ed25519::{Ed25519Keypair, Ed25519PublicKey};
pub use intent::{message_with_intent, signing_digest, IntentScope};
pub use keypair::SuiKeypair;
pub use scheme::{SignatureScheme, ED25519_PUBLIC_KEY_SIZE, SECP256_PUBLIC_KEY_SIZE, SIGNATURE_SIZE};
pub use secp256k1::{Secp256k1Keypair, Secp256k1PublicKey};
pub use secp256r1::{Secp256r1Keypair, Secp256r1PublicKey};
pub use signature::{
    parse_serialized_signature, parse_signature_bytes, to_serialized_signature,
    verify_serialized_signature, ParsedSignature, SuiPublicKey,
};
pub use traits::{PublicKey, SignatureWithBytes, Signer};
