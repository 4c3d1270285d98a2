//! The standard Sui schema registry.

use std::sync::OnceLock;

use super::schema::{Registry, RegistryBuilder, Schema};
use crate::error::WasmSuiError;

static SUI_REGISTRY: OnceLock<Result<Registry, WasmSuiError>> = OnceLock::new();

/// Process-wide registry of the chain's wire types, built on first use.
pub fn sui_registry() -> Result<&'static Registry, WasmSuiError> {
    SUI_REGISTRY
        .get_or_init(build_sui_registry)
        .as_ref()
        .map_err(Clone::clone)
}

fn named(name: &str) -> Schema {
    Schema::named(name)
}

fn vec_of(name: &str) -> Schema {
    Schema::vector(named(name))
}

fn unit_enum(name: &str, variants: &[&str]) -> Schema {
    Schema::enumeration(name, variants.iter().map(|v| (*v, None)).collect())
}

fn build_sui_registry() -> Result<Registry, WasmSuiError> {
    RegistryBuilder::new()
        .register("Address", Schema::Address)
        .register("ObjectDigest", Schema::Bytes)
        .register(
            "SuiObjectRef",
            Schema::structure(
                "SuiObjectRef",
                vec![
                    ("objectId", named("Address")),
                    ("version", Schema::U64),
                    ("digest", named("ObjectDigest")),
                ],
            ),
        )
        .register(
            "SharedObjectRef",
            Schema::structure(
                "SharedObjectRef",
                vec![
                    ("objectId", named("Address")),
                    ("initialSharedVersion", Schema::U64),
                    ("mutable", Schema::Bool),
                ],
            ),
        )
        .register(
            "ObjectArg",
            Schema::enumeration(
                "ObjectArg",
                vec![
                    ("ImmOrOwnedObject", Some(named("SuiObjectRef"))),
                    ("SharedObject", Some(named("SharedObjectRef"))),
                    ("Receiving", Some(named("SuiObjectRef"))),
                ],
            ),
        )
        .register(
            "CallArg",
            Schema::enumeration(
                "CallArg",
                vec![
                    ("Pure", Some(Schema::Bytes)),
                    ("Object", Some(named("ObjectArg"))),
                ],
            ),
        )
        .register(
            "TypeTag",
            Schema::enumeration(
                "TypeTag",
                vec![
                    ("bool", None),
                    ("u8", None),
                    ("u64", None),
                    ("u128", None),
                    ("address", None),
                    ("signer", None),
                    ("vector", Some(named("TypeTag"))),
                    ("struct", Some(named("StructTag"))),
                    ("u16", None),
                    ("u32", None),
                    ("u256", None),
                ],
            ),
        )
        .register(
            "StructTag",
            Schema::structure(
                "StructTag",
                vec![
                    ("address", named("Address")),
                    ("module", Schema::String),
                    ("name", Schema::String),
                    ("typeParams", vec_of("TypeTag")),
                ],
            ),
        )
        .register(
            "Argument",
            Schema::enumeration(
                "Argument",
                vec![
                    ("GasCoin", None),
                    ("Input", Some(Schema::U16)),
                    ("Result", Some(Schema::U16)),
                    (
                        "NestedResult",
                        Some(Schema::Tuple(vec![Schema::U16, Schema::U16])),
                    ),
                ],
            ),
        )
        .register(
            "ProgrammableMoveCall",
            Schema::structure(
                "ProgrammableMoveCall",
                vec![
                    ("package", named("Address")),
                    ("module", Schema::String),
                    ("function", Schema::String),
                    ("typeArguments", vec_of("TypeTag")),
                    ("arguments", vec_of("Argument")),
                ],
            ),
        )
        .register(
            "Command",
            Schema::enumeration(
                "Command",
                vec![
                    ("MoveCall", Some(named("ProgrammableMoveCall"))),
                    (
                        "TransferObjects",
                        Some(Schema::structure(
                            "TransferObjects",
                            vec![("objects", vec_of("Argument")), ("address", named("Argument"))],
                        )),
                    ),
                    (
                        "SplitCoins",
                        Some(Schema::structure(
                            "SplitCoins",
                            vec![("coin", named("Argument")), ("amounts", vec_of("Argument"))],
                        )),
                    ),
                    (
                        "MergeCoins",
                        Some(Schema::structure(
                            "MergeCoins",
                            vec![
                                ("destination", named("Argument")),
                                ("sources", vec_of("Argument")),
                            ],
                        )),
                    ),
                    (
                        "Publish",
                        Some(Schema::structure(
                            "Publish",
                            vec![
                                ("modules", Schema::vector(Schema::Bytes)),
                                ("dependencies", vec_of("Address")),
                            ],
                        )),
                    ),
                    (
                        "MakeMoveVec",
                        Some(Schema::structure(
                            "MakeMoveVec",
                            vec![
                                ("type", Schema::option(named("TypeTag"))),
                                ("elements", vec_of("Argument")),
                            ],
                        )),
                    ),
                    (
                        "Upgrade",
                        Some(Schema::structure(
                            "Upgrade",
                            vec![
                                ("modules", Schema::vector(Schema::Bytes)),
                                ("dependencies", vec_of("Address")),
                                ("package", named("Address")),
                                ("ticket", named("Argument")),
                            ],
                        )),
                    ),
                ],
            ),
        )
        .register(
            "ProgrammableTransaction",
            Schema::structure(
                "ProgrammableTransaction",
                vec![
                    ("inputs", vec_of("CallArg")),
                    ("commands", vec_of("Command")),
                ],
            ),
        )
        // system transaction kinds are never built client-side
        .register(
            "TransactionKind",
            Schema::enumeration(
                "TransactionKind",
                vec![("ProgrammableTransaction", Some(named("ProgrammableTransaction")))],
            ),
        )
        .register(
            "TransactionExpiration",
            Schema::enumeration(
                "TransactionExpiration",
                vec![("None", None), ("Epoch", Some(Schema::U64))],
            ),
        )
        .register(
            "GasData",
            Schema::structure(
                "GasData",
                vec![
                    ("payment", vec_of("SuiObjectRef")),
                    ("owner", named("Address")),
                    ("price", Schema::U64),
                    ("budget", Schema::U64),
                ],
            ),
        )
        .register(
            "TransactionDataV1",
            Schema::structure(
                "TransactionDataV1",
                vec![
                    ("kind", named("TransactionKind")),
                    ("sender", named("Address")),
                    ("gasData", named("GasData")),
                    ("expiration", named("TransactionExpiration")),
                ],
            ),
        )
        .register(
            "TransactionData",
            Schema::enumeration(
                "TransactionData",
                vec![("V1", Some(named("TransactionDataV1")))],
            ),
        )
        .register(
            "IntentScope",
            unit_enum(
                "IntentScope",
                &[
                    "TransactionData",
                    "TransactionEffects",
                    "CheckpointSummary",
                    "PersonalMessage",
                ],
            ),
        )
        .register("IntentVersion", unit_enum("IntentVersion", &["V0"]))
        .register("AppId", unit_enum("AppId", &["Sui"]))
        .register(
            "Intent",
            Schema::structure(
                "Intent",
                vec![
                    ("scope", named("IntentScope")),
                    ("version", named("IntentVersion")),
                    ("appId", named("AppId")),
                ],
            ),
        )
        .register(
            "PublicKey",
            Schema::enumeration(
                "PublicKey",
                vec![
                    ("ED25519", Some(Schema::FixedBytes(32))),
                    ("Secp256k1", Some(Schema::FixedBytes(33))),
                    ("Secp256r1", Some(Schema::FixedBytes(33))),
                    ("ZkLogin", Some(Schema::Bytes)),
                ],
            ),
        )
        .register(
            "CompressedSignature",
            Schema::enumeration(
                "CompressedSignature",
                vec![
                    ("ED25519", Some(Schema::FixedBytes(64))),
                    ("Secp256k1", Some(Schema::FixedBytes(64))),
                    ("Secp256r1", Some(Schema::FixedBytes(64))),
                    ("ZkLogin", Some(Schema::Bytes)),
                ],
            ),
        )
        .register(
            "MultiSigPkMap",
            Schema::structure(
                "MultiSigPkMap",
                vec![("pubKey", named("PublicKey")), ("weight", Schema::U8)],
            ),
        )
        .register(
            "MultiSigPublicKey",
            Schema::structure(
                "MultiSigPublicKey",
                vec![("pk_map", vec_of("MultiSigPkMap")), ("threshold", Schema::U16)],
            ),
        )
        .register(
            "MultiSig",
            Schema::structure(
                "MultiSig",
                vec![
                    ("sigs", vec_of("CompressedSignature")),
                    ("bitmap", Schema::U16),
                    ("multisig_pk", named("MultiSigPublicKey")),
                ],
            ),
        )
        .build()
}
