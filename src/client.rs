//! Network collaborator used by the build pipeline.
//!
//! The builder never talks to a node directly; it asks a [`SuiClient`] for
//! the handful of reads it needs. Response types mirror the JSON-RPC shapes
//! (camelCase, u64 as decimal strings) so an implementation can deserialize
//! node responses straight into them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::WasmSuiError;
use crate::types::move_type::NormalizedMoveFunction;
use crate::types::{u64_string, ObjectDigest, ObjectId, ObjectRef, Owner, SuiAddress};

/// An owned coin object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coin {
    pub coin_type: String,
    pub coin_object_id: ObjectId,
    #[serde(with = "u64_string")]
    pub version: u64,
    pub digest: ObjectDigest,
    #[serde(with = "u64_string")]
    pub balance: u64,
}

impl Coin {
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef {
            object_id: self.coin_object_id,
            version: self.version,
            digest: self.digest,
        }
    }
}

/// One page of `suix_getCoins`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinPage {
    pub data: Vec<Coin>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_next_page: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectData {
    pub object_id: ObjectId,
    #[serde(with = "u64_string")]
    pub version: u64,
    pub digest: ObjectDigest,
    #[serde(default)]
    pub owner: Option<Owner>,
}

impl ObjectData {
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef {
            object_id: self.object_id,
            version: self.version,
            digest: self.digest,
        }
    }
}

/// Fields requested from `sui_multiGetObjects`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDataOptions {
    #[serde(default)]
    pub show_owner: bool,
}

impl ObjectDataOptions {
    /// What object resolution needs: the owner tells shared objects apart.
    pub fn with_owner() -> Self {
        ObjectDataOptions { show_owner: true }
    }
}

/// Entry of `sui_multiGetObjects`: either data or an error payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectResponse {
    #[serde(default)]
    pub data: Option<ObjectData>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasCostSummary {
    #[serde(with = "u64_string")]
    pub computation_cost: u64,
    #[serde(with = "u64_string")]
    pub storage_cost: u64,
    #[serde(with = "u64_string")]
    pub storage_rebate: u64,
    #[serde(default, with = "u64_string")]
    pub non_refundable_storage_fee: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExecutionStatusKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStatus {
    pub status: ExecutionStatusKind,
    #[serde(default)]
    pub error: Option<String>,
}

impl ExecutionStatus {
    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatusKind::Success
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEffects {
    pub status: ExecutionStatus,
    pub gas_used: GasCostSummary,
}

/// Result of `sui_dryRunTransactionBlock`; only the effects are consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DryRunResponse {
    pub effects: TransactionEffects,
}

/// Read-only node access.
///
/// Any error returned here aborts the build in progress.
#[async_trait]
pub trait SuiClient: Send + Sync {
    async fn get_reference_gas_price(&self) -> Result<u64, WasmSuiError>;

    /// One page of coins of `coin_type` owned by `owner`, starting after `cursor`.
    async fn get_coins(
        &self,
        owner: SuiAddress,
        coin_type: &str,
        cursor: Option<String>,
    ) -> Result<CoinPage, WasmSuiError>;

    /// Objects in the order of `ids`. `owner` must be populated when
    /// `options.show_owner` is set.
    async fn multi_get_objects(
        &self,
        ids: &[ObjectId],
        options: &ObjectDataOptions,
    ) -> Result<Vec<ObjectResponse>, WasmSuiError>;

    async fn get_normalized_move_function(
        &self,
        package: ObjectId,
        module: &str,
        function: &str,
    ) -> Result<NormalizedMoveFunction, WasmSuiError>;

    async fn dry_run_transaction_block(&self, tx_bytes: &[u8]) -> Result<DryRunResponse, WasmSuiError>;
}
