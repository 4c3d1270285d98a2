//! In-memory `SuiClient` for pipeline tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::{
    Coin, CoinPage, DryRunResponse, ExecutionStatus, ExecutionStatusKind, GasCostSummary,
    ObjectData, ObjectDataOptions, ObjectResponse, SuiClient, TransactionEffects,
};
use crate::error::WasmSuiError;
use crate::transaction::TransactionData;
use crate::types::move_type::NormalizedMoveFunction;
use crate::types::{normalize_type, ObjectDigest, ObjectId, Owner, SuiAddress};

type FunctionKey = (ObjectId, String, String);

fn coin_key(owner: SuiAddress, coin_type: &str) -> (SuiAddress, String) {
    let normalized = normalize_type(coin_type).unwrap_or_else(|_| coin_type.to_string());
    (owner, normalized)
}

/// Records every call; coins are served in the pages they were added with.
pub struct MockClient {
    gas_price: u64,
    coins: HashMap<(SuiAddress, String), Vec<Vec<Coin>>>,
    objects: HashMap<ObjectId, ObjectData>,
    functions: HashMap<FunctionKey, NormalizedMoveFunction>,
    effects: TransactionEffects,
    next_coin: u32,
    calls: Mutex<Vec<String>>,
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClient {
    pub fn new() -> Self {
        MockClient {
            gas_price: 1000,
            coins: HashMap::new(),
            objects: HashMap::new(),
            functions: HashMap::new(),
            effects: TransactionEffects {
                status: ExecutionStatus {
                    status: ExecutionStatusKind::Success,
                    error: None,
                },
                gas_used: Self::default_gas_used(),
            },
            next_coin: 0,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn default_gas_used() -> GasCostSummary {
        GasCostSummary {
            computation_cost: 1_000_000,
            storage_cost: 2_000_000,
            storage_rebate: 500_000,
            non_refundable_storage_fee: 0,
        }
    }

    pub fn with_gas_price(mut self, price: u64) -> Self {
        self.gas_price = price;
        self
    }

    /// Add coins of `coin_type` for `owner`, one page per slice.
    pub fn with_coins(mut self, owner: SuiAddress, coin_type: &str, pages: &[&[u64]]) -> Self {
        let key = coin_key(owner, coin_type);
        for page in pages {
            let mut coins = Vec::with_capacity(page.len());
            for balance in page.iter() {
                self.next_coin += 1;
                let mut id = [0xc0; 32];
                id[28..].copy_from_slice(&self.next_coin.to_be_bytes());
                coins.push(Coin {
                    coin_type: key.1.clone(),
                    coin_object_id: SuiAddress::new(id),
                    version: 1,
                    digest: ObjectDigest::new([self.next_coin as u8; 32]),
                    balance: *balance,
                });
            }
            self.coins.entry(key.clone()).or_default().push(coins);
        }
        self
    }

    /// All coins added for `owner`, in insertion order.
    pub fn coins(&self, owner: SuiAddress, coin_type: &str) -> Vec<Coin> {
        self.coins
            .get(&coin_key(owner, coin_type))
            .map(|pages| pages.concat())
            .unwrap_or_default()
    }

    pub fn with_object(mut self, id: ObjectId, version: u64, owner: Owner) -> Self {
        self.objects.insert(
            id,
            ObjectData {
                object_id: id,
                version,
                digest: ObjectDigest::new([version as u8; 32]),
                owner: Some(owner),
            },
        );
        self
    }

    pub fn with_function(
        mut self,
        package: ObjectId,
        module: &str,
        function: &str,
        normalized: serde_json::Value,
    ) -> Self {
        let normalized = serde_json::from_value(normalized).expect("normalized function json");
        self.functions
            .insert((package, module.to_string(), function.to_string()), normalized);
        self
    }

    pub fn with_dry_run(mut self, effects: TransactionEffects) -> Self {
        self.effects = effects;
        self
    }

    /// Calls made so far, as `method` or `method:count`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

#[async_trait]
impl SuiClient for MockClient {
    async fn get_reference_gas_price(&self) -> Result<u64, WasmSuiError> {
        self.record("getReferenceGasPrice".to_string());
        Ok(self.gas_price)
    }

    async fn get_coins(
        &self,
        owner: SuiAddress,
        coin_type: &str,
        cursor: Option<String>,
    ) -> Result<CoinPage, WasmSuiError> {
        self.record(format!("getCoins:{}", cursor.as_deref().unwrap_or("-")));
        let Some(pages) = self.coins.get(&coin_key(owner, coin_type)) else {
            return Ok(CoinPage::default());
        };
        let index = match cursor {
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| WasmSuiError::Network(format!("bad cursor {}", cursor)))?,
            None => 0,
        };
        let has_next_page = index + 1 < pages.len();
        Ok(CoinPage {
            data: pages.get(index).cloned().unwrap_or_default(),
            next_cursor: has_next_page.then(|| (index + 1).to_string()),
            has_next_page,
        })
    }

    async fn multi_get_objects(
        &self,
        ids: &[ObjectId],
        options: &ObjectDataOptions,
    ) -> Result<Vec<ObjectResponse>, WasmSuiError> {
        self.record(format!("multiGetObjects:{}", ids.len()));
        Ok(ids
            .iter()
            .map(|id| match self.objects.get(id) {
                Some(data) => ObjectResponse {
                    data: Some(ObjectData {
                        owner: data.owner.clone().filter(|_| options.show_owner),
                        ..data.clone()
                    }),
                    error: None,
                },
                None => ObjectResponse {
                    data: None,
                    error: Some(serde_json::json!({ "code": "notExists", "object_id": id })),
                },
            })
            .collect())
    }

    async fn get_normalized_move_function(
        &self,
        package: ObjectId,
        module: &str,
        function: &str,
    ) -> Result<NormalizedMoveFunction, WasmSuiError> {
        self.record(format!("getNormalizedMoveFunction:{}::{}", module, function));
        self.functions
            .get(&(package, module.to_string(), function.to_string()))
            .cloned()
            .ok_or_else(|| {
                WasmSuiError::Network(format!("function {}::{}::{} not found", package, module, function))
            })
    }

    async fn dry_run_transaction_block(&self, tx_bytes: &[u8]) -> Result<DryRunResponse, WasmSuiError> {
        self.record("dryRunTransactionBlock".to_string());
        TransactionData::from_bcs_bytes(tx_bytes)?;
        Ok(DryRunResponse {
            effects: self.effects.clone(),
        })
    }
}
