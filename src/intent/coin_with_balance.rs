//! The built-in `CoinWithBalance` intent.
//!
//! A request for a coin of some type holding exactly `balance`. At build
//! time every such intent is replaced by a split from either the gas coin or
//! a merged set of the sender's coins of that type.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::coin_select::select_coins;
use super::IntentResolver;
use crate::client::{Coin, SuiClient};
use crate::error::WasmSuiError;
use crate::transaction::{
    replace_command, Argument, CallArg, Command, ObjectArg, ProgrammableMoveCall,
    TransactionData, TransactionIntent,
};
use crate::types::{u64_string, ObjectId, StructTag, TypeTag, SUI_FRAMEWORK_ADDRESS};

pub const COIN_WITH_BALANCE: &str = "CoinWithBalance";

const GAS: &str = "gas";

/// Coin source for a [`CoinWithBalance`] request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CoinType {
    /// Split from the transaction's gas coin
    Gas,
    Coin(StructTag),
}

impl CoinType {
    /// Parse a coin type, mapping SUI to [`CoinType::Gas`] when `use_gas_coin`.
    pub fn from_type_str(text: &str, use_gas_coin: bool) -> Result<Self, WasmSuiError> {
        match text.parse::<CoinType>()? {
            CoinType::Coin(tag) if use_gas_coin && tag.is_sui() => Ok(CoinType::Gas),
            other => Ok(other),
        }
    }
}

impl FromStr for CoinType {
    type Err = WasmSuiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == GAS {
            return Ok(CoinType::Gas);
        }
        Ok(CoinType::Coin(s.parse()?))
    }
}

impl fmt::Display for CoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoinType::Gas => f.write_str(GAS),
            CoinType::Coin(tag) => write!(f, "{}", tag),
        }
    }
}

impl TryFrom<String> for CoinType {
    type Error = WasmSuiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CoinType> for String {
    fn from(value: CoinType) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinWithBalance {
    #[serde(rename = "type")]
    pub coin_type: CoinType,
    #[serde(with = "u64_string")]
    pub balance: u64,
}

impl CoinWithBalance {
    pub fn new(coin_type: CoinType, balance: u64) -> Self {
        CoinWithBalance { coin_type, balance }
    }

    pub fn to_intent(&self) -> Result<TransactionIntent, WasmSuiError> {
        let data = serde_json::to_value(self)
            .map_err(|e| WasmSuiError::invalid_input(e.to_string()))?;
        Ok(TransactionIntent {
            name: COIN_WITH_BALANCE.to_string(),
            inputs: BTreeMap::new(),
            data,
        })
    }

    pub fn from_intent(intent: &TransactionIntent) -> Result<Self, WasmSuiError> {
        serde_json::from_value(intent.data.clone()).map_err(|e| {
            WasmSuiError::resolution(format!("malformed {} intent: {}", COIN_WITH_BALANCE, e))
        })
    }
}

fn add_input(data: &mut TransactionData, arg: CallArg) -> Result<Argument, WasmSuiError> {
    let index = u16::try_from(data.inputs.len())
        .map_err(|_| WasmSuiError::resolution("too many transaction inputs"))?;
    data.inputs.push(arg);
    Ok(Argument::Input(index))
}

fn split(data: &mut TransactionData, coin: Argument, balance: u64) -> Result<Command, WasmSuiError> {
    let amount = add_input(data, CallArg::Pure(balance.to_le_bytes().to_vec()))?;
    Ok(Command::SplitCoins {
        coin,
        amounts: vec![amount],
    })
}

fn coin_zero(tag: StructTag) -> Command {
    Command::MoveCall(Box::new(ProgrammableMoveCall {
        package: SUI_FRAMEWORK_ADDRESS,
        module: "coin".to_string(),
        function: "zero".to_string(),
        type_arguments: vec![TypeTag::Struct(Box::new(tag))],
        arguments: vec![],
    }))
}

fn requests(data: &TransactionData) -> Result<Vec<CoinWithBalance>, WasmSuiError> {
    data.commands
        .iter()
        .filter_map(|command| match command {
            Command::Intent(intent) if intent.name == COIN_WITH_BALANCE => {
                Some(CoinWithBalance::from_intent(intent))
            }
            _ => None,
        })
        .collect()
}

/// Resolver for [`COIN_WITH_BALANCE`] intents.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoinWithBalanceResolver;

impl CoinWithBalanceResolver {
    /// Select coins for every concrete type with a non-zero total.
    async fn fetch_coins(
        data: &TransactionData,
        client: &dyn SuiClient,
    ) -> Result<BTreeMap<StructTag, Vec<Coin>>, WasmSuiError> {
        let mut totals: BTreeMap<StructTag, u128> = BTreeMap::new();
        for request in requests(data)? {
            if let CoinType::Coin(tag) = request.coin_type {
                *totals.entry(tag).or_default() += u128::from(request.balance);
            }
        }
        totals.retain(|_, total| *total > 0);
        if totals.is_empty() {
            return Ok(BTreeMap::new());
        }

        let sender = data.sender.ok_or_else(|| {
            WasmSuiError::resolution(format!("{} requires a sender", COIN_WITH_BALANCE))
        })?;
        let exclude: HashSet<ObjectId> = data.inputs.iter().filter_map(CallArg::object_id).collect();
        let exclude = &exclude;

        let fetches = totals.into_iter().map(|(tag, total)| async move {
            let coins = select_coins(client, sender, &tag.to_string(), total, exclude).await?;
            Ok::<_, WasmSuiError>((tag, coins))
        });
        Ok(try_join_all(fetches).await?.into_iter().collect())
    }
}

#[async_trait]
impl IntentResolver for CoinWithBalanceResolver {
    async fn resolve(
        &self,
        data: &mut TransactionData,
        client: &dyn SuiClient,
    ) -> Result<(), WasmSuiError> {
        let coins = Self::fetch_coins(data, client).await?;
        let mut merged: BTreeMap<StructTag, Argument> = BTreeMap::new();
        let mut resolved = 0usize;

        let mut index = 0;
        while index < data.commands.len() {
            let request = match &data.commands[index] {
                Command::Intent(intent) if intent.name == COIN_WITH_BALANCE => {
                    CoinWithBalance::from_intent(intent)?
                }
                _ => {
                    index += 1;
                    continue;
                }
            };

            let replacement = match request.coin_type {
                CoinType::Gas => vec![split(data, Argument::GasCoin, request.balance)?],
                CoinType::Coin(tag) if request.balance == 0 => vec![coin_zero(tag)],
                CoinType::Coin(tag) => {
                    let mut commands = Vec::new();
                    let source = match merged.get(&tag) {
                        Some(source) => *source,
                        None => {
                            let selected = coins.get(&tag).map(Vec::as_slice).unwrap_or_default();
                            let args = selected
                                .iter()
                                .map(|coin| {
                                    add_input(
                                        data,
                                        CallArg::Object(ObjectArg::ImmOrOwnedObject(
                                            coin.object_ref(),
                                        )),
                                    )
                                })
                                .collect::<Result<Vec<_>, _>>()?;
                            let (first, rest) = args.split_first().ok_or_else(|| {
                                WasmSuiError::resolution(format!("no coins selected for {}", tag))
                            })?;
                            if !rest.is_empty() {
                                commands.push(Command::MergeCoins {
                                    destination: *first,
                                    sources: rest.to_vec(),
                                });
                            }
                            merged.insert(tag, *first);
                            *first
                        }
                    };
                    commands.push(split(data, source, request.balance)?);
                    commands
                }
            };

            let count = replacement.len();
            replace_command(&mut data.commands, index, replacement, None)?;
            index += count;
            resolved += 1;
        }

        debug!(resolved, coin_types = coins.len(), "resolved coin intents");
        Ok(())
    }
}
