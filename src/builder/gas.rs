//! Gas price, budget and payment.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::types::BuildLimits;
use crate::client::{GasCostSummary, SuiClient};
use crate::error::WasmSuiError;
use crate::transaction::{CallArg, TransactionData};
use crate::types::{ObjectId, ObjectRef, StructTag};

fn gas_price(data: &TransactionData) -> Result<u64, WasmSuiError> {
    data.gas_data
        .price
        .ok_or_else(|| WasmSuiError::GasEstimation("gas price is not set".to_string()))
}

pub(crate) async fn set_gas_price(
    data: &mut TransactionData,
    client: &dyn SuiClient,
) -> Result<(), WasmSuiError> {
    if data.gas_data.price.is_none() {
        let price = client.get_reference_gas_price().await?;
        debug!(price, "using reference gas price");
        data.gas_data.price = Some(price);
    }
    Ok(())
}

/// `max(computation + overhead, computation + storage - rebate + overhead)`
pub(crate) fn budget_from_gas_used(gas_used: &GasCostSummary, overhead: u64) -> u64 {
    let base = gas_used.computation_cost.saturating_add(overhead);
    let with_storage = base
        .saturating_add(gas_used.storage_cost)
        .saturating_sub(gas_used.storage_rebate);
    base.max(with_storage)
}

/// Estimate the budget from a dry run at the maximum budget.
pub(crate) async fn set_gas_budget(
    data: &mut TransactionData,
    client: &dyn SuiClient,
    limits: &BuildLimits,
) -> Result<(), WasmSuiError> {
    if data.gas_data.budget.is_some() {
        return Ok(());
    }
    let price = gas_price(data)?;

    let mut dry_run = data.clone();
    dry_run.gas_data.budget = Some(limits.max_gas_budget);
    if dry_run.gas_data.payment.is_none() {
        dry_run.gas_data.payment = Some(Vec::new());
    }
    let response = client
        .dry_run_transaction_block(&dry_run.to_bcs_bytes()?)
        .await?;

    let effects = response.effects;
    if !effects.status.is_success() {
        let reason = effects
            .status
            .error
            .unwrap_or_else(|| "unknown error".to_string());
        warn!(%reason, "dry run failed");
        return Err(WasmSuiError::GasEstimation(format!(
            "dry run failed, could not automatically determine a budget: {}",
            reason
        )));
    }

    let overhead = limits.gas_safe_overhead.saturating_mul(price);
    let budget = budget_from_gas_used(&effects.gas_used, overhead);
    debug!(budget, gas_used = ?effects.gas_used, "estimated gas budget");
    data.gas_data.budget = Some(budget);
    Ok(())
}

/// Pick SUI coins of the gas owner that are not already transaction inputs.
pub(crate) async fn set_gas_payment(
    data: &mut TransactionData,
    client: &dyn SuiClient,
    limits: &BuildLimits,
) -> Result<(), WasmSuiError> {
    if data.gas_data.payment.is_some() {
        return Ok(());
    }
    let owner = data
        .gas_owner()
        .ok_or_else(|| WasmSuiError::resolution("gas owner or sender must be set"))?;
    let coin_type = StructTag::sui().to_string();
    let used: HashSet<ObjectId> = data.inputs.iter().filter_map(CallArg::object_id).collect();

    let mut payment: Vec<ObjectRef> = Vec::new();
    let mut cursor = None;
    loop {
        let page = client.get_coins(owner, &coin_type, cursor).await?;
        payment.extend(
            page.data
                .iter()
                .filter(|coin| !used.contains(&coin.coin_object_id))
                .map(|coin| coin.object_ref()),
        );
        if payment.len() >= limits.max_gas_objects {
            payment.truncate(limits.max_gas_objects);
            break;
        }
        cursor = match (page.has_next_page, page.next_cursor) {
            (true, Some(next)) => Some(next),
            _ => break,
        };
    }

    if payment.is_empty() {
        warn!(%owner, "no valid gas coins");
        return Err(WasmSuiError::InsufficientFunds {
            coin_type,
            owner: owner.to_string(),
        });
    }
    debug!(coins = payment.len(), "selected gas payment");
    data.gas_data.payment = Some(payment);
    Ok(())
}
