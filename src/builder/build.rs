//! The resolution pipeline run by `TransactionDataBuilder::build`.
//!
//! Stages run strictly in order; each may fan out network reads but joins
//! them before the next stage starts. Any failure aborts the build.

use tracing::debug;

use super::gas::{set_gas_budget, set_gas_payment, set_gas_price};
use super::normalize::{has_intents, normalize_inputs, resolve_intents};
use super::objects::resolve_object_references;
use super::types::{BuildLimits, BuildOptions};
use crate::client::SuiClient;
use crate::error::WasmSuiError;
use crate::intent::IntentResolvers;
use crate::transaction::{Argument, CallArg, TransactionData};

/// Resolve `data` in place until it is ready to serialize.
pub(crate) async fn resolve_transaction_data(
    data: &mut TransactionData,
    resolvers: &IntentResolvers,
    client: &dyn SuiClient,
    options: &BuildOptions,
) -> Result<(), WasmSuiError> {
    debug!(
        inputs = data.inputs.len(),
        commands = data.commands.len(),
        only_transaction_kind = options.only_transaction_kind,
        "resolving transaction"
    );
    let mut table = resolvers.clone();
    table.extend(&options.resolvers);

    resolve_intents(data, &table, client, options).await?;
    let usage = normalize_inputs(data, client).await?;
    resolve_object_references(data, &usage, client, &options.limits).await?;

    if !options.only_transaction_kind {
        if has_intents(data) {
            // left for a downstream signer; gas needs a serializable transaction
            debug!("unresolved intents remain, skipping gas resolution");
        } else {
            set_gas_price(data, client).await?;
            set_gas_budget(data, client, &options.limits).await?;
            set_gas_payment(data, client, &options.limits).await?;
        }
    }

    validate(data, &options.limits)
}

/// `arg` may only read inputs that exist and results of earlier commands.
pub(crate) fn check_argument(arg: &Argument, command: usize, inputs: usize) -> Result<(), WasmSuiError> {
    let valid = match *arg {
        Argument::GasCoin => true,
        Argument::Input(i) => (i as usize) < inputs,
        Argument::Result(i) | Argument::NestedResult(i, _) => (i as usize) < command,
    };
    if valid {
        Ok(())
    } else {
        Err(WasmSuiError::resolution(format!(
            "command {} has invalid argument {:?}",
            command, arg
        )))
    }
}

/// Every input concrete and within size limits, every argument in range.
pub(crate) fn validate(data: &TransactionData, limits: &BuildLimits) -> Result<(), WasmSuiError> {
    for (index, input) in data.inputs.iter().enumerate() {
        match input {
            CallArg::Pure(bytes) if bytes.len() > limits.max_pure_argument_size => {
                return Err(WasmSuiError::resolution(format!(
                    "input {} is {} bytes, over the {} byte pure argument limit",
                    index,
                    bytes.len(),
                    limits.max_pure_argument_size
                )))
            }
            CallArg::UnresolvedPure(value) => {
                return Err(WasmSuiError::resolution(format!(
                    "input {} ({}) has no type to encode it with",
                    index, value
                )))
            }
            CallArg::UnresolvedObject(object) => {
                return Err(WasmSuiError::resolution(format!(
                    "input {} (object {}) is unresolved",
                    index, object.object_id
                )))
            }
            _ => {}
        }
    }
    for (index, command) in data.commands.iter().enumerate() {
        for arg in command.arguments() {
            check_argument(arg, index, data.inputs.len())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Command;

    fn split(coin: Argument, amount: Argument) -> Command {
        Command::SplitCoins {
            coin,
            amounts: vec![amount],
        }
    }

    #[test]
    fn test_validate_pure_size() {
        let limits = BuildLimits::default();
        let mut data = TransactionData {
            inputs: vec![CallArg::Pure(vec![0; limits.max_pure_argument_size])],
            ..Default::default()
        };
        assert!(validate(&data, &limits).is_ok());
        data.inputs
            .push(CallArg::Pure(vec![0; limits.max_pure_argument_size + 1]));
        assert!(validate(&data, &limits).is_err());
    }

    #[test]
    fn test_validate_unresolved() {
        let data = TransactionData {
            inputs: vec![CallArg::UnresolvedPure(serde_json::json!(1))],
            ..Default::default()
        };
        assert!(matches!(
            validate(&data, &BuildLimits::default()),
            Err(WasmSuiError::Resolution(_))
        ));
    }

    #[test]
    fn test_validate_forward_reference() {
        let limits = BuildLimits::default();
        let inputs = vec![CallArg::Pure(vec![1, 0, 0, 0, 0, 0, 0, 0])];
        let ok = TransactionData {
            inputs: inputs.clone(),
            commands: vec![
                split(Argument::GasCoin, Argument::Input(0)),
                split(Argument::NestedResult(0, 0), Argument::Input(0)),
            ],
            ..Default::default()
        };
        assert!(validate(&ok, &limits).is_ok());

        let self_ref = TransactionData {
            inputs: inputs.clone(),
            commands: vec![split(Argument::Result(0), Argument::Input(0))],
            ..Default::default()
        };
        assert!(validate(&self_ref, &limits).is_err());

        let bad_input = TransactionData {
            inputs,
            commands: vec![split(Argument::GasCoin, Argument::Input(1))],
            ..Default::default()
        };
        assert!(validate(&bad_input, &limits).is_err());
    }
}
