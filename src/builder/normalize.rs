//! Intent expansion and raw input typing.

use std::collections::{BTreeMap, HashMap};

use futures::future::try_join_all;
use tracing::{debug, trace};

use super::types::BuildOptions;
use crate::bcs::Schema;
use crate::client::SuiClient;
use crate::error::WasmSuiError;
use crate::intent::IntentResolvers;
use crate::transaction::{Argument, CallArg, Command, ProgrammableMoveCall, TransactionData};
use crate::types::move_type::{pure_schema_for_tag, FunctionSignature, Reference};
use crate::types::pure::encode_pure_json;
use crate::types::ObjectId;

/// How an unresolved object input is used across all commands.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ObjectUsage {
    /// Taken by value or `&mut`, or passed to a built-in command
    pub mutable: bool,
    /// Passed as a `Receiving<T>` parameter
    pub receiving: bool,
    /// Any use other than `Receiving<T>`
    pub other: bool,
}

pub(crate) type UsageMap = BTreeMap<u16, ObjectUsage>;

type FunctionKey = (ObjectId, String, String);

fn function_key(call: &ProgrammableMoveCall) -> FunctionKey {
    (call.package, call.module.clone(), call.function.clone())
}

fn target(call: &ProgrammableMoveCall) -> String {
    format!("{}::{}::{}", call.package, call.module, call.function)
}

fn intent_names(data: &TransactionData) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for command in &data.commands {
        if let Command::Intent(intent) = command {
            if !names.contains(&intent.name) {
                names.push(intent.name.clone());
            }
        }
    }
    names
}

pub(crate) fn has_intents(data: &TransactionData) -> bool {
    data.commands
        .iter()
        .any(|command| matches!(command, Command::Intent(_)))
}

/// Run each distinct intent's resolver once, skipping the allow-listed ones.
pub(crate) async fn resolve_intents(
    data: &mut TransactionData,
    resolvers: &IntentResolvers,
    client: &dyn SuiClient,
    options: &BuildOptions,
) -> Result<(), WasmSuiError> {
    for name in intent_names(data) {
        if options.is_supported(&name) {
            debug!(intent = %name, "leaving supported intent unresolved");
            continue;
        }
        let resolver = resolvers
            .get(&name)
            .ok_or_else(|| WasmSuiError::resolution(format!("missing intent resolver for {}", name)))?;
        resolver.resolve(data, client).await?;

        let leftover = data.commands.iter().any(|command| {
            matches!(command, Command::Intent(intent) if intent.name == name)
        });
        if leftover {
            return Err(WasmSuiError::resolution(format!(
                "intent resolver for {} did not replace all of its commands",
                name
            )));
        }
        debug!(intent = %name, commands = data.commands.len(), "resolved intent");
    }
    Ok(())
}

fn needs_signature(call: &ProgrammableMoveCall, inputs: &[CallArg]) -> bool {
    call.arguments.iter().any(|arg| match arg {
        Argument::Input(i) => matches!(
            inputs.get(*i as usize),
            Some(CallArg::UnresolvedPure(_) | CallArg::UnresolvedObject(_))
        ),
        _ => false,
    })
}

/// Fetch the signature of every move call that has unresolved inputs.
async fn fetch_signatures(
    data: &TransactionData,
    client: &dyn SuiClient,
) -> Result<HashMap<FunctionKey, FunctionSignature>, WasmSuiError> {
    let mut keys: Vec<FunctionKey> = Vec::new();
    for command in &data.commands {
        if let Command::MoveCall(call) = command {
            let key = function_key(call);
            if needs_signature(call, &data.inputs) && !keys.contains(&key) {
                keys.push(key);
            }
        }
    }
    if keys.is_empty() {
        return Ok(HashMap::new());
    }
    debug!(functions = keys.len(), "fetching move function signatures");

    let fetches = keys.iter().map(|(package, module, function)| async move {
        let normalized = client
            .get_normalized_move_function(*package, module, function)
            .await?;
        FunctionSignature::parse(&normalized)
    });
    let signatures = try_join_all(fetches).await?;
    Ok(keys.into_iter().zip(signatures).collect())
}

/// Collects pure encodings and object usage while walking the commands.
#[derive(Default)]
struct Normalizer {
    encoded: BTreeMap<u16, Vec<u8>>,
    usage: UsageMap,
}

impl Normalizer {
    fn pure(&mut self, index: u16, bytes: Vec<u8>) -> Result<(), WasmSuiError> {
        match self.encoded.get(&index) {
            Some(existing) if *existing != bytes => Err(WasmSuiError::resolution(format!(
                "input {} is used with conflicting types",
                index
            ))),
            Some(_) => Ok(()),
            None => {
                self.encoded.insert(index, bytes);
                Ok(())
            }
        }
    }

    /// A use outside a move call: typed by the command, objects count as mutable.
    fn builtin_use(
        &mut self,
        inputs: &[CallArg],
        arg: &Argument,
        schema: Option<&Schema>,
    ) -> Result<(), WasmSuiError> {
        let Argument::Input(index) = *arg else {
            return Ok(());
        };
        match (inputs.get(index as usize), schema) {
            (Some(CallArg::UnresolvedPure(json)), Some(schema)) => {
                self.pure(index, encode_pure_json(schema, json)?)
            }
            (Some(CallArg::UnresolvedObject(_)), _) => {
                let usage = self.usage.entry(index).or_default();
                usage.mutable = true;
                usage.other = true;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn move_call(
        &mut self,
        inputs: &[CallArg],
        call: &ProgrammableMoveCall,
        signature: &FunctionSignature,
    ) -> Result<(), WasmSuiError> {
        let params = signature.user_parameters();
        if params.len() != call.arguments.len() {
            return Err(WasmSuiError::resolution(format!(
                "{} expects {} arguments, got {}",
                target(call),
                params.len(),
                call.arguments.len()
            )));
        }

        for (position, (arg, param)) in call.arguments.iter().zip(params).enumerate() {
            let Argument::Input(index) = *arg else {
                continue;
            };
            match inputs.get(index as usize) {
                Some(CallArg::UnresolvedPure(json)) => {
                    let schema = signature
                        .arena
                        .pure_schema(param.body, &call.type_arguments)
                        .ok_or_else(|| {
                            WasmSuiError::resolution(format!(
                                "argument {} of {} is not a pure type",
                                position,
                                target(call)
                            ))
                        })?;
                    self.pure(index, encode_pure_json(&schema, json)?)?;
                }
                Some(CallArg::UnresolvedObject(_)) => {
                    let usage = self.usage.entry(index).or_default();
                    if signature.arena.is_receiving(param) {
                        usage.receiving = true;
                    } else {
                        usage.other = true;
                        if param.reference != Some(Reference::Immutable) {
                            usage.mutable = true;
                        }
                    }
                    trace!(input = index, ?usage, "object usage");
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn command(
        &mut self,
        inputs: &[CallArg],
        command: &Command,
        signatures: &HashMap<FunctionKey, FunctionSignature>,
    ) -> Result<(), WasmSuiError> {
        match command {
            Command::MoveCall(call) => match signatures.get(&function_key(call)) {
                Some(signature) => self.move_call(inputs, call, signature),
                None => Ok(()),
            },
            Command::SplitCoins { coin, amounts } => {
                self.builtin_use(inputs, coin, None)?;
                amounts
                    .iter()
                    .try_for_each(|amount| self.builtin_use(inputs, amount, Some(&Schema::U64)))
            }
            Command::TransferObjects { objects, address } => {
                objects
                    .iter()
                    .try_for_each(|object| self.builtin_use(inputs, object, None))?;
                self.builtin_use(inputs, address, Some(&Schema::Address))
            }
            Command::MakeMoveVec { type_tag, elements } => {
                let schema = type_tag.as_ref().and_then(pure_schema_for_tag);
                elements
                    .iter()
                    .try_for_each(|element| self.builtin_use(inputs, element, schema.as_ref()))
            }
            other => other
                .arguments()
                .into_iter()
                .try_for_each(|arg| self.builtin_use(inputs, arg, None)),
        }
    }
}

/// Encode raw pure inputs from their use sites and record object usage.
///
/// Pure inputs with no typed use stay unresolved and are reported by
/// validation.
pub(crate) async fn normalize_inputs(
    data: &mut TransactionData,
    client: &dyn SuiClient,
) -> Result<UsageMap, WasmSuiError> {
    let signatures = fetch_signatures(data, client).await?;

    let mut normalizer = Normalizer::default();
    for command in &data.commands {
        normalizer.command(&data.inputs, command, &signatures)?;
    }

    let Normalizer { encoded, usage } = normalizer;
    debug!(
        pure = encoded.len(),
        objects = usage.len(),
        "normalized inputs"
    );
    for (index, bytes) in encoded {
        if let Some(input) = data.inputs.get_mut(index as usize) {
            *input = CallArg::Pure(bytes);
        }
    }
    Ok(usage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::test_utils::MockClient;
    use crate::transaction::UnresolvedObject;
    use crate::types::SuiAddress;
    use serde_json::json;

    const PACKAGE: SuiAddress = SuiAddress::from_short(0x42);

    fn call(function: &str, arguments: Vec<Argument>) -> Command {
        Command::MoveCall(Box::new(ProgrammableMoveCall {
            package: PACKAGE,
            module: "demo".to_string(),
            function: function.to_string(),
            type_arguments: vec![],
            arguments,
        }))
    }

    fn tx_context() -> serde_json::Value {
        json!({ "MutableReference": { "Struct": {
            "address": "0x2", "module": "tx_context", "name": "TxContext", "typeArguments": []
        } } })
    }

    fn object_param(wrapper: &str) -> serde_json::Value {
        let body = json!({ "Struct": {
            "address": "0x42", "module": "demo", "name": "Thing", "typeArguments": []
        } });
        if wrapper.is_empty() {
            return body;
        }
        let mut map = serde_json::Map::new();
        map.insert(wrapper.to_string(), body);
        serde_json::Value::Object(map)
    }

    fn receiving_param() -> serde_json::Value {
        json!({ "Struct": {
            "address": "0x2", "module": "transfer", "name": "Receiving",
            "typeArguments": [{ "Struct": {
                "address": "0x42", "module": "demo", "name": "Thing", "typeArguments": []
            } }]
        } })
    }

    #[tokio::test]
    async fn test_pure_typed_from_signature() {
        let client = MockClient::new().with_function(
            PACKAGE,
            "demo",
            "set",
            json!({ "parameters": ["U8", { "Vector": "U16" }, tx_context()] }),
        );
        let mut data = TransactionData {
            inputs: vec![
                CallArg::UnresolvedPure(json!(7)),
                CallArg::UnresolvedPure(json!([1, 2])),
            ],
            commands: vec![call("set", vec![Argument::Input(0), Argument::Input(1)])],
            ..Default::default()
        };
        normalize_inputs(&mut data, &client).await.unwrap();
        assert_eq!(data.inputs[0], CallArg::Pure(vec![7]));
        assert_eq!(data.inputs[1], CallArg::Pure(vec![2, 1, 0, 2, 0]));
    }

    #[tokio::test]
    async fn test_builtin_implicit_types() {
        let client = MockClient::new();
        let mut data = TransactionData {
            inputs: vec![
                CallArg::UnresolvedPure(json!("1000")),
                CallArg::UnresolvedPure(json!("0x5")),
            ],
            commands: vec![
                Command::SplitCoins {
                    coin: Argument::GasCoin,
                    amounts: vec![Argument::Input(0)],
                },
                Command::TransferObjects {
                    objects: vec![Argument::Result(0)],
                    address: Argument::Input(1),
                },
            ],
            ..Default::default()
        };
        normalize_inputs(&mut data, &client).await.unwrap();
        assert_eq!(data.inputs[0], CallArg::Pure(1000u64.to_le_bytes().to_vec()));
        assert_eq!(data.inputs[1], CallArg::Pure(SuiAddress::from_short(5).to_vec()));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_arity_mismatch() {
        let client = MockClient::new().with_function(
            PACKAGE,
            "demo",
            "set",
            json!({ "parameters": ["U8", tx_context()] }),
        );
        let mut data = TransactionData {
            inputs: vec![CallArg::UnresolvedPure(json!(1))],
            commands: vec![call("set", vec![Argument::Input(0), Argument::Input(0)])],
            ..Default::default()
        };
        let err = normalize_inputs(&mut data, &client).await.unwrap_err();
        assert!(matches!(err, WasmSuiError::Resolution(ref m) if m.contains("expects 1 arguments")));
    }

    #[tokio::test]
    async fn test_non_pure_parameter() {
        let client = MockClient::new().with_function(
            PACKAGE,
            "demo",
            "take",
            json!({ "parameters": [object_param("")] }),
        );
        let mut data = TransactionData {
            inputs: vec![CallArg::UnresolvedPure(json!(1))],
            commands: vec![call("take", vec![Argument::Input(0)])],
            ..Default::default()
        };
        assert!(matches!(
            normalize_inputs(&mut data, &client).await,
            Err(WasmSuiError::Resolution(_))
        ));
    }

    #[tokio::test]
    async fn test_object_usage() {
        let client = MockClient::new().with_function(
            PACKAGE,
            "demo",
            "use",
            json!({ "parameters": [
                object_param("Reference"),
                object_param("MutableReference"),
                receiving_param(),
                object_param("Reference"),
                tx_context()
            ] }),
        );
        let objects = (10u8..14)
            .map(|i| CallArg::UnresolvedObject(UnresolvedObject::new(SuiAddress::from_short(i))))
            .collect();
        let mut data = TransactionData {
            inputs: objects,
            commands: vec![
                call(
                    "use",
                    vec![
                        Argument::Input(0),
                        Argument::Input(1),
                        Argument::Input(2),
                        Argument::Input(3),
                    ],
                ),
                Command::TransferObjects {
                    objects: vec![Argument::Input(3)],
                    address: Argument::GasCoin,
                },
            ],
            ..Default::default()
        };
        let usage = normalize_inputs(&mut data, &client).await.unwrap();
        assert_eq!(
            usage[&0],
            ObjectUsage {
                mutable: false,
                receiving: false,
                other: true
            }
        );
        assert!(usage[&1].mutable);
        assert_eq!(
            usage[&2],
            ObjectUsage {
                mutable: false,
                receiving: true,
                other: false
            }
        );
        // immutable in the call, but transferred afterwards
        assert!(usage[&3].mutable);
    }

    #[tokio::test]
    async fn test_conflicting_pure_types() {
        let client = MockClient::new().with_function(
            PACKAGE,
            "demo",
            "set",
            json!({ "parameters": ["U8"] }),
        );
        let mut data = TransactionData {
            inputs: vec![CallArg::UnresolvedPure(json!(3))],
            commands: vec![
                call("set", vec![Argument::Input(0)]),
                Command::SplitCoins {
                    coin: Argument::GasCoin,
                    amounts: vec![Argument::Input(0)],
                },
            ],
            ..Default::default()
        };
        assert!(normalize_inputs(&mut data, &client).await.is_err());
    }

    #[tokio::test]
    async fn test_intents_resolved_once_and_allow_list() {
        use crate::intent::{CoinType, CoinWithBalance, COIN_WITH_BALANCE};

        let intent = || {
            Command::Intent(
                CoinWithBalance::new(CoinType::Gas, 5)
                    .to_intent()
                    .unwrap(),
            )
        };
        let client = MockClient::new();
        let resolvers = IntentResolvers::with_defaults();

        let mut data = TransactionData {
            commands: vec![intent(), intent()],
            ..Default::default()
        };
        let options = BuildOptions::new().with_supported_intent(COIN_WITH_BALANCE);
        resolve_intents(&mut data, &resolvers, &client, &options).await.unwrap();
        assert!(has_intents(&data));

        resolve_intents(&mut data, &resolvers, &client, &BuildOptions::new())
            .await
            .unwrap();
        assert!(!has_intents(&data));
        assert_eq!(data.commands.len(), 2);
        assert_eq!(data.inputs.len(), 2);

        let mut data = TransactionData {
            commands: vec![Command::Intent(crate::transaction::TransactionIntent {
                name: "Unknown".to_string(),
                inputs: Default::default(),
                data: serde_json::Value::Null,
            })],
            ..Default::default()
        };
        let err = resolve_intents(&mut data, &resolvers, &client, &BuildOptions::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            WasmSuiError::resolution("missing intent resolver for Unknown")
        );
    }
}
