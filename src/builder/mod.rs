//! Transaction building.
//!
//! [`TransactionDataBuilder`] collects inputs and commands, possibly with
//! unresolved pieces (untyped pure values, bare object ids, intents), and
//! [`TransactionDataBuilder::build`] resolves them against a [`SuiClient`]:
//!
//! 1. intents are expanded by their registered resolvers
//! 2. pure inputs are typed from the Move functions that consume them
//! 3. object ids are looked up and turned into owned, shared or receiving
//!    references
//! 4. gas price, budget and payment are filled in
//! 5. the result is validated and serialized
//!
//! Values already set on the builder are never overwritten.

mod build;
mod gas;
mod normalize;
mod objects;
mod types;

#[cfg(test)]
pub mod test_utils;

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::bcs::{self, BcsEncode};
use crate::client::SuiClient;
use crate::error::WasmSuiError;
use crate::intent::{CoinType, CoinWithBalance, IntentResolver, IntentResolvers};
use crate::transaction::{
    self, Argument, CallArg, Command, ObjectArg, ProgrammableMoveCall, TransactionData,
    TransactionExpiration, TransactionIntent, UnresolvedObject,
};
use crate::types::{ObjectId, ObjectRef, SuiAddress, TypeTag};

pub use types::{BuildLimits, BuildOptions};

/// Mutable transaction under construction.
#[derive(Debug, Clone)]
pub struct TransactionDataBuilder {
    data: TransactionData,
    resolvers: IntentResolvers,
}

impl Default for TransactionDataBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_target(target: &str) -> Result<(ObjectId, String, String), WasmSuiError> {
    let parts: Vec<&str> = target.split("::").collect();
    match parts.as_slice() {
        [package, module, function] if !module.is_empty() && !function.is_empty() => Ok((
            package.parse()?,
            module.to_string(),
            function.to_string(),
        )),
        _ => Err(WasmSuiError::invalid_input(format!(
            "move call target must be package::module::function, got {}",
            target
        ))),
    }
}

impl TransactionDataBuilder {
    /// Empty builder with the built-in intent resolvers.
    pub fn new() -> Self {
        Self::from_data(TransactionData::default())
    }

    pub fn from_data(data: TransactionData) -> Self {
        TransactionDataBuilder {
            data,
            resolvers: IntentResolvers::with_defaults(),
        }
    }

    /// Continue from serialized `TransactionData`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WasmSuiError> {
        TransactionData::from_bcs_bytes(bytes).map(Self::from_data)
    }

    /// Continue from a serialized `TransactionKind`; sender and gas start unset.
    pub fn from_kind_bytes(bytes: &[u8]) -> Result<Self, WasmSuiError> {
        TransactionData::from_kind_bytes(bytes).map(Self::from_data)
    }

    pub fn data(&self) -> &TransactionData {
        &self.data
    }

    pub fn into_data(self) -> TransactionData {
        self.data
    }

    pub fn set_sender(&mut self, sender: SuiAddress) -> &mut Self {
        self.data.sender = Some(sender);
        self
    }

    pub fn set_sender_if_not_set(&mut self, sender: SuiAddress) -> &mut Self {
        self.data.sender.get_or_insert(sender);
        self
    }

    pub fn set_expiration(&mut self, expiration: TransactionExpiration) -> &mut Self {
        self.data.expiration = expiration;
        self
    }

    pub fn set_gas_price(&mut self, price: u64) -> &mut Self {
        self.data.gas_data.price = Some(price);
        self
    }

    pub fn set_gas_budget(&mut self, budget: u64) -> &mut Self {
        self.data.gas_data.budget = Some(budget);
        self
    }

    pub fn set_gas_payment(&mut self, payment: Vec<ObjectRef>) -> &mut Self {
        self.data.gas_data.payment = Some(payment);
        self
    }

    pub fn set_gas_owner(&mut self, owner: SuiAddress) -> &mut Self {
        self.data.gas_data.owner = Some(owner);
        self
    }

    /// Append an input, or return the existing one for an object id
    /// already present.
    pub fn add_input(&mut self, arg: CallArg) -> Result<Argument, WasmSuiError> {
        if let Some(id) = arg.object_id() {
            if let Some(index) = self
                .data
                .inputs
                .iter()
                .position(|input| input.object_id() == Some(id))
            {
                // index fits: it was assigned by this method
                return Ok(Argument::Input(index as u16));
            }
        }
        let index = u16::try_from(self.data.inputs.len())
            .map_err(|_| WasmSuiError::invalid_input("too many transaction inputs"))?;
        self.data.inputs.push(arg);
        Ok(Argument::Input(index))
    }

    /// A BCS-encoded pure input.
    pub fn pure<T: BcsEncode + ?Sized>(&mut self, value: &T) -> Result<Argument, WasmSuiError> {
        let bytes = bcs::to_bytes(value)?;
        self.add_input(CallArg::Pure(bytes))
    }

    pub fn pure_u64(&mut self, value: u64) -> Result<Argument, WasmSuiError> {
        self.pure(&value)
    }

    pub fn pure_address(&mut self, address: SuiAddress) -> Result<Argument, WasmSuiError> {
        self.pure(&address)
    }

    /// A pure input typed later from the command that uses it.
    pub fn pure_raw(&mut self, value: serde_json::Value) -> Result<Argument, WasmSuiError> {
        self.add_input(CallArg::UnresolvedPure(value))
    }

    /// An object known only by id.
    pub fn object(&mut self, id: ObjectId) -> Result<Argument, WasmSuiError> {
        self.add_input(CallArg::UnresolvedObject(UnresolvedObject::new(id)))
    }

    /// An object with a known reference. Whether it is received or passed as
    /// an owned object is decided by how it is used.
    pub fn object_ref(&mut self, object_ref: ObjectRef) -> Result<Argument, WasmSuiError> {
        self.add_input(CallArg::UnresolvedObject(UnresolvedObject {
            object_id: object_ref.object_id,
            version: Some(object_ref.version),
            digest: Some(object_ref.digest),
            ..Default::default()
        }))
    }

    pub fn shared_object(
        &mut self,
        id: ObjectId,
        initial_shared_version: u64,
        mutable: bool,
    ) -> Result<Argument, WasmSuiError> {
        self.add_input(CallArg::UnresolvedObject(UnresolvedObject {
            object_id: id,
            initial_shared_version: Some(initial_shared_version),
            mutable: Some(mutable),
            ..Default::default()
        }))
    }

    pub fn receiving_object(&mut self, object_ref: ObjectRef) -> Result<Argument, WasmSuiError> {
        self.add_input(CallArg::Object(ObjectArg::Receiving(object_ref)))
    }

    fn push(&mut self, command: Command) -> Result<u16, WasmSuiError> {
        let index = self.data.commands.len();
        for arg in command.arguments() {
            build::check_argument(arg, index, self.data.inputs.len())?;
        }
        let index = u16::try_from(index)
            .map_err(|_| WasmSuiError::invalid_input("too many commands"))?;
        self.data.commands.push(command);
        Ok(index)
    }

    /// Append `command` and return its result. Arguments may only reference
    /// existing inputs and earlier commands.
    pub fn add(&mut self, command: Command) -> Result<Argument, WasmSuiError> {
        self.push(command).map(Argument::Result)
    }

    /// Call `package::module::function`.
    pub fn move_call(
        &mut self,
        target: &str,
        type_arguments: Vec<TypeTag>,
        arguments: Vec<Argument>,
    ) -> Result<Argument, WasmSuiError> {
        let (package, module, function) = parse_target(target)?;
        self.add(Command::MoveCall(Box::new(ProgrammableMoveCall {
            package,
            module,
            function,
            type_arguments,
            arguments,
        })))
    }

    pub fn transfer_objects(
        &mut self,
        objects: Vec<Argument>,
        address: Argument,
    ) -> Result<Argument, WasmSuiError> {
        self.add(Command::TransferObjects { objects, address })
    }

    /// Split `coin`, returning one result per amount.
    pub fn split_coins(
        &mut self,
        coin: Argument,
        amounts: Vec<Argument>,
    ) -> Result<Vec<Argument>, WasmSuiError> {
        let count = amounts.len();
        let index = self.push(Command::SplitCoins { coin, amounts })?;
        (0..count)
            .map(|i| {
                u16::try_from(i)
                    .map(|i| Argument::NestedResult(index, i))
                    .map_err(|_| WasmSuiError::invalid_input("too many split amounts"))
            })
            .collect()
    }

    pub fn merge_coins(
        &mut self,
        destination: Argument,
        sources: Vec<Argument>,
    ) -> Result<Argument, WasmSuiError> {
        self.add(Command::MergeCoins {
            destination,
            sources,
        })
    }

    pub fn make_move_vec(
        &mut self,
        type_tag: Option<TypeTag>,
        elements: Vec<Argument>,
    ) -> Result<Argument, WasmSuiError> {
        self.add(Command::MakeMoveVec { type_tag, elements })
    }

    /// Publish compiled modules; the result is the upgrade capability.
    pub fn publish(
        &mut self,
        modules: Vec<Vec<u8>>,
        dependencies: Vec<ObjectId>,
    ) -> Result<Argument, WasmSuiError> {
        self.add(Command::Publish {
            modules,
            dependencies,
        })
    }

    pub fn upgrade(
        &mut self,
        modules: Vec<Vec<u8>>,
        dependencies: Vec<ObjectId>,
        package: ObjectId,
        ticket: Argument,
    ) -> Result<Argument, WasmSuiError> {
        self.add(Command::Upgrade {
            modules,
            dependencies,
            package,
            ticket,
        })
    }

    /// A deferred command for a registered resolver to expand.
    pub fn add_intent(
        &mut self,
        name: impl Into<String>,
        inputs: BTreeMap<String, Vec<Argument>>,
        data: serde_json::Value,
    ) -> Result<Argument, WasmSuiError> {
        self.add(Command::Intent(TransactionIntent {
            name: name.into(),
            inputs,
            data,
        }))
    }

    /// A coin of `coin_type` holding exactly `balance`.
    ///
    /// With `use_gas_coin`, SUI is split from the gas coin instead of
    /// selecting the sender's SUI coins.
    pub fn coin_with_balance(
        &mut self,
        coin_type: &str,
        balance: u64,
        use_gas_coin: bool,
    ) -> Result<Argument, WasmSuiError> {
        let coin_type = CoinType::from_type_str(coin_type, use_gas_coin)?;
        let intent = CoinWithBalance::new(coin_type, balance).to_intent()?;
        self.add(Command::Intent(intent))
    }

    /// Register `resolver` for intents named `name` on this builder.
    pub fn add_intent_resolver(
        &mut self,
        name: impl Into<String>,
        resolver: Arc<dyn IntentResolver>,
    ) -> &mut Self {
        self.resolvers.register(name, resolver);
        self
    }

    /// Replace the command at `index`, reindexing later references.
    pub fn replace_command(
        &mut self,
        index: usize,
        replacement: Vec<Command>,
        result: Option<Argument>,
    ) -> Result<(), WasmSuiError> {
        transaction::replace_command(&mut self.data.commands, index, replacement, result)
    }

    pub fn map_arguments<F>(&mut self, f: F) -> Result<(), WasmSuiError>
    where
        F: FnMut(&mut Argument, usize) -> Result<(), WasmSuiError>,
    {
        transaction::map_arguments(&mut self.data.commands, f)
    }

    /// Run the resolution pipeline and return the resolved data.
    ///
    /// Intents named in `options.supported_intents` are left in place, in
    /// which case gas is not resolved and the data cannot be serialized.
    pub async fn prepare(
        mut self,
        client: &dyn SuiClient,
        options: &BuildOptions,
    ) -> Result<TransactionData, WasmSuiError> {
        build::resolve_transaction_data(&mut self.data, &self.resolvers, client, options).await?;
        Ok(self.data)
    }

    /// Resolve and serialize: `TransactionData` bytes, or `TransactionKind`
    /// bytes with `options.only_transaction_kind`.
    pub async fn build(
        self,
        client: &dyn SuiClient,
        options: &BuildOptions,
    ) -> Result<Vec<u8>, WasmSuiError> {
        let data = self.prepare(client, options).await?;
        let bytes = match options.only_transaction_kind {
            true => data.to_kind_bytes()?,
            false => data.to_bcs_bytes()?,
        };
        debug!(bytes = bytes.len(), "built transaction");
        Ok(bytes)
    }

    /// Resolve and serialize only the `TransactionKind`.
    pub async fn build_kind(
        self,
        client: &dyn SuiClient,
        options: &BuildOptions,
    ) -> Result<Vec<u8>, WasmSuiError> {
        let options = BuildOptions {
            only_transaction_kind: true,
            ..options.clone()
        };
        self.build(client, &options).await
    }
}

#[cfg(test)]
mod tests {
    use super::test_utils::MockClient;
    use super::*;
    use crate::error::EncodingError;
    use crate::types::{ObjectDigest, Owner, SharedObjectRef};
    use serde_json::json;

    const SUI: &str = "0x2::sui::SUI";

    fn sender() -> SuiAddress {
        SuiAddress::from_short(0x5e)
    }

    fn funded() -> MockClient {
        MockClient::new().with_coins(sender(), SUI, &[[1_000_000_000, 5_000].as_slice()])
    }

    #[test]
    fn test_inputs_dedupe_objects() {
        let mut builder = TransactionDataBuilder::new();
        let id = SuiAddress::from_short(7);
        let a = builder.object(id).unwrap();
        let amount = builder.pure_u64(1).unwrap();
        let b = builder.object(id).unwrap();
        let c = builder.pure_u64(1).unwrap();
        assert_eq!(a, Argument::Input(0));
        assert_eq!(b, Argument::Input(0));
        assert_eq!(amount, Argument::Input(1));
        assert_eq!(c, Argument::Input(2));
        assert_eq!(builder.data().inputs[1], CallArg::Pure(vec![1, 0, 0, 0, 0, 0, 0, 0]));
    }

    #[test]
    fn test_add_rejects_dangling_arguments() {
        let mut builder = TransactionDataBuilder::new();
        let coin = builder.pure_u64(5).unwrap();
        assert!(builder
            .transfer_objects(vec![Argument::Result(0)], coin)
            .is_err());
        assert!(builder
            .split_coins(Argument::GasCoin, vec![Argument::Input(3)])
            .is_err());
        assert!(builder.data().commands.is_empty());
    }

    #[test]
    fn test_split_coins_results() {
        let mut builder = TransactionDataBuilder::new();
        let a = builder.pure_u64(1).unwrap();
        let b = builder.pure_u64(2).unwrap();
        builder.merge_coins(Argument::GasCoin, vec![]).unwrap();
        let parts = builder.split_coins(Argument::GasCoin, vec![a, b]).unwrap();
        assert_eq!(
            parts,
            vec![Argument::NestedResult(1, 0), Argument::NestedResult(1, 1)]
        );
    }

    #[test]
    fn test_move_call_target() {
        let mut builder = TransactionDataBuilder::new();
        let result = builder.move_call("0x2::coin::zero", vec![], vec![]).unwrap();
        assert_eq!(result, Argument::Result(0));
        let Command::MoveCall(call) = &builder.data().commands[0] else {
            panic!("expected a move call");
        };
        assert_eq!(call.package, SuiAddress::from_short(2));
        assert_eq!((call.module.as_str(), call.function.as_str()), ("coin", "zero"));

        assert!(builder.move_call("0x2::coin", vec![], vec![]).is_err());
        assert!(builder.move_call("0x2::coin::", vec![], vec![]).is_err());
        assert!(builder.move_call("nope::coin::zero", vec![], vec![]).is_err());
    }

    #[test]
    fn test_sender_if_not_set() {
        let mut builder = TransactionDataBuilder::new();
        builder
            .set_sender_if_not_set(sender())
            .set_sender_if_not_set(SuiAddress::from_short(1));
        assert_eq!(builder.data().sender, Some(sender()));
    }

    #[tokio::test]
    async fn test_build_splits_gas_coin_for_transfer() {
        let client = funded();
        let recipient = SuiAddress::from_short(0x77);
        let mut builder = TransactionDataBuilder::new();
        builder.set_sender(sender());
        let to = builder.pure_address(recipient).unwrap();
        let coin = builder.coin_with_balance(SUI, 12345, true).unwrap();
        builder.transfer_objects(vec![coin], to).unwrap();

        let bytes = builder.build(&client, &BuildOptions::new()).await.unwrap();
        let data = TransactionData::from_bcs_bytes(&bytes).unwrap();

        assert_eq!(
            data.commands,
            vec![
                Command::SplitCoins {
                    coin: Argument::GasCoin,
                    amounts: vec![Argument::Input(1)],
                },
                Command::TransferObjects {
                    objects: vec![Argument::NestedResult(0, 0)],
                    address: Argument::Input(0),
                },
            ]
        );
        assert_eq!(data.inputs[0], CallArg::Pure(recipient.to_vec()));
        assert_eq!(data.inputs[1], CallArg::Pure(12345u64.to_le_bytes().to_vec()));

        let coins = client.coins(sender(), SUI);
        assert_eq!(data.sender, Some(sender()));
        assert_eq!(data.gas_data.price, Some(1000));
        assert_eq!(
            data.gas_data.budget,
            Some(gas::budget_from_gas_used(&MockClient::default_gas_used(), 1000 * 1000))
        );
        assert_eq!(
            data.gas_data.payment,
            Some(coins.iter().map(|c| c.object_ref()).collect::<Vec<_>>())
        );
    }

    #[tokio::test]
    async fn test_build_selects_owned_coins() {
        let usdc = "0xa::usdc::USDC";
        let client = funded().with_coins(sender(), usdc, &[[40, 30, 20].as_slice()]);
        let mut builder = TransactionDataBuilder::new();
        builder.set_sender(sender());
        let to = builder.pure_address(SuiAddress::from_short(0x77)).unwrap();
        let coin = builder.coin_with_balance(usdc, 50, false).unwrap();
        builder.transfer_objects(vec![coin], to).unwrap();

        let data = builder.prepare(&client, &BuildOptions::new()).await.unwrap();
        let names: Vec<&str> = data.commands.iter().map(Command::name).collect();
        assert_eq!(names, vec!["MergeCoins", "SplitCoins", "TransferObjects"]);
        assert_eq!(
            data.commands[2],
            Command::TransferObjects {
                objects: vec![Argument::NestedResult(1, 0)],
                address: Argument::Input(0),
            }
        );
        // selected coins are never also used for gas
        let selected: Vec<ObjectId> = data.inputs.iter().filter_map(CallArg::object_id).collect();
        let payment = data.gas_data.payment.unwrap_or_default();
        assert!(payment.iter().all(|r| !selected.contains(&r.object_id)));
    }

    #[tokio::test]
    async fn test_build_move_call_resolves_inputs() {
        let package = SuiAddress::from_short(0x42);
        let thing = SuiAddress::from_short(0x0b);
        let client = funded()
            .with_object(thing, 12, Owner::Shared { initial_shared_version: 4 })
            .with_function(
                package,
                "demo",
                "set",
                json!({ "parameters": [
                    { "MutableReference": { "Struct": {
                        "address": "0x42", "module": "demo", "name": "Thing", "typeArguments": []
                    } } },
                    "U64",
                    { "MutableReference": { "Struct": {
                        "address": "0x2", "module": "tx_context", "name": "TxContext", "typeArguments": []
                    } } }
                ] }),
            );

        let mut builder = TransactionDataBuilder::new();
        let object = builder.object(thing).unwrap();
        let value = builder.pure_raw(json!("900")).unwrap();
        builder
            .move_call("0x42::demo::set", vec![], vec![object, value])
            .unwrap();

        let bytes = builder
            .build_kind(&client, &BuildOptions::new())
            .await
            .unwrap();
        let data = TransactionData::from_kind_bytes(&bytes).unwrap();
        assert_eq!(
            data.inputs,
            vec![
                CallArg::Object(ObjectArg::SharedObject(SharedObjectRef {
                    object_id: thing,
                    initial_shared_version: 4,
                    mutable: true,
                })),
                CallArg::Pure(900u64.to_le_bytes().to_vec()),
            ]
        );
        // kind-only builds never touch gas
        assert!(!client.calls().iter().any(|c| c.starts_with("getCoins")
            || c == "getReferenceGasPrice"
            || c == "dryRunTransactionBlock"));
    }

    #[tokio::test]
    async fn test_supported_intent_left_in_place() {
        let client = funded();
        let mut builder = TransactionDataBuilder::new();
        builder.set_sender(sender());
        let to = builder.pure_address(sender()).unwrap();
        let coin = builder.coin_with_balance(SUI, 1, true).unwrap();
        builder.transfer_objects(vec![coin], to).unwrap();
        let options = BuildOptions::new().with_supported_intent(crate::intent::COIN_WITH_BALANCE);

        let data = builder.clone().prepare(&client, &options).await.unwrap();
        assert!(matches!(data.commands[0], Command::Intent(_)));
        assert!(data.gas_data.budget.is_none());
        assert!(client.calls().is_empty());

        let err = builder.build(&client, &options).await.unwrap_err();
        assert!(matches!(
            err,
            WasmSuiError::Encoding(EncodingError::Unserializable(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_resolver() {
        let mut builder = TransactionDataBuilder::new();
        builder
            .add_intent("Swap", BTreeMap::new(), json!({}))
            .unwrap();
        let err = builder
            .build(&MockClient::new(), &BuildOptions::transaction_kind())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("missing intent resolver for Swap"));
    }

    #[tokio::test]
    async fn test_from_bytes_keeps_explicit_gas() {
        let coin = ObjectRef {
            object_id: SuiAddress::from_short(0xc1),
            version: 3,
            digest: ObjectDigest::new([3; 32]),
        };
        let mut builder = TransactionDataBuilder::new();
        builder
            .set_sender(sender())
            .set_gas_price(7)
            .set_gas_budget(1_000)
            .set_gas_payment(vec![coin])
            .set_expiration(TransactionExpiration::Epoch(9));
        let amount = builder.pure_u64(10).unwrap();
        builder.split_coins(Argument::GasCoin, vec![amount]).unwrap();

        let client = MockClient::new();
        let bytes = builder.build(&client, &BuildOptions::new()).await.unwrap();
        assert!(client.calls().is_empty());

        let rebuilt = TransactionDataBuilder::from_bytes(&bytes)
            .unwrap()
            .build(&client, &BuildOptions::new())
            .await
            .unwrap();
        assert_eq!(rebuilt, bytes);
    }
}
