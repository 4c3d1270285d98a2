//! Turning unresolved object inputs into concrete object arguments.

use std::collections::HashMap;

use futures::future::try_join_all;
use tracing::{debug, trace};

use super::normalize::{ObjectUsage, UsageMap};
use super::types::BuildLimits;
use crate::client::{ObjectData, ObjectDataOptions, SuiClient};
use crate::error::WasmSuiError;
use crate::transaction::{CallArg, ObjectArg, TransactionData, UnresolvedObject};
use crate::types::{ObjectId, ObjectRef, Owner, SharedObjectRef};

/// A known version and digest, or a known shared version, skips the fetch.
fn needs_fetch(object: &UnresolvedObject) -> bool {
    object.initial_shared_version.is_none()
        && (object.version.is_none() || object.digest.is_none())
}

fn owned(object_ref: ObjectRef, usage: ObjectUsage) -> ObjectArg {
    if usage.receiving && !usage.other {
        ObjectArg::Receiving(object_ref)
    } else {
        ObjectArg::ImmOrOwnedObject(object_ref)
    }
}

fn shared(object: &UnresolvedObject, initial_shared_version: u64, usage: ObjectUsage) -> ObjectArg {
    ObjectArg::SharedObject(SharedObjectRef {
        object_id: object.object_id,
        initial_shared_version,
        mutable: object.mutable.unwrap_or(false) || usage.mutable,
    })
}

async fn fetch_objects(
    ids: &[ObjectId],
    client: &dyn SuiClient,
    limits: &BuildLimits,
) -> Result<HashMap<ObjectId, ObjectData>, WasmSuiError> {
    let chunks: Vec<&[ObjectId]> = ids.chunks(limits.max_objects_per_fetch.max(1)).collect();
    debug!(objects = ids.len(), batches = chunks.len(), "fetching objects");

    let options = ObjectDataOptions::with_owner();
    let responses =
        try_join_all(chunks.iter().map(|chunk| client.multi_get_objects(chunk, &options))).await?;

    let mut fetched = HashMap::with_capacity(ids.len());
    for (chunk, batch) in chunks.iter().zip(responses) {
        if batch.len() != chunk.len() {
            return Err(WasmSuiError::Network(format!(
                "requested {} objects, received {}",
                chunk.len(),
                batch.len()
            )));
        }
        for (id, response) in chunk.iter().zip(batch) {
            let data = response.data.ok_or_else(|| {
                let reason = response
                    .error
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "not found".to_string());
                WasmSuiError::resolution(format!("failed to fetch object {}: {}", id, reason))
            })?;
            fetched.insert(*id, data);
        }
    }
    Ok(fetched)
}

/// Resolve every `UnresolvedObject` input.
///
/// Shared objects become `SharedObject` (mutable if any use needs it),
/// objects only ever received become `Receiving`, the rest
/// `ImmOrOwnedObject`.
pub(crate) async fn resolve_object_references(
    data: &mut TransactionData,
    usage: &UsageMap,
    client: &dyn SuiClient,
    limits: &BuildLimits,
) -> Result<(), WasmSuiError> {
    let mut pending: Vec<ObjectId> = Vec::new();
    for input in &data.inputs {
        if let CallArg::UnresolvedObject(object) = input {
            if needs_fetch(object) && !pending.contains(&object.object_id) {
                pending.push(object.object_id);
            }
        }
    }
    let fetched = match pending.is_empty() {
        true => HashMap::new(),
        false => fetch_objects(&pending, client, limits).await?,
    };

    for (index, input) in data.inputs.iter_mut().enumerate() {
        let CallArg::UnresolvedObject(object) = input else {
            continue;
        };
        let uses = u16::try_from(index)
            .ok()
            .and_then(|i| usage.get(&i).copied())
            .unwrap_or_default();

        let resolved = match (object.initial_shared_version, object.version, object.digest) {
            (Some(version), _, _) => shared(object, version, uses),
            (None, Some(version), Some(digest)) => owned(
                ObjectRef {
                    object_id: object.object_id,
                    version,
                    digest,
                },
                uses,
            ),
            _ => {
                let fetched = fetched.get(&object.object_id).ok_or_else(|| {
                    WasmSuiError::resolution(format!("object {} was not fetched", object.object_id))
                })?;
                match &fetched.owner {
                    Some(Owner::Shared {
                        initial_shared_version,
                    }) => shared(object, *initial_shared_version, uses),
                    _ => owned(fetched.object_ref(), uses),
                }
            }
        };
        trace!(input = index, object = %object.object_id, ?resolved, "resolved object");
        *input = CallArg::Object(resolved);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::test_utils::MockClient;
    use crate::types::{ObjectDigest, SuiAddress};

    fn unresolved(id: u8) -> CallArg {
        CallArg::UnresolvedObject(UnresolvedObject::new(SuiAddress::from_short(id)))
    }

    fn uses(mutable: bool, receiving: bool, other: bool) -> ObjectUsage {
        ObjectUsage {
            mutable,
            receiving,
            other,
        }
    }

    #[tokio::test]
    async fn test_ownership_kinds() {
        let alice = SuiAddress::from_short(0xa1);
        let client = MockClient::new()
            .with_object(SuiAddress::from_short(1), 4, Owner::AddressOwner(alice))
            .with_object(SuiAddress::from_short(2), 9, Owner::Shared { initial_shared_version: 3 })
            .with_object(SuiAddress::from_short(3), 5, Owner::ObjectOwner(alice))
            .with_object(SuiAddress::from_short(4), 1, Owner::Immutable);
        let mut data = TransactionData {
            inputs: vec![unresolved(1), unresolved(2), unresolved(3), unresolved(4)],
            ..Default::default()
        };
        let usage = UsageMap::from([
            (0, uses(true, false, true)),
            (1, uses(true, false, true)),
            (2, uses(false, true, false)),
        ]);
        resolve_object_references(&mut data, &usage, &client, &BuildLimits::default())
            .await
            .unwrap();

        assert!(matches!(
            data.inputs[0],
            CallArg::Object(ObjectArg::ImmOrOwnedObject(ObjectRef { version: 4, .. }))
        ));
        assert_eq!(
            data.inputs[1],
            CallArg::Object(ObjectArg::SharedObject(SharedObjectRef {
                object_id: SuiAddress::from_short(2),
                initial_shared_version: 3,
                mutable: true,
            }))
        );
        assert!(matches!(
            data.inputs[2],
            CallArg::Object(ObjectArg::Receiving(ObjectRef { version: 5, .. }))
        ));
        assert!(matches!(
            data.inputs[3],
            CallArg::Object(ObjectArg::ImmOrOwnedObject(_))
        ));
    }

    #[tokio::test]
    async fn test_shared_immutable_use() {
        let client = MockClient::new().with_object(
            SuiAddress::from_short(6),
            20,
            Owner::Shared { initial_shared_version: 1 },
        );
        let mut data = TransactionData {
            inputs: vec![unresolved(6)],
            ..Default::default()
        };
        let usage = UsageMap::from([(0, uses(false, false, true))]);
        resolve_object_references(&mut data, &usage, &client, &BuildLimits::default())
            .await
            .unwrap();
        assert!(matches!(
            data.inputs[0],
            CallArg::Object(ObjectArg::SharedObject(SharedObjectRef { mutable: false, .. }))
        ));
    }

    #[tokio::test]
    async fn test_batches_and_dedupes() {
        let mut client = MockClient::new();
        for id in 1..=5u8 {
            client = client.with_object(SuiAddress::from_short(id), 1, Owner::Immutable);
        }
        let mut data = TransactionData {
            inputs: vec![
                unresolved(1),
                unresolved(2),
                unresolved(3),
                unresolved(4),
                unresolved(5),
                unresolved(1),
            ],
            ..Default::default()
        };
        let limits = BuildLimits {
            max_objects_per_fetch: 2,
            ..Default::default()
        };
        resolve_object_references(&mut data, &UsageMap::new(), &client, &limits)
            .await
            .unwrap();
        assert_eq!(
            client.calls(),
            vec!["multiGetObjects:2", "multiGetObjects:2", "multiGetObjects:1"]
        );
        assert!(data.inputs.iter().all(CallArg::is_resolved));
    }

    #[tokio::test]
    async fn test_known_reference_skips_fetch() {
        let client = MockClient::new();
        let mut data = TransactionData {
            inputs: vec![
                CallArg::UnresolvedObject(UnresolvedObject {
                    object_id: SuiAddress::from_short(8),
                    version: Some(2),
                    digest: Some(ObjectDigest::new([8; 32])),
                    ..Default::default()
                }),
                CallArg::UnresolvedObject(UnresolvedObject {
                    object_id: SuiAddress::from_short(6),
                    initial_shared_version: Some(1),
                    mutable: Some(true),
                    ..Default::default()
                }),
            ],
            ..Default::default()
        };
        resolve_object_references(&mut data, &UsageMap::new(), &client, &BuildLimits::default())
            .await
            .unwrap();
        assert!(client.calls().is_empty());
        assert!(matches!(
            data.inputs[1],
            CallArg::Object(ObjectArg::SharedObject(SharedObjectRef { mutable: true, .. }))
        ));
    }

    #[tokio::test]
    async fn test_missing_object() {
        let client = MockClient::new();
        let mut data = TransactionData {
            inputs: vec![unresolved(9)],
            ..Default::default()
        };
        let err = resolve_object_references(&mut data, &UsageMap::new(), &client, &BuildLimits::default())
            .await
            .unwrap_err();
        assert!(matches!(err, WasmSuiError::Resolution(ref m) if m.contains("failed to fetch object")));
    }
}
