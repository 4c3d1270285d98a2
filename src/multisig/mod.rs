//! Weighted-threshold multisig.
//!
//! A [`MultiSigPublicKey`] is an ordered committee of up to ten member keys,
//! each with a weight, plus a threshold. Member signatures are combined into
//! a [`MultiSig`] whose bitmap records which members signed; it verifies when
//! every included signature is valid and the signed weight reaches the
//! threshold.

mod public_key;
mod signature;
mod signer;

pub use public_key::{MultiSigMember, MultiSigPublicKey, PartialSignature, MAX_SIGNER_IN_MULTISIG};
pub use signature::{CompressedSignature, MultiSig};
pub use signer::MultiSigSigner;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bcs::sui_registry;
    use crate::crypto::{
        verify_serialized_signature, Ed25519Keypair, IntentScope, ParsedSignature, PublicKey,
        Secp256k1Keypair, Secp256r1Keypair, Signer, SuiPublicKey,
    };
    use crate::error::{MultiSigCombineError, WasmSuiError};

    const MESSAGE: &[u8] = b"multisig payload";

    fn keys() -> (Ed25519Keypair, Ed25519Keypair, Ed25519Keypair) {
        (
            Ed25519Keypair::from_secret_key(&[1u8; 32]).unwrap(),
            Ed25519Keypair::from_secret_key(&[2u8; 32]).unwrap(),
            Ed25519Keypair::from_secret_key(&[3u8; 32]).unwrap(),
        )
    }

    /// weights {1, 2, 3}, threshold 3
    fn committee() -> MultiSigPublicKey {
        let (k1, k2, k3) = keys();
        MultiSigPublicKey::from_members(
            3,
            vec![(k1.public_key(), 1), (k2.public_key(), 2), (k3.public_key(), 3)],
        )
        .unwrap()
    }

    fn partial(signer: &dyn Signer) -> String {
        signer.sign_personal_message(MESSAGE).unwrap().signature
    }

    fn verifies(key: &MultiSigPublicKey, signers: &[&dyn Signer]) -> bool {
        let partials: Vec<String> = signers.iter().map(|s| partial(*s)).collect();
        let combined = key.combine_partial_signatures(&partials).unwrap();
        key.verify_personal_message(MESSAGE, &combined).unwrap()
    }

    #[test]
    fn test_address_vector() {
        assert_eq!(
            committee().to_sui_address().to_string(),
            "0xf14eb9a46f1e562ed4ac10ef883f451a62e957d1607c8b9857b904a2ac6eca05"
        );
    }

    #[test]
    fn test_threshold() {
        let (k1, k2, k3) = keys();
        let key = committee();
        assert!(verifies(&key, &[&k3]));
        assert!(!verifies(&key, &[&k2]));
        assert!(verifies(&key, &[&k1, &k2]));
        assert!(verifies(&key, &[&k2, &k1]));
    }

    #[test]
    fn test_signatures_ordered_by_bit() {
        let (k1, _, k3) = keys();
        let key = committee();
        let combined = key
            .combine_partial_signatures(&[partial(&k3), partial(&k1)])
            .unwrap();
        let ParsedSignature::MultiSig(multisig) =
            crate::crypto::parse_serialized_signature(&combined).unwrap()
        else {
            panic!("expected multisig");
        };
        assert_eq!(multisig.bitmap, 0b101);
        let partials = key.parse_partial_signatures(&multisig).unwrap();
        assert_eq!(partials[0].public_key, k1.public_key());
        assert_eq!(partials[1].public_key, k3.public_key());
        assert_eq!(partials[1].weight, 3);
    }

    #[test]
    fn test_duplicate_signer_rejected() {
        let (k1, _, _) = keys();
        let err = committee()
            .combine_partial_signatures(&[partial(&k1), partial(&k1)])
            .unwrap_err();
        assert_eq!(
            err,
            WasmSuiError::MultiSigCombine(MultiSigCombineError::DuplicateSigner(0))
        );
    }

    #[test]
    fn test_non_member_rejected() {
        let outsider = Ed25519Keypair::from_secret_key(&[4u8; 32]).unwrap();
        let err = committee()
            .combine_partial_signatures(&[partial(&outsider)])
            .unwrap_err();
        assert!(matches!(
            err,
            WasmSuiError::MultiSigCombine(MultiSigCombineError::UnknownPublicKey { position: 0, .. })
        ));
    }

    #[test]
    fn test_nested_multisig_rejected() {
        let (_, _, k3) = keys();
        let key = committee();
        let combined = key.combine_partial_signatures(&[partial(&k3)]).unwrap();
        let err = key.combine_partial_signatures(&[combined]).unwrap_err();
        assert_eq!(
            err,
            WasmSuiError::MultiSigCombine(MultiSigCombineError::Nested(0))
        );
    }

    #[test]
    fn test_empty_set_fails() {
        let key = committee();
        let combined = key.combine_partial_signatures(&[]).unwrap();
        assert!(!key.verify_personal_message(MESSAGE, &combined).unwrap());
    }

    #[test]
    fn test_bad_member_signature_fails_whole_verify() {
        let (k1, k2, _) = keys();
        let key = committee();
        let wrong = k2.sign_personal_message(b"something else").unwrap().signature;
        let combined = key
            .combine_partial_signatures(&[partial(&k1), wrong])
            .unwrap();
        assert!(!key.verify_personal_message(MESSAGE, &combined).unwrap());
    }

    #[test]
    fn test_other_committee_does_not_verify() {
        let (k1, k2, k3) = keys();
        let combined = committee()
            .combine_partial_signatures(&[partial(&k3)])
            .unwrap();
        let other = MultiSigPublicKey::from_members(
            1,
            vec![(k1.public_key(), 1), (k2.public_key(), 1), (k3.public_key(), 1)],
        )
        .unwrap();
        assert!(!other.verify_personal_message(MESSAGE, &combined).unwrap());
    }

    #[test]
    fn test_config_validation() {
        let (k1, k2, _) = keys();
        let config = |threshold, members| {
            matches!(
                MultiSigPublicKey::from_members(threshold, members),
                Err(WasmSuiError::MultiSigConfig(_))
            )
        };
        assert!(config(0, vec![(k1.public_key(), 1)]));
        assert!(config(1, vec![(k1.public_key(), 0)]));
        assert!(config(4, vec![(k1.public_key(), 1), (k2.public_key(), 2)]));
        assert!(config(1, vec![(k1.public_key(), 1), (k1.public_key(), 1)]));

        let eleven: Vec<(SuiPublicKey, u8)> = (10u8..21)
            .map(|i| {
                let key = Ed25519Keypair::from_secret_key(&[i; 32]).unwrap();
                (key.public_key(), 1)
            })
            .collect();
        assert!(config(1, eleven));
    }

    #[test]
    fn test_invalid_embedded_committee_is_signature_error() {
        let multisig = MultiSig {
            sigs: vec![],
            bitmap: 0,
            multisig_pk: committee(),
        };
        let mut bytes = multisig.to_bcs_bytes();
        // threshold is the trailing u16
        let len = bytes.len();
        bytes[len - 2..].copy_from_slice(&0u16.to_le_bytes());
        assert!(matches!(
            MultiSig::from_bcs_bytes(&bytes),
            Err(WasmSuiError::Signature(_))
        ));
    }

    #[test]
    fn test_mixed_schemes_and_bcs_agreement() {
        let ed = Ed25519Keypair::from_secret_key(&[1u8; 32]).unwrap();
        let k1 = Secp256k1Keypair::from_secret_key(&[2u8; 32]).unwrap();
        let r1 = Secp256r1Keypair::from_secret_key(&[3u8; 32]).unwrap();
        let key = MultiSigPublicKey::from_members(
            2,
            vec![(ed.public_key(), 1), (k1.public_key(), 1), (r1.public_key(), 1)],
        )
        .unwrap();

        let bytes = key.to_bytes();
        assert_eq!(MultiSigPublicKey::from_bytes(&bytes).unwrap(), key);
        let registry = sui_registry().unwrap();
        let value = registry.decode_named("MultiSigPublicKey", &bytes).unwrap();
        assert_eq!(registry.encode_named("MultiSigPublicKey", &value).unwrap(), bytes);

        let combined = key
            .combine_partial_signatures(&[partial(&r1), partial(&k1)])
            .unwrap();
        let address =
            verify_serialized_signature(MESSAGE, &combined, IntentScope::PersonalMessage).unwrap();
        assert_eq!(address, key.to_sui_address());
    }

    #[test]
    fn test_multisig_signer() {
        let (k1, k2, k3) = keys();
        let key = committee();
        let signer = MultiSigSigner::new(key.clone(), vec![Box::new(k1), Box::new(k2)]).unwrap();
        let signed = signer.sign_transaction(b"tx").unwrap();
        assert!(key.verify_transaction(b"tx", &signed.signature).unwrap());

        assert!(matches!(
            MultiSigSigner::new(key, vec![Box::new(k3.clone()), Box::new(k3)]),
            Err(WasmSuiError::MultiSigConfig(_))
        ));
    }

    #[test]
    fn test_signer_below_threshold_rejected() {
        let (_, k2, _) = keys();
        assert!(MultiSigSigner::new(committee(), vec![Box::new(k2)]).is_err());
    }
}
