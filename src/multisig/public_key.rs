//! Weighted-threshold multisig committees.

use tracing::debug;

use super::signature::{CompressedSignature, MultiSig};
use crate::bcs::{BcsReader, BcsWriter};
use crate::crypto::hash::Blake2b256;
use crate::crypto::{
    parse_serialized_signature, ParsedSignature, PublicKey, SignatureScheme, SuiPublicKey,
};
use crate::error::{MultiSigCombineError, WasmSuiError};
use crate::types::SuiAddress;

pub const MAX_SIGNER_IN_MULTISIG: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSigMember {
    pub public_key: SuiPublicKey,
    pub weight: u8,
}

/// One member's contribution recovered from a combined signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialSignature {
    pub scheme: SignatureScheme,
    pub signature: Vec<u8>,
    pub public_key: SuiPublicKey,
    pub weight: u8,
}

/// Ordered members with weights and a threshold. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSigPublicKey {
    members: Vec<MultiSigMember>,
    threshold: u16,
}

fn config_error(message: impl Into<String>) -> WasmSuiError {
    WasmSuiError::MultiSigConfig(message.into())
}

impl MultiSigPublicKey {
    pub fn from_members(
        threshold: u16,
        members: Vec<(SuiPublicKey, u8)>,
    ) -> Result<Self, WasmSuiError> {
        let members = members
            .into_iter()
            .map(|(public_key, weight)| MultiSigMember { public_key, weight })
            .collect();
        let key = MultiSigPublicKey { members, threshold };
        key.validate()?;
        Ok(key)
    }

    fn validate(&self) -> Result<(), WasmSuiError> {
        if self.members.len() > MAX_SIGNER_IN_MULTISIG {
            return Err(config_error(format!(
                "max number of signers in a multisig is {}, got {}",
                MAX_SIGNER_IN_MULTISIG,
                self.members.len()
            )));
        }
        if self.threshold == 0 {
            return Err(config_error("threshold must be at least 1"));
        }
        for (index, member) in self.members.iter().enumerate() {
            if member.weight == 0 {
                return Err(config_error(format!("member {} has weight 0", index)));
            }
            if self.members[..index]
                .iter()
                .any(|other| other.public_key == member.public_key)
            {
                return Err(config_error(format!(
                    "duplicate public key at member {}",
                    index
                )));
            }
        }
        let total: u32 = self.members.iter().map(|m| m.weight as u32).sum();
        if total < self.threshold as u32 {
            return Err(config_error(format!(
                "unreachable threshold {}: total weight is {}",
                self.threshold, total
            )));
        }
        Ok(())
    }

    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    pub fn members(&self) -> &[MultiSigMember] {
        &self.members
    }

    pub fn public_keys(&self) -> Vec<SuiPublicKey> {
        self.members.iter().map(|m| m.public_key.clone()).collect()
    }

    pub fn member_index(&self, public_key: &SuiPublicKey) -> Option<usize> {
        self.members.iter().position(|m| m.public_key == *public_key)
    }

    /// Total weight of the members whose bit is set in `bitmap`.
    pub fn signature_weight(&self, bitmap: u16) -> u32 {
        self.members
            .iter()
            .enumerate()
            .filter(|(i, _)| bitmap & (1 << i) != 0)
            .map(|(_, m)| m.weight as u32)
            .sum()
    }

    pub(crate) fn write(&self, w: &mut BcsWriter) {
        w.write_uleb128(self.members.len() as u64);
        for member in &self.members {
            let raw = member.public_key.to_raw_bytes();
            match member.public_key {
                SuiPublicKey::Ed25519(_) => w.write_uleb128(0),
                SuiPublicKey::Secp256k1(_) => w.write_uleb128(1),
                SuiPublicKey::Secp256r1(_) => w.write_uleb128(2),
                SuiPublicKey::ZkLogin(_) => w.write_uleb128(3),
            }
            match member.public_key {
                SuiPublicKey::ZkLogin(_) => w.write_bytes(&raw),
                _ => w.write_fixed(&raw),
            }
            w.write_u8(member.weight);
        }
        w.write_u16(self.threshold);
    }

    pub(crate) fn read(r: &mut BcsReader<'_>) -> Result<Self, WasmSuiError> {
        let count = r.read_len()?;
        if count > MAX_SIGNER_IN_MULTISIG {
            return Err(config_error(format!(
                "max number of signers in a multisig is {}, got {}",
                MAX_SIGNER_IN_MULTISIG, count
            )));
        }
        let mut members = Vec::with_capacity(count);
        for _ in 0..count {
            let public_key = match r.read_variant("PublicKey", 4)? {
                0 => SuiPublicKey::from_raw_bytes(SignatureScheme::Ed25519, r.read_slice(32)?)?,
                1 => SuiPublicKey::from_raw_bytes(SignatureScheme::Secp256k1, r.read_slice(33)?)?,
                2 => SuiPublicKey::from_raw_bytes(SignatureScheme::Secp256r1, r.read_slice(33)?)?,
                _ => SuiPublicKey::ZkLogin(r.read_bytes()?),
            };
            let weight = r.read_u8()?;
            members.push(MultiSigMember { public_key, weight });
        }
        let threshold = r.read_u16()?;
        let key = MultiSigPublicKey { members, threshold };
        key.validate()?;
        Ok(key)
    }

    /// BCS `MultiSigPublicKey`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = BcsWriter::new();
        self.write(&mut w);
        w.into_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WasmSuiError> {
        let mut r = BcsReader::new(bytes);
        let key = MultiSigPublicKey::read(&mut r)?;
        r.finish()?;
        Ok(key)
    }

    /// Combine serialized member signatures into one multisig signature.
    ///
    /// Signatures may arrive in any order; they are stored by member index.
    pub fn combine_partial_signatures(
        &self,
        signatures: &[String],
    ) -> Result<String, WasmSuiError> {
        let mut slots: Vec<Option<CompressedSignature>> = vec![None; self.members.len()];
        let mut bitmap: u16 = 0;

        for (position, serialized) in signatures.iter().enumerate() {
            let (scheme, signature, public_key) = match parse_serialized_signature(serialized)? {
                ParsedSignature::Simple {
                    scheme,
                    signature,
                    public_key,
                } => (scheme, signature, public_key),
                ParsedSignature::MultiSig(_) => {
                    return Err(MultiSigCombineError::Nested(position).into())
                }
                ParsedSignature::ZkLogin { .. } => {
                    return Err(WasmSuiError::signature(
                        "zkLogin member signatures cannot be combined here",
                    ))
                }
            };

            let index = self.member_index(&public_key).ok_or_else(|| {
                MultiSigCombineError::UnknownPublicKey {
                    position,
                    public_key: public_key.to_sui_base64(),
                }
            })?;
            if bitmap & (1 << index) != 0 {
                return Err(MultiSigCombineError::DuplicateSigner(index).into());
            }
            bitmap |= 1 << index;
            slots[index] = Some(CompressedSignature::new(scheme, &signature)?);
        }

        let multisig = MultiSig {
            sigs: slots.into_iter().flatten().collect(),
            bitmap,
            multisig_pk: self.clone(),
        };
        debug!(
            signers = multisig.sigs.len(),
            weight = self.signature_weight(bitmap),
            threshold = self.threshold,
            "combined multisig"
        );
        Ok(multisig.to_serialized_signature())
    }

    /// Check a parsed multisig against `message` (the signing digest).
    ///
    /// Malformed structure is an error; insufficient weight or a bad member
    /// signature is `Ok(false)`.
    pub fn verify_parsed(&self, message: &[u8], multisig: &MultiSig) -> Result<bool, WasmSuiError> {
        if multisig.multisig_pk != *self {
            return Ok(false);
        }
        let indices = multisig.signer_indices();
        if indices.is_empty() {
            return Ok(false);
        }
        if indices.len() != multisig.sigs.len() {
            return Err(WasmSuiError::signature(format!(
                "bitmap has {} signers but {} signatures are present",
                indices.len(),
                multisig.sigs.len()
            )));
        }

        for (index, signature) in indices.iter().zip(&multisig.sigs) {
            let member = self.members.get(*index).ok_or_else(|| {
                WasmSuiError::signature(format!("bitmap references missing member {}", index))
            })?;
            if member.public_key.scheme() != signature.scheme()
                || !member.public_key.verify_raw(message, signature.as_bytes())
            {
                return Ok(false);
            }
        }

        Ok(self.signature_weight(multisig.bitmap) >= self.threshold as u32)
    }

    /// Recover each member's signature from a combined multisig.
    pub fn parse_partial_signatures(
        &self,
        multisig: &MultiSig,
    ) -> Result<Vec<PartialSignature>, WasmSuiError> {
        multisig
            .signer_indices()
            .into_iter()
            .zip(&multisig.sigs)
            .map(|(index, signature)| {
                let member = self.members.get(index).ok_or_else(|| {
                    WasmSuiError::signature(format!("bitmap references missing member {}", index))
                })?;
                Ok(PartialSignature {
                    scheme: signature.scheme(),
                    signature: signature.as_bytes().to_vec(),
                    public_key: member.public_key.clone(),
                    weight: member.weight,
                })
            })
            .collect()
    }
}

impl PublicKey for MultiSigPublicKey {
    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::MultiSig
    }

    fn to_raw_bytes(&self) -> Vec<u8> {
        self.to_bytes()
    }

    /// `signature` is BCS `MultiSig` without the flag.
    fn verify_raw(&self, message: &[u8], signature: &[u8]) -> bool {
        MultiSig::from_bcs_bytes(signature)
            .and_then(|multisig| self.verify_parsed(message, &multisig))
            .unwrap_or(false)
    }

    /// `blake2b256(0x03 ‖ threshold ‖ (flag ‖ key ‖ weight)*)`
    fn to_sui_address(&self) -> SuiAddress {
        use blake2::Digest;

        let mut hasher = Blake2b256::new();
        hasher.update([SignatureScheme::MultiSig.flag()]);
        hasher.update(self.threshold.to_le_bytes());
        for member in &self.members {
            hasher.update(member.public_key.to_sui_bytes());
            hasher.update([member.weight]);
        }
        let mut address = [0u8; 32];
        address.copy_from_slice(&hasher.finalize());
        SuiAddress::new(address)
    }

    fn verify(&self, message: &[u8], serialized_signature: &str) -> Result<bool, WasmSuiError> {
        match parse_serialized_signature(serialized_signature)? {
            ParsedSignature::MultiSig(multisig) => self.verify_parsed(message, &multisig),
            _ => Err(WasmSuiError::signature("expected a multisig serialized signature")),
        }
    }
}
