//! The aggregate `MultiSig` signature and its BCS layout.

use base64::{engine::general_purpose::STANDARD, Engine};

use super::public_key::MultiSigPublicKey;
use crate::bcs::{BcsReader, BcsWriter};
use crate::crypto::{SignatureScheme, SIGNATURE_SIZE};
use crate::error::WasmSuiError;

/// A member signature with its scheme tag and no public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressedSignature {
    Ed25519([u8; SIGNATURE_SIZE]),
    Secp256k1([u8; SIGNATURE_SIZE]),
    Secp256r1([u8; SIGNATURE_SIZE]),
    ZkLogin(Vec<u8>),
}

impl CompressedSignature {
    pub fn new(scheme: SignatureScheme, signature: &[u8]) -> Result<Self, WasmSuiError> {
        let fixed = || -> Result<[u8; SIGNATURE_SIZE], WasmSuiError> {
            signature.try_into().map_err(|_| {
                WasmSuiError::signature(format!(
                    "{} signature must be {} bytes, got {}",
                    scheme,
                    SIGNATURE_SIZE,
                    signature.len()
                ))
            })
        };
        match scheme {
            SignatureScheme::Ed25519 => Ok(CompressedSignature::Ed25519(fixed()?)),
            SignatureScheme::Secp256k1 => Ok(CompressedSignature::Secp256k1(fixed()?)),
            SignatureScheme::Secp256r1 => Ok(CompressedSignature::Secp256r1(fixed()?)),
            SignatureScheme::ZkLogin => Ok(CompressedSignature::ZkLogin(signature.to_vec())),
            SignatureScheme::MultiSig => Err(WasmSuiError::signature(
                "a multisig cannot be a member signature",
            )),
        }
    }

    pub fn scheme(&self) -> SignatureScheme {
        match self {
            CompressedSignature::Ed25519(_) => SignatureScheme::Ed25519,
            CompressedSignature::Secp256k1(_) => SignatureScheme::Secp256k1,
            CompressedSignature::Secp256r1(_) => SignatureScheme::Secp256r1,
            CompressedSignature::ZkLogin(_) => SignatureScheme::ZkLogin,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            CompressedSignature::Ed25519(sig)
            | CompressedSignature::Secp256k1(sig)
            | CompressedSignature::Secp256r1(sig) => sig,
            CompressedSignature::ZkLogin(bytes) => bytes,
        }
    }

    pub(crate) fn write(&self, w: &mut BcsWriter) {
        match self {
            CompressedSignature::Ed25519(sig) => {
                w.write_uleb128(0);
                w.write_fixed(sig);
            }
            CompressedSignature::Secp256k1(sig) => {
                w.write_uleb128(1);
                w.write_fixed(sig);
            }
            CompressedSignature::Secp256r1(sig) => {
                w.write_uleb128(2);
                w.write_fixed(sig);
            }
            CompressedSignature::ZkLogin(bytes) => {
                w.write_uleb128(3);
                w.write_bytes(bytes);
            }
        }
    }

    pub(crate) fn read(r: &mut BcsReader<'_>) -> Result<Self, WasmSuiError> {
        let signature = match r.read_variant("CompressedSignature", 4)? {
            0 => CompressedSignature::Ed25519(r.read_array()?),
            1 => CompressedSignature::Secp256k1(r.read_array()?),
            2 => CompressedSignature::Secp256r1(r.read_array()?),
            _ => CompressedSignature::ZkLogin(r.read_bytes()?),
        };
        Ok(signature)
    }
}

/// `{ sigs, bitmap, multisig_pk }`: member signatures in ascending bit order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSig {
    pub sigs: Vec<CompressedSignature>,
    pub bitmap: u16,
    pub multisig_pk: MultiSigPublicKey,
}

impl MultiSig {
    /// Member indices whose bit is set, ascending.
    pub fn signer_indices(&self) -> Vec<usize> {
        (0..16).filter(|i| self.bitmap & (1 << i) != 0).collect()
    }

    pub fn to_bcs_bytes(&self) -> Vec<u8> {
        let mut w = BcsWriter::new();
        w.write_uleb128(self.sigs.len() as u64);
        for sig in &self.sigs {
            sig.write(&mut w);
        }
        w.write_u16(self.bitmap);
        self.multisig_pk.write(&mut w);
        w.into_bytes()
    }

    pub fn from_bcs_bytes(bytes: &[u8]) -> Result<Self, WasmSuiError> {
        let mut r = BcsReader::new(bytes);
        let count = r.read_len()?;
        let mut sigs = Vec::with_capacity(count.min(r.remaining()));
        for _ in 0..count {
            sigs.push(CompressedSignature::read(&mut r)?);
        }
        let bitmap = r.read_u16()?;
        // an invalid embedded committee is a malformed signature
        let multisig_pk = MultiSigPublicKey::read(&mut r).map_err(|e| match e {
            WasmSuiError::MultiSigConfig(message) => {
                WasmSuiError::signature(format!("invalid multisig public key: {}", message))
            }
            other => other,
        })?;
        r.finish()?;
        Ok(MultiSig {
            sigs,
            bitmap,
            multisig_pk,
        })
    }

    /// `base64(0x03 ‖ BCS(MultiSig))`
    pub fn to_serialized_signature(&self) -> String {
        let mut bytes = vec![SignatureScheme::MultiSig.flag()];
        bytes.extend_from_slice(&self.to_bcs_bytes());
        STANDARD.encode(bytes)
    }
}
