//! Typed BCS reader/writer and the `BcsEncode`/`BcsDecode` traits.
//!
//! Integers are fixed-width little-endian, lengths and enum tags are ULEB128,
//! structs are their fields concatenated in order, `Option<T>` is the enum
//! `{ None, Some(T) }`.

use super::uleb;
use crate::error::EncodingError;

/// Maximum container nesting accepted while decoding.
pub const MAX_DEPTH: usize = 64;

/// Growable output buffer.
#[derive(Debug, Default, Clone)]
pub struct BcsWriter {
    buf: Vec<u8>,
}

impl BcsWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u128(&mut self, value: u128) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(value as u8);
    }

    pub fn write_uleb128(&mut self, value: u64) {
        uleb::encode(value, &mut self.buf);
    }

    /// Raw bytes with no length prefix (fixed-size arrays).
    pub fn write_fixed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// `vector<u8>`: ULEB128 length then the bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.write_uleb128(bytes.len() as u64);
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_str(&mut self, value: &str) {
        self.write_bytes(value.as_bytes());
    }

    /// Length-prefixed sequence, each element written by `f`.
    pub fn write_seq<T, F>(&mut self, items: &[T], mut f: F) -> Result<(), EncodingError>
    where
        F: FnMut(&mut Self, &T) -> Result<(), EncodingError>,
    {
        self.write_uleb128(items.len() as u64);
        for item in items {
            f(self, item)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over input bytes.
#[derive(Debug, Clone)]
pub struct BcsReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> BcsReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        BcsReader {
            bytes,
            pos: 0,
            depth: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// Take the next `n` bytes.
    pub fn read_slice(&mut self, n: usize) -> Result<&'a [u8], EncodingError> {
        if self.remaining() < n {
            return Err(EncodingError::BufferUnderflow {
                offset: self.pos,
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], EncodingError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_slice(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, EncodingError> {
        Ok(self.read_slice(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, EncodingError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, EncodingError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, EncodingError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_u128(&mut self) -> Result<u128, EncodingError> {
        Ok(u128::from_le_bytes(self.read_array()?))
    }

    pub fn read_bool(&mut self) -> Result<bool, EncodingError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(EncodingError::InvalidBool(other)),
        }
    }

    pub fn read_uleb128(&mut self, bits: u32) -> Result<u64, EncodingError> {
        let (value, read) = uleb::decode(&self.bytes[self.pos..], bits)?;
        self.pos += read;
        Ok(value)
    }

    /// Sequence length or enum tag.
    pub fn read_len(&mut self) -> Result<usize, EncodingError> {
        Ok(self.read_uleb128(32)? as usize)
    }

    /// Enum tag checked against the declared variant count.
    pub fn read_variant(&mut self, name: &str, count: usize) -> Result<u32, EncodingError> {
        let index = self.read_uleb128(32)? as u32;
        if index as usize >= count {
            return Err(EncodingError::InvalidEnumVariant {
                name: name.to_string(),
                index,
                count,
            });
        }
        Ok(index)
    }

    pub fn read_bytes(&mut self) -> Result<Vec<u8>, EncodingError> {
        let len = self.read_len()?;
        Ok(self.read_slice(len)?.to_vec())
    }

    pub fn read_string(&mut self) -> Result<String, EncodingError> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes).map_err(|_| EncodingError::InvalidUtf8)
    }

    /// Length-prefixed sequence, each element read by `f`.
    pub fn read_seq<T, F>(&mut self, mut f: F) -> Result<Vec<T>, EncodingError>
    where
        F: FnMut(&mut Self) -> Result<T, EncodingError>,
    {
        let len = self.read_len()?;
        // each element takes at least one byte
        let mut items = Vec::with_capacity(len.min(self.remaining()));
        for _ in 0..len {
            items.push(f(self)?);
        }
        Ok(items)
    }

    /// Run `f` one nesting level deeper.
    pub fn nested<T, F>(&mut self, f: F) -> Result<T, EncodingError>
    where
        F: FnOnce(&mut Self) -> Result<T, EncodingError>,
    {
        if self.depth >= MAX_DEPTH {
            return Err(EncodingError::DepthLimitExceeded(MAX_DEPTH));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Fail if any input is left.
    pub fn finish(&self) -> Result<(), EncodingError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(EncodingError::TrailingBytes(n)),
        }
    }
}

/// A value with a canonical BCS encoding.
pub trait BcsEncode {
    fn encode(&self, w: &mut BcsWriter) -> Result<(), EncodingError>;

    fn to_bcs_bytes(&self) -> Result<Vec<u8>, EncodingError> {
        let mut w = BcsWriter::new();
        self.encode(&mut w)?;
        Ok(w.into_bytes())
    }
}

/// A value decodable from canonical BCS.
pub trait BcsDecode: Sized {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, EncodingError>;

    /// Strict top-level decode: trailing bytes are an error.
    fn from_bcs_bytes(bytes: &[u8]) -> Result<Self, EncodingError> {
        let mut r = BcsReader::new(bytes);
        let value = Self::decode(&mut r)?;
        r.finish()?;
        Ok(value)
    }
}

macro_rules! impl_bcs_int {
    ($($ty:ty => $write:ident, $read:ident;)*) => {
        $(
            impl BcsEncode for $ty {
                fn encode(&self, w: &mut BcsWriter) -> Result<(), EncodingError> {
                    w.$write(*self);
                    Ok(())
                }
            }

            impl BcsDecode for $ty {
                fn decode(r: &mut BcsReader<'_>) -> Result<Self, EncodingError> {
                    r.$read()
                }
            }
        )*
    };
}

impl_bcs_int! {
    u8 => write_u8, read_u8;
    u16 => write_u16, read_u16;
    u32 => write_u32, read_u32;
    u64 => write_u64, read_u64;
    u128 => write_u128, read_u128;
    bool => write_bool, read_bool;
}

impl BcsEncode for String {
    fn encode(&self, w: &mut BcsWriter) -> Result<(), EncodingError> {
        w.write_str(self);
        Ok(())
    }
}

impl BcsDecode for String {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, EncodingError> {
        r.read_string()
    }
}

impl<T: BcsEncode> BcsEncode for Vec<T> {
    fn encode(&self, w: &mut BcsWriter) -> Result<(), EncodingError> {
        w.write_seq(self, |w, item| item.encode(w))
    }
}

impl<T: BcsDecode> BcsDecode for Vec<T> {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, EncodingError> {
        r.nested(|r| r.read_seq(T::decode))
    }
}

impl<T: BcsEncode> BcsEncode for Option<T> {
    fn encode(&self, w: &mut BcsWriter) -> Result<(), EncodingError> {
        match self {
            None => {
                w.write_uleb128(0);
                Ok(())
            }
            Some(value) => {
                w.write_uleb128(1);
                value.encode(w)
            }
        }
    }
}

impl<T: BcsDecode> BcsDecode for Option<T> {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, EncodingError> {
        match r.read_variant("Option", 2)? {
            0 => Ok(None),
            _ => r.nested(|r| T::decode(r).map(Some)),
        }
    }
}

impl<const N: usize> BcsEncode for [u8; N] {
    fn encode(&self, w: &mut BcsWriter) -> Result<(), EncodingError> {
        w.write_fixed(self);
        Ok(())
    }
}

impl<const N: usize> BcsDecode for [u8; N] {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, EncodingError> {
        r.read_array()
    }
}

/// Serialize `value` to BCS bytes.
pub fn to_bytes<T: BcsEncode + ?Sized>(value: &T) -> Result<Vec<u8>, EncodingError> {
    value.to_bcs_bytes()
}

/// Strictly deserialize `T` from BCS bytes.
pub fn from_bytes<T: BcsDecode>(bytes: &[u8]) -> Result<T, EncodingError> {
    T::from_bcs_bytes(bytes)
}
