use crate::bcs::{BcsDecode, BcsEncode, BcsReader, BcsWriter};
use crate::error::EncodingError;

/// A command argument: the gas coin, an input, or an earlier command's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Argument {
    GasCoin,
    Input(u16),
    Result(u16),
    NestedResult(u16, u16),
}

impl Argument {
    /// Index of the command this argument reads from, if any.
    pub fn command_index(&self) -> Option<u16> {
        match self {
            Argument::Result(index) | Argument::NestedResult(index, _) => Some(*index),
            _ => None,
        }
    }
}

impl BcsEncode for Argument {
    fn encode(&self, w: &mut BcsWriter) -> Result<(), EncodingError> {
        match self {
            Argument::GasCoin => w.write_uleb128(0),
            Argument::Input(index) => {
                w.write_uleb128(1);
                w.write_u16(*index);
            }
            Argument::Result(index) => {
                w.write_uleb128(2);
                w.write_u16(*index);
            }
            Argument::NestedResult(index, result) => {
                w.write_uleb128(3);
                w.write_u16(*index);
                w.write_u16(*result);
            }
        }
        Ok(())
    }
}

impl BcsDecode for Argument {
    fn decode(r: &mut BcsReader<'_>) -> Result<Self, EncodingError> {
        let argument = match r.read_variant("Argument", 4)? {
            0 => Argument::GasCoin,
            1 => Argument::Input(r.read_u16()?),
            2 => Argument::Result(r.read_u16()?),
            _ => Argument::NestedResult(r.read_u16()?, r.read_u16()?),
        };
        Ok(argument)
    }
}
